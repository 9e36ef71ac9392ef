//! OIMS metadata schema document.
//!
//! Only the parts the converter relies on are typed: the schema's canonical
//! name and the attribute names of every entity block. Everything else is
//! kept in `extra` so a schema can be read without loss.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub header: SchemaHeader,
    #[serde(default)]
    pub content: Vec<EntityBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaHeader {
    pub file_descriptors: SchemaFileDescriptors,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFileDescriptors {
    pub metadata_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entity block of the schema and the attributes it permits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_object: Option<String>,
    #[serde(default, alias = "metadata")]
    pub attributes: Vec<SchemaAttribute>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaAttribute {
    pub attribute_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SchemaDocument {
    /// Canonical schema name (`header.file_descriptors.metadata_name`).
    pub fn metadata_name(&self) -> &str {
        &self.header.file_descriptors.metadata_name
    }

    /// Union of attribute names across every entity block.
    pub fn attribute_names(&self) -> BTreeSet<&str> {
        self.content
            .iter()
            .flat_map(|block| block.attributes.iter())
            .map(|attr| attr.attribute_name.as_str())
            .collect()
    }

    /// Position of an attribute in schema order (first occurrence across
    /// blocks).
    pub fn attribute_position(&self, name: &str) -> Option<usize> {
        self.content
            .iter()
            .flat_map(|block| block.attributes.iter())
            .position(|attr| attr.attribute_name == name)
    }

    /// Entity block whose `content_object` matches the given name.
    pub fn block(&self, content_object: &str) -> Option<&EntityBlock> {
        self.content
            .iter()
            .find(|block| block.content_object.as_deref() == Some(content_object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"{
        "header": {
            "file_descriptors": {"metadata_name": "Foresight data metametadata", "metadata_description": "x"},
            "mapping_info": {"mapper_tool_name": "manual"}
        },
        "content": [
            {"content_object": "dataset", "attributes": [
                {"attribute_name": "dataset_title", "requirement": "mandatory"},
                {"attribute_name": "dataset_description"}
            ]},
            {"content_object": "variable", "metadata": [
                {"attribute_name": "variable_name"},
                {"attribute_name": "dataset_title"}
            ]}
        ]
    }"#;

    #[test]
    fn collects_attribute_vocabulary() {
        let schema: SchemaDocument = serde_json::from_str(SCHEMA).unwrap();
        assert_eq!(schema.metadata_name(), "Foresight data metametadata");
        let names: Vec<&str> = schema.attribute_names().into_iter().collect();
        assert_eq!(
            names,
            vec!["dataset_description", "dataset_title", "variable_name"]
        );
    }

    #[test]
    fn attribute_position_uses_first_occurrence() {
        let schema: SchemaDocument = serde_json::from_str(SCHEMA).unwrap();
        assert_eq!(schema.attribute_position("dataset_title"), Some(0));
        assert_eq!(schema.attribute_position("variable_name"), Some(2));
        assert_eq!(schema.attribute_position("missing"), None);
    }

    #[test]
    fn keeps_unknown_keys() {
        let schema: SchemaDocument = serde_json::from_str(SCHEMA).unwrap();
        assert!(schema.header.extra.contains_key("mapping_info"));
        assert!(schema.content[0].attributes[0].extra.contains_key("requirement"));
        assert!(schema.block("variable").is_some());
        assert!(schema.block("collection").is_none());
    }
}
