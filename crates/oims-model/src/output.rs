//! OIMS output document produced by a transformation strategy.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::mapping::MappingInfo;

/// A mapped attribute value.
///
/// A single non-empty cell becomes `Single`; a run of several non-empty
/// cells becomes `Multiple`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Build from collected cell values; `None` when there are none.
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(FieldValue::Single),
            _ => Some(FieldValue::Multiple(values)),
        }
    }

    /// All values as a slice-like iterator.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            FieldValue::Single(value) => std::slice::from_ref(value),
            FieldValue::Multiple(values) => values,
        };
        slice.iter().map(String::as_str)
    }
}

/// Attribute values keyed by OIMS attribute id, in insertion order.
pub type Properties = IndexMap<String, FieldValue>;

/// Header keys written by the converter itself; no subsection may use them.
pub const RESERVED_HEADER_KEYS: &[&str] = &["mapping_info", "converter"];

/// Key holding comments inside a header subsection.
pub const HEADER_COMMENTS_KEY: &str = "comments";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub header: OutputHeader,
    pub content: Vec<EntityObject>,
}

impl OutputDocument {
    /// Number of mapped attribute values in header and content.
    pub fn property_count(&self) -> usize {
        let header: usize = self
            .header
            .subsections
            .values()
            .map(|s| s.properties.len())
            .sum();
        let content: usize = self.content.iter().map(|e| e.properties.len()).sum();
        header + content
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputHeader {
    /// Echo of the mapping document's tool identity.
    pub mapping_info: MappingInfo,
    pub converter: ConverterInfo,
    /// Header subsections keyed by subsection name.
    #[serde(flatten)]
    pub subsections: IndexMap<String, HeaderSubsection>,
}

/// Identity of the converter run that produced the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterInfo {
    pub tool_name: String,
    pub version: String,
    pub strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderSubsection {
    #[serde(flatten)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub comments: IndexMap<String, String>,
}

/// One content entity, e.g. a dataset or a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_class: Option<String>,
    pub source_sheet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_block: Option<String>,
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub comments: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_from_values() {
        assert_eq!(FieldValue::from_values(vec![]), None);
        assert_eq!(
            FieldValue::from_values(vec!["a".to_string()]),
            Some(FieldValue::Single("a".to_string()))
        );
        let many = FieldValue::from_values(vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(many.values().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn field_value_serializes_untagged() {
        let single = serde_json::to_string(&FieldValue::Single("x".to_string())).unwrap();
        assert_eq!(single, r#""x""#);
        let multiple =
            serde_json::to_string(&FieldValue::Multiple(vec!["x".into(), "y".into()])).unwrap();
        assert_eq!(multiple, r#"["x","y"]"#);
    }

    #[test]
    fn header_subsections_flatten_into_header() {
        let mut subsection = HeaderSubsection::default();
        subsection.properties.insert(
            "metadata_name".to_string(),
            FieldValue::Single("Survey".to_string()),
        );
        let mut subsections = IndexMap::new();
        subsections.insert("file_descriptors".to_string(), subsection);
        let header = OutputHeader {
            mapping_info: MappingInfo::default(),
            converter: ConverterInfo {
                tool_name: "oims-convert".to_string(),
                version: "0.1.0".to_string(),
                strategy: "GenericMapper".to_string(),
            },
            subsections,
        };
        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(
            value["file_descriptors"]["metadata_name"],
            serde_json::json!("Survey")
        );
        assert_eq!(value["converter"]["strategy"], serde_json::json!("GenericMapper"));
    }
}
