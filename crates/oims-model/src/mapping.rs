//! Canonical mapping document.
//!
//! A mapping document tells the converter which sheet and cell of a metadata
//! workbook supplies which OIMS attribute. It is either written by hand as
//! JSON or compiled from a mapping workbook.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityClass, OimsSection, TableOrientation};

/// Default `information_type` of an attribute pair.
pub const METADATA_FIELD_VALUE: &str = "metadata_field_value";

/// Subsection recorded for header mappings that do not name one.
pub const DEFAULT_HEADER_SUBSECTION: &str = "default_header_subsection";

/// Value of `metadata_class` for mapping documents.
pub const MAPPINGS_METADATA_CLASS: &str = "mappings";

/// Schema type recorded in compiled mapping headers.
pub const MAPPING_SCHEMA_TYPE: &str = "primary metadata metadata";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    pub header: MappingHeader,
    #[serde(default)]
    pub content: Vec<SheetMapping>,
}

impl MappingDocument {
    /// Total number of attribute pairs across all sheet mappings.
    pub fn attribute_pair_count(&self) -> usize {
        self.content.iter().map(|m| m.attribute_pairs.len()).sum()
    }

    /// Sheet mapping for a sheet name, if any.
    pub fn sheet(&self, sheetname: &str) -> Option<&SheetMapping> {
        self.content.iter().find(|m| m.sheetname == sheetname)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingHeader {
    #[serde(default)]
    pub mapping_info: MappingInfo,
    #[serde(default)]
    pub metadata_schema: MetadataSchema,
    #[serde(default)]
    pub file_descriptors: FileDescriptors,
    /// Name of the OIMS schema this mapping was validated against.
    pub validated_schema_name: String,
    #[serde(default = "default_metadata_class")]
    pub metadata_class: String,
}

fn default_metadata_class() -> String {
    MAPPINGS_METADATA_CLASS.to_string()
}

/// Identity of the tool that produced a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingInfo {
    pub mapper_tool_name: String,
    pub version: String,
    pub input_parameters: Vec<ToolParameter>,
}

/// One echoed input or output parameter of the producing tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub parameter_name: String,
    pub parameter_value: String,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter_name: name.into(),
            parameter_value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistentId {
    pub pid_scheme: String,
    pub pid: String,
}

/// Identity of the mapping schema itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSchema {
    pub schema_name: String,
    pub schema_description: String,
    pub schema_type: String,
    pub schema_version: String,
    pub schema_url: String,
    pub schema_pid: PersistentId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDescriptors {
    pub metadata_name: String,
    pub metadata_description: String,
    pub metadata_version: MetadataVersion,
    pub metadata_pid: PersistentId,
    pub contact: Vec<Contact>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataVersion {
    pub current_version: String,
    pub metadata_version_status: String,
    /// `YYYY-MM-DD`, stamped when the document is produced.
    pub version_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub contact_name: String,
    pub contact_role: String,
    pub contact_email: Vec<String>,
}

/// Mapping of one workbook sheet onto a header subsection or a content
/// object.
///
/// `oims_section`, `table_orientation` and `entity_class` keep the authored
/// text; use [`SheetMapping::section`], [`SheetMapping::orientation`] and
/// [`SheetMapping::entity_class_kind`] for the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetMapping {
    pub sheetname: String,
    pub oims_section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_class: Option<String>,
    pub table_orientation: String,
    #[serde(default)]
    pub attribute_pairs: Vec<AttributePair>,
}

impl SheetMapping {
    pub fn section(&self) -> Option<OimsSection> {
        self.oims_section.parse().ok()
    }

    pub fn orientation(&self) -> Option<TableOrientation> {
        self.table_orientation.parse().ok()
    }

    pub fn entity_class_kind(&self) -> Option<EntityClass> {
        self.entity_class.as_deref().and_then(|c| c.parse().ok())
    }

    /// Header subsection, falling back to [`DEFAULT_HEADER_SUBSECTION`].
    pub fn subsection_or_default(&self) -> &str {
        self.subsection
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_HEADER_SUBSECTION)
    }
}

/// One field-to-location-to-attribute instruction.
///
/// Every field is optional; `None` means the mapping author left the cell
/// blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_field_name_loc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_value_loc_range_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oims_attribute_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_comments: Option<String>,
}

impl AttributePair {
    /// Information type, defaulting to [`METADATA_FIELD_VALUE`].
    pub fn information_type(&self) -> &str {
        self.information_type
            .as_deref()
            .unwrap_or(METADATA_FIELD_VALUE)
    }

    /// True when the pair maps a field value (as opposed to a comment or
    /// tool note).
    pub fn is_field_value(&self) -> bool {
        self.information_type() == METADATA_FIELD_VALUE
    }

    /// Assign a field by its column label. Returns `false` when the label is
    /// not an attribute pair field.
    pub fn set_field(&mut self, label: &str, value: String) -> bool {
        let slot = match label {
            "information_type" => &mut self.information_type,
            "excel_field_name" => &mut self.excel_field_name,
            "excel_field_name_loc" => &mut self.excel_field_name_loc,
            "excel_value_loc_range_start" => &mut self.excel_value_loc_range_start,
            "oims_attribute_id" => &mut self.oims_attribute_id,
            "user_comments" => &mut self.user_comments,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_pair_defaults_to_field_value() {
        let pair = AttributePair::default();
        assert_eq!(pair.information_type(), METADATA_FIELD_VALUE);
        assert!(pair.is_field_value());

        let note = AttributePair {
            information_type: Some("tool_note".to_string()),
            ..AttributePair::default()
        };
        assert!(!note.is_field_value());
    }

    #[test]
    fn set_field_ignores_unknown_labels() {
        let mut pair = AttributePair::default();
        assert!(pair.set_field("oims_attribute_id", "dataset_title".to_string()));
        assert!(!pair.set_field("Notes", "ignored".to_string()));
        assert_eq!(pair.oims_attribute_id.as_deref(), Some("dataset_title"));
        assert!(!pair.is_empty());
    }

    #[test]
    fn sheet_mapping_parses_minimal_json() {
        let json = r#"{
            "sheetname": "DescriptiveMetadataDataset",
            "oims_section": "content",
            "content_object": "DescriptiveMetadataDataset",
            "entity_class": "dataset",
            "table_orientation": "rows",
            "attribute_pairs": [
                {"excel_field_name": "Title", "excel_field_name_loc": "B2",
                 "excel_value_loc_range_start": "J2", "oims_attribute_id": "dataset_title"}
            ]
        }"#;
        let mapping: SheetMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping.section(), Some(OimsSection::Content));
        assert_eq!(mapping.orientation(), Some(TableOrientation::Rows));
        assert_eq!(mapping.entity_class_kind(), Some(EntityClass::Dataset));
        assert_eq!(mapping.attribute_pairs.len(), 1);
        assert!(mapping.attribute_pairs[0].information_type.is_none());
    }

    #[test]
    fn header_subsection_falls_back_to_sentinel() {
        let mapping = SheetMapping {
            sheetname: "MetadataFileDescriptors".to_string(),
            oims_section: "header".to_string(),
            subsection: Some(String::new()),
            content_object: None,
            entity_class: None,
            table_orientation: "rows".to_string(),
            attribute_pairs: vec![],
        };
        assert_eq!(mapping.subsection_or_default(), DEFAULT_HEADER_SUBSECTION);
    }

    #[test]
    fn mapping_header_only_requires_schema_name() {
        let json = r#"{"header": {"validated_schema_name": "Foresight data metametadata"}}"#;
        let doc: MappingDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.header.metadata_class, MAPPINGS_METADATA_CLASS);
        assert!(doc.content.is_empty());
        assert_eq!(doc.attribute_pair_count(), 0);
    }
}
