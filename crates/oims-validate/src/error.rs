//! Consistency validation errors.
//!
//! Every variant is fatal: a run stops at the first violation and writes no
//! output.

use oims_model::LocationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // Workbook vs. mapping
    /// Mapped sheet is absent and not allowed to be missing.
    #[error("missing sheet '{sheet}' in workbook")]
    MissingSheet { sheet: String },

    #[error("invalid table orientation '{orientation}' for sheet '{sheet}'")]
    InvalidOrientation { sheet: String, orientation: String },

    /// Label cell does not hold the expected field name.
    #[error(
        "field '{expected}' not found at location '{location}' in sheet '{sheet}' (found '{actual}')"
    )]
    FieldLocationMismatch {
        sheet: String,
        expected: String,
        location: String,
        actual: String,
    },

    #[error("invalid subsection '{subsection}' in sheet '{sheet}'")]
    InvalidSubsection { sheet: String, subsection: String },

    #[error("missing content_object in sheet '{sheet}'")]
    MissingContentObject { sheet: String },

    #[error("invalid entity class '{entity_class}' in sheet '{sheet}'")]
    InvalidEntityClass { sheet: String, entity_class: String },

    #[error("invalid location in sheet '{sheet}': {source}")]
    InvalidLocation {
        sheet: String,
        #[source]
        source: LocationError,
    },

    // Mapping vs. schema
    #[error(
        "schema mismatch: mapping references '{mapping_schema}', but schema defines '{schema_name}'"
    )]
    SchemaMismatch {
        mapping_schema: String,
        schema_name: String,
    },

    /// Attribute id is not part of the schema vocabulary.
    #[error("invalid oims_attribute_id '{attribute_id}' in sheet '{sheet}'. Expected one of {permitted:?}")]
    UnknownAttributeId {
        attribute_id: String,
        sheet: String,
        /// Sorted permitted attribute names.
        permitted: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
