//! Error types for resolution and transformation.

use oims_model::LocationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// Resolved strategy name has no registered implementation.
    #[error("unsupported mapper '{name}' (available: {})", available.join(", "))]
    UnsupportedMapper {
        name: String,
        available: Vec<String>,
    },

    /// Registry configuration is unreadable or inconsistent.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// A value start location cannot be resolved.
    #[error("invalid value location in sheet '{sheet}': {source}")]
    InvalidLocation {
        sheet: String,
        #[source]
        source: LocationError,
    },

    /// A header attribute id would serialize onto the subsection's
    /// comments key.
    #[error("attribute id '{attribute_id}' in header sheet '{sheet}' collides with the comments key")]
    ReservedAttributeId { sheet: String, attribute_id: String },
}

impl TransformError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
