//! Error types for mapping compilation.

use oims_ingest::IngestError;
use thiserror::Error;

/// Errors raised while compiling a mapping workbook.
///
/// Row-level defects in the `mappings` sheet are not errors: those rows are
/// logged and skipped.
#[derive(Debug, Error)]
pub enum CompileError {
    /// One of the two control sheets is absent.
    #[error("mapping workbook has no '{sheet}' sheet")]
    MissingControlSheet { sheet: String },

    /// A required property is absent from the `mapping_metadata` sheet.
    #[error("property '{property}' not found in mapping_metadata sheet")]
    MissingMetadataProperty { property: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, CompileError>;
