//! Consistency validation for OIMS conversion.
//!
//! Two passes must succeed before a transformation strategy runs:
//!
//! 1. [`validate_workbook`]: the workbook holds the sheets and labels the
//!    mapping document expects
//! 2. [`validate_schema`]: the mapping targets the schema it claims and only
//!    uses attribute ids the schema declares

mod checks;
mod error;

use oims_ingest::Workbook;
use oims_model::{MappingDocument, SchemaDocument};

pub use checks::workbook::{SheetPolicy, WorkbookCheckSummary};
pub use error::{Result, ValidationError};

/// Validate a workbook against a mapping document.
pub fn validate_workbook(
    workbook: &Workbook,
    mapping: &MappingDocument,
    policy: &SheetPolicy,
) -> Result<WorkbookCheckSummary> {
    let _span = tracing::info_span!("validate_workbook").entered();
    checks::workbook::check(workbook, mapping, policy)
}

/// Validate a mapping document against a schema. Returns the number of
/// attribute ids checked.
pub fn validate_schema(mapping: &MappingDocument, schema: &SchemaDocument) -> Result<usize> {
    let _span = tracing::info_span!("validate_schema").entered();
    checks::schema::check(mapping, schema)
}
