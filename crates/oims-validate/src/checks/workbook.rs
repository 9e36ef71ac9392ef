//! Workbook vs. mapping consistency.
//!
//! For every sheet mapping that is not skipped:
//! - the sheet exists, or is listed as allowed to be missing
//! - the table orientation is `rows` or `columns`
//! - every label location holds exactly the expected label
//! - header mappings name a known subsection
//! - content mappings name a content object and a known entity class

use std::collections::BTreeSet;

use oims_ingest::{Sheet, Workbook};
use oims_model::{
    CellRef, EntityClass, HEADER_SUBSECTIONS, MappingDocument, OimsSection, SheetMapping,
    TableOrientation,
};

use crate::error::{Result, ValidationError};

/// Sheets exempt from the presence check.
#[derive(Debug, Clone, Default)]
pub struct SheetPolicy {
    /// Sheets that may be absent from the workbook.
    pub allowed_missing: BTreeSet<String>,
    /// Sheets whose mappings are not checked at all.
    pub skip: BTreeSet<String>,
}

impl SheetPolicy {
    pub fn new<A, S>(allowed_missing: A, skip: S) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            allowed_missing: allowed_missing.into_iter().map(Into::into).collect(),
            skip: skip.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_skipped(&self, sheetname: &str) -> bool {
        self.skip.contains(sheetname)
    }

    /// Copy of `mapping` without the sheet mappings this policy skips.
    pub fn without_skipped(&self, mapping: &MappingDocument) -> MappingDocument {
        MappingDocument {
            header: mapping.header.clone(),
            content: mapping
                .content
                .iter()
                .filter(|sheet_mapping| !self.is_skipped(&sheet_mapping.sheetname))
                .cloned()
                .collect(),
        }
    }
}

/// Counts from a passing workbook check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkbookCheckSummary {
    pub sheets_checked: usize,
    pub sheets_skipped: usize,
    pub sheets_missing_allowed: usize,
    pub labels_checked: usize,
}

/// Validate a workbook against a mapping document.
///
/// # Errors
///
/// Returns the first violation found, in mapping order.
pub fn check(
    workbook: &Workbook,
    mapping: &MappingDocument,
    policy: &SheetPolicy,
) -> Result<WorkbookCheckSummary> {
    let mut summary = WorkbookCheckSummary::default();

    for sheet_mapping in &mapping.content {
        let sheetname = sheet_mapping.sheetname.as_str();
        if policy.is_skipped(sheetname) {
            tracing::debug!(sheet = %sheetname, "Skipping sheet");
            summary.sheets_skipped += 1;
            continue;
        }

        let Some(sheet) = workbook.sheet(sheetname) else {
            if policy.allowed_missing.contains(sheetname) {
                tracing::info!(sheet = %sheetname, "Sheet missing but allowed");
                summary.sheets_missing_allowed += 1;
                continue;
            }
            return Err(ValidationError::MissingSheet {
                sheet: sheetname.to_string(),
            });
        };

        if sheet_mapping
            .table_orientation
            .parse::<TableOrientation>()
            .is_err()
        {
            return Err(ValidationError::InvalidOrientation {
                sheet: sheetname.to_string(),
                orientation: sheet_mapping.table_orientation.clone(),
            });
        }

        summary.labels_checked += check_field_locations(sheet, sheet_mapping)?;
        check_section_shape(sheet_mapping)?;
        summary.sheets_checked += 1;
    }

    tracing::info!(
        sheets_checked = summary.sheets_checked,
        sheets_skipped = summary.sheets_skipped,
        sheets_missing_allowed = summary.sheets_missing_allowed,
        labels_checked = summary.labels_checked,
        "Workbook matches mapping"
    );
    Ok(summary)
}

/// Compare each located label with the literal cell content.
fn check_field_locations(sheet: &Sheet, sheet_mapping: &SheetMapping) -> Result<usize> {
    let mut checked = 0;
    for pair in &sheet_mapping.attribute_pairs {
        let (Some(expected), Some(location)) = (
            pair.excel_field_name.as_deref(),
            pair.excel_field_name_loc.as_deref(),
        ) else {
            continue;
        };

        let cell = CellRef::parse(location).map_err(|source| ValidationError::InvalidLocation {
            sheet: sheet_mapping.sheetname.clone(),
            source,
        })?;
        let actual = sheet.cell(cell).to_string();
        if actual != expected {
            return Err(ValidationError::FieldLocationMismatch {
                sheet: sheet_mapping.sheetname.clone(),
                expected: expected.to_string(),
                location: location.to_string(),
                actual,
            });
        }
        checked += 1;
    }
    Ok(checked)
}

fn check_section_shape(sheet_mapping: &SheetMapping) -> Result<()> {
    let sheet = &sheet_mapping.sheetname;
    match sheet_mapping.section() {
        Some(OimsSection::Header) => {
            let subsection = sheet_mapping.subsection.as_deref().unwrap_or_default();
            if !HEADER_SUBSECTIONS.contains(&subsection) {
                return Err(ValidationError::InvalidSubsection {
                    sheet: sheet.clone(),
                    subsection: subsection.to_string(),
                });
            }
        }
        Some(OimsSection::Content) => {
            if sheet_mapping
                .content_object
                .as_deref()
                .is_none_or(|c| c.trim().is_empty())
            {
                return Err(ValidationError::MissingContentObject {
                    sheet: sheet.clone(),
                });
            }
            let entity_class = sheet_mapping.entity_class.as_deref().unwrap_or_default();
            if entity_class.parse::<EntityClass>().is_err() {
                return Err(ValidationError::InvalidEntityClass {
                    sheet: sheet.clone(),
                    entity_class: entity_class.to_string(),
                });
            }
        }
        None => {
            tracing::warn!(
                sheet = %sheet,
                section = %sheet_mapping.oims_section,
                "Unrecognized oims_section, shape checks skipped"
            );
        }
    }
    Ok(())
}
