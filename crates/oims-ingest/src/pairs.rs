//! Attribute pair extraction from mapping-workbook sheets.

use oims_model::AttributePair;

use crate::workbook::Workbook;

/// Read the attribute pairs listed on a sheet.
///
/// The first row of the sheet holds the column labels; every following row
/// with at least one non-blank cell becomes one [`AttributePair`]. Blank cells
/// leave the matching field `None`. Columns whose label is not an attribute
/// pair field are ignored.
///
/// A missing sheet yields an empty list and a warning; extraction never fails.
pub fn extract_attribute_pairs(workbook: &Workbook, sheetname: &str) -> Vec<AttributePair> {
    let Some(sheet) = workbook.sheet(sheetname) else {
        tracing::warn!(sheet = %sheetname, "Attribute sheet not found, no pairs extracted");
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for record in sheet.records() {
        let mut pair = AttributePair::default();
        for (label, value) in record.fields {
            if !pair.set_field(&label, value) {
                tracing::debug!(
                    sheet = %sheetname,
                    row = record.row,
                    column = %label,
                    "Ignoring unknown attribute pair column"
                );
            }
        }
        if !pair.is_empty() {
            pairs.push(pair);
        }
    }

    tracing::debug!(sheet = %sheetname, pair_count = pairs.len(), "Extracted attribute pairs");
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::Sheet;

    fn attribute_sheet() -> Sheet {
        Sheet::from_rows(
            "DescriptiveMetadataDataset",
            vec![
                vec![
                    "excel_field_name",
                    "excel_field_name_loc",
                    "excel_value_loc_range_start",
                    "oims_attribute_id",
                    "user_comments",
                    "Notes",
                ],
                vec!["Title", "B2", "J2", "dataset_title", "", "check later"],
                vec!["", "", "", "", "", ""],
                vec!["", "", "J3", "dataset_description", "I3", ""],
                vec!["", "", "", "", "", "only notes"],
            ],
        )
    }

    #[test]
    fn extracts_one_pair_per_populated_row() {
        let workbook = Workbook::from_sheets(vec![attribute_sheet()]);
        let pairs = extract_attribute_pairs(&workbook, "DescriptiveMetadataDataset");

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].excel_field_name.as_deref(), Some("Title"));
        assert_eq!(pairs[0].excel_field_name_loc.as_deref(), Some("B2"));
        assert_eq!(pairs[0].user_comments, None);
        assert_eq!(pairs[1].excel_field_name, None);
        assert_eq!(pairs[1].oims_attribute_id.as_deref(), Some("dataset_description"));
        assert_eq!(pairs[1].user_comments.as_deref(), Some("I3"));
    }

    #[test]
    fn missing_sheet_yields_no_pairs() {
        let workbook = Workbook::from_sheets(vec![attribute_sheet()]);
        assert!(extract_attribute_pairs(&workbook, "Variables").is_empty());
    }
}
