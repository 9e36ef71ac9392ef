//! Reading real xlsx files written with rust_xlsxwriter.

use std::path::Path;

use oims_ingest::{CellValue, Workbook, extract_attribute_pairs};
use oims_model::CellRef;
use tempfile::tempdir;

fn write_fixture(path: &Path) {
    let mut book = rust_xlsxwriter::Workbook::new();

    let dataset = book.add_worksheet();
    dataset.set_name("DescriptiveMetadataDataset").unwrap();
    // Used range starts at B2, not A1.
    dataset.write_string(1, 1, "Title").unwrap();
    dataset.write_string(1, 9, "Survey 2023").unwrap();
    dataset.write_string(2, 1, "Year").unwrap();
    dataset.write_number(2, 9, 2023.0).unwrap();

    let pairs = book.add_worksheet();
    pairs.set_name("dataset_pairs").unwrap();
    for (col, label) in [
        "excel_field_name",
        "excel_field_name_loc",
        "excel_value_loc_range_start",
        "oims_attribute_id",
    ]
    .into_iter()
    .enumerate()
    {
        pairs.write_string(0, col as u16, label).unwrap();
    }
    pairs.write_string(1, 0, "Title").unwrap();
    pairs.write_string(1, 1, "B2").unwrap();
    pairs.write_string(1, 2, "J2").unwrap();
    pairs.write_string(1, 3, "dataset_title").unwrap();
    pairs.write_string(2, 2, "J3").unwrap();
    pairs.write_string(2, 3, "dataset_year").unwrap();

    book.save(path).unwrap();
}

#[test]
fn opened_sheets_use_absolute_coordinates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metadata.xlsx");
    write_fixture(&path);

    let workbook = Workbook::open(&path).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec!["DescriptiveMetadataDataset", "dataset_pairs"]
    );
    assert_eq!(workbook.path(), Some(path.as_path()));

    let sheet = workbook.sheet("DescriptiveMetadataDataset").unwrap();
    let title = CellRef::parse("B2").unwrap();
    assert_eq!(sheet.cell(title), &CellValue::Text("Title".to_string()));
    let value = CellRef::parse("J3").unwrap();
    assert_eq!(sheet.cell(value).to_string(), "2023");
    assert_eq!(sheet.get(0, 0), &CellValue::Empty);
}

#[test]
fn extracts_pairs_from_written_workbook() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapping.xlsx");
    write_fixture(&path);

    let workbook = Workbook::open(&path).unwrap();
    let pairs = extract_attribute_pairs(&workbook, "dataset_pairs");
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].oims_attribute_id.as_deref(), Some("dataset_title"));
    assert_eq!(pairs[1].excel_field_name, None);
    assert_eq!(pairs[1].excel_value_loc_range_start.as_deref(), Some("J3"));
}

#[test]
fn non_workbook_file_fails_to_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.xlsx");
    std::fs::write(&path, "plain text").unwrap();
    assert!(Workbook::open(&path).is_err());
}
