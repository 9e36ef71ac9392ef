//! End-to-end compilation of an xlsx mapping workbook.

use std::path::Path;

use insta::assert_snapshot;
use oims_ingest::{Workbook, read_json_document};
use oims_map::{CompileOptions, compile_mapping, compile_mapping_file};
use oims_model::MappingDocument;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Worksheet;
use tempfile::tempdir;

fn write_rows(sheet: &mut Worksheet, rows: &[&[&str]]) {
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
}

fn write_mapping_workbook(path: &Path) {
    let mut book = rust_xlsxwriter::Workbook::new();

    let mappings = book.add_worksheet();
    mappings.set_name("mappings").unwrap();
    write_rows(
        mappings,
        &[
            &[
                "sheetname",
                "oims_section",
                "subsection",
                "content_object",
                "entity_class",
                "table_orientation",
            ],
            &["MetadataFileDescriptors", "header", "file_descriptors", "", "", "rows"],
            &["", "content", "", "Orphan", "dataset", "rows"],
            &[
                "DescriptiveMetadataDataset",
                "content",
                "",
                "DescriptiveMetadataDataset",
                "dataset",
                "rows",
            ],
        ],
    );

    let metadata = book.add_worksheet();
    metadata.set_name("mapping_metadata").unwrap();
    write_rows(
        metadata,
        &[
            &["Property", "value"],
            &["schema_name", "OIMS mapping schema"],
            &["schema_description", "Excel to OIMS"],
            &["schema_version", "1"],
            &["schema_url", "https://example.org/schema"],
            &["pid_scheme", "doi"],
            &["pid", "10.0/abc"],
            &["metadata_name", "Survey mapping"],
            &["metadata_description", "Maps the survey workbook"],
            &["current_version", "1.0"],
            &["metadata_version_status", "draft"],
            &["contact_name", "Data Team"],
            &["contact_role", "maintainer"],
            &["contact_email", "data@example.org"],
            &["validated_oims_metadata_schema", "Foresight data metametadata"],
        ],
    );

    let descriptors = book.add_worksheet();
    descriptors.set_name("MetadataFileDescriptors").unwrap();
    write_rows(
        descriptors,
        &[
            &[
                "excel_field_name",
                "excel_field_name_loc",
                "excel_value_loc_range_start",
                "oims_attribute_id",
            ],
            &["Name", "A2", "B2", "metadata_name"],
        ],
    );

    let dataset = book.add_worksheet();
    dataset.set_name("DescriptiveMetadataDataset").unwrap();
    write_rows(
        dataset,
        &[
            &[
                "excel_field_name",
                "excel_field_name_loc",
                "excel_value_loc_range_start",
                "oims_attribute_id",
                "user_comments",
            ],
            &["Title", "B2", "J2", "dataset_title", "I2"],
            &["", "", "J3", "dataset_description", ""],
        ],
    );

    book.save(path).unwrap();
}

#[test]
fn compiles_mapping_workbook() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapping.xlsx");
    write_mapping_workbook(&path);

    let workbook = Workbook::open(&path).unwrap();
    let compiled = compile_mapping(&workbook, &CompileOptions::for_source(&path)).unwrap();
    let document = &compiled.document;

    // The row without a sheetname is skipped.
    assert_eq!(document.content.len(), 2);
    assert_eq!(document.attribute_pair_count(), 3);
    assert_eq!(compiled.output_path, Some(dir.path().join("mapping.json")));

    let descriptors = serde_json::to_string_pretty(&document.content[0]).unwrap();
    assert_snapshot!(descriptors, @r#"
    {
      "sheetname": "MetadataFileDescriptors",
      "oims_section": "header",
      "subsection": "file_descriptors",
      "table_orientation": "rows",
      "attribute_pairs": [
        {
          "excel_field_name": "Name",
          "excel_field_name_loc": "A2",
          "excel_value_loc_range_start": "B2",
          "oims_attribute_id": "metadata_name"
        }
      ]
    }
    "#);

    let dataset = &document.content[1];
    assert_eq!(dataset.entity_class.as_deref(), Some("dataset"));
    assert_eq!(dataset.attribute_pairs[0].user_comments.as_deref(), Some("I2"));
    assert_eq!(dataset.attribute_pairs[1].excel_field_name, None);
}

#[test]
fn compiled_mapping_is_written_and_reloads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapping.xlsx");
    let output = dir.path().join("out").join("compiled.json");
    write_mapping_workbook(&path);

    let compiled = compile_mapping_file(&path, Some(&output)).unwrap();
    let written = compiled.write().unwrap();
    assert_eq!(written, Some(output.as_path()));

    let reloaded: MappingDocument = read_json_document(&output).unwrap();
    assert_eq!(reloaded, compiled.document);
    assert_eq!(
        reloaded.header.mapping_info.input_parameters[0].parameter_value,
        path.display().to_string()
    );
}

#[test]
fn recompiling_differs_only_in_version_date() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapping.xlsx");
    write_mapping_workbook(&path);
    let workbook = Workbook::open(&path).unwrap();

    let first = CompileOptions {
        version_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
        ..CompileOptions::for_source(&path)
    };
    let second = CompileOptions {
        version_date: chrono::NaiveDate::from_ymd_opt(2025, 6, 30),
        ..CompileOptions::for_source(&path)
    };
    let mut a = compile_mapping(&workbook, &first).unwrap().document;
    let b = compile_mapping(&workbook, &second).unwrap().document;
    assert_ne!(a, b);

    a.header.file_descriptors.metadata_version.version_date =
        b.header.file_descriptors.metadata_version.version_date.clone();
    assert_eq!(a, b);
}
