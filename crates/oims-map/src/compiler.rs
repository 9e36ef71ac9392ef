//! Mapping workbook compiler.
//!
//! A mapping workbook carries two control sheets:
//!
//! - `mappings`: one row per sheet mapping (`sheetname`, `oims_section`,
//!   `subsection`, `content_object`, `entity_class`, `table_orientation`)
//! - `mapping_metadata`: `Property` / `value` pairs describing the mapping
//!
//! plus one attribute sheet per mapped workbook sheet, named by `sheetname`.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use oims_ingest::{SheetRecord, Workbook, extract_attribute_pairs, write_json_document};
use oims_model::{
    Contact, DEFAULT_HEADER_SUBSECTION, FileDescriptors, MAPPING_SCHEMA_TYPE,
    MAPPINGS_METADATA_CLASS, MappingDocument, MappingHeader, MappingInfo, MetadataSchema,
    MetadataVersion, OimsSection, PersistentId, SheetMapping, ToolParameter,
};

use crate::error::{CompileError, Result};

/// Tool name recorded in compiled mapping headers.
pub const MAPPER_TOOL_NAME: &str = "ConvertMappingExcel";
pub const MAPPINGS_SHEET: &str = "mappings";
pub const MAPPING_METADATA_SHEET: &str = "mapping_metadata";

const MANDATORY_COLUMNS: [&str; 3] = ["sheetname", "oims_section", "table_orientation"];
const PROPERTY_COLUMN: &str = "Property";
const VALUE_COLUMN: &str = "value";

/// Options for a compilation run.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Workbook the mapping was read from, echoed in the header.
    pub source_path: Option<PathBuf>,
    /// Destination of the compiled document. Defaults to the source path
    /// with a `.json` extension.
    pub output_path: Option<PathBuf>,
    /// Date stamped into `metadata_version.version_date`. Defaults to today.
    pub version_date: Option<NaiveDate>,
}

impl CompileOptions {
    pub fn for_source(path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Resolved output path, if one can be determined.
    pub fn resolved_output_path(&self) -> Option<PathBuf> {
        self.output_path
            .clone()
            .or_else(|| self.source_path.as_deref().map(default_output_path))
    }
}

/// The mapping workbook path with its extension replaced by `.json`.
pub fn default_output_path(source: &Path) -> PathBuf {
    source.with_extension("json")
}

/// A compiled mapping and where it belongs on disk.
#[derive(Debug, Clone)]
pub struct CompiledMapping {
    pub document: MappingDocument,
    pub output_path: Option<PathBuf>,
}

impl CompiledMapping {
    /// Write the canonical JSON form to the output path.
    pub fn write(&self) -> Result<Option<&Path>> {
        let Some(path) = self.output_path.as_deref() else {
            return Ok(None);
        };
        write_json_document(path, &self.document)?;
        tracing::info!(path = %path.display(), "Wrote compiled mapping");
        Ok(Some(path))
    }
}

/// Open a mapping workbook and compile it.
pub fn compile_mapping_file(path: &Path, output_path: Option<&Path>) -> Result<CompiledMapping> {
    let workbook = Workbook::open(path)?;
    let options = CompileOptions {
        source_path: Some(path.to_path_buf()),
        output_path: output_path.map(Path::to_path_buf),
        version_date: None,
    };
    compile_mapping(&workbook, &options)
}

/// Compile an opened mapping workbook into a canonical mapping document.
pub fn compile_mapping(workbook: &Workbook, options: &CompileOptions) -> Result<CompiledMapping> {
    let mappings = control_sheet(workbook, MAPPINGS_SHEET)?;
    let metadata = MetadataProperties::new(control_sheet(workbook, MAPPING_METADATA_SHEET)?);
    let output_path = options.resolved_output_path();

    let header = build_header(&metadata, options, output_path.as_deref())?;

    let mut content = Vec::new();
    for record in &mappings {
        if let Some(mapping) = build_sheet_mapping(workbook, record) {
            content.push(mapping);
        }
    }

    tracing::info!(
        sheet_mappings = content.len(),
        skipped_rows = mappings.len() - content.len(),
        "Compiled mapping workbook"
    );

    Ok(CompiledMapping {
        document: MappingDocument { header, content },
        output_path,
    })
}

fn control_sheet(workbook: &Workbook, name: &str) -> Result<Vec<SheetRecord>> {
    workbook
        .sheet(name)
        .map(|sheet| sheet.records())
        .ok_or_else(|| CompileError::MissingControlSheet {
            sheet: name.to_string(),
        })
}

fn build_sheet_mapping(workbook: &Workbook, record: &SheetRecord) -> Option<SheetMapping> {
    let missing: Vec<&str> = MANDATORY_COLUMNS
        .into_iter()
        .filter(|column| record.get(column).is_none())
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            row = record.row + 1,
            missing = ?missing,
            "Skipping mappings row with missing mandatory fields"
        );
        return None;
    }

    let sheetname = record.get("sheetname")?.to_string();
    let oims_section = record.get("oims_section")?.to_string();
    let table_orientation = record.get("table_orientation")?.to_string();

    let (subsection, content_object, entity_class) =
        if oims_section == OimsSection::Header.as_str() {
            let subsection = record
                .get("subsection")
                .unwrap_or(DEFAULT_HEADER_SUBSECTION)
                .to_string();
            (Some(subsection), None, None)
        } else if let Some(content_object) = record.get("content_object") {
            (
                None,
                Some(content_object.to_string()),
                record.get("entity_class").map(str::to_string),
            )
        } else {
            (None, None, None)
        };

    let attribute_pairs = extract_attribute_pairs(workbook, &sheetname);
    tracing::debug!(
        sheet = %sheetname,
        section = %oims_section,
        pair_count = attribute_pairs.len(),
        "Compiled sheet mapping"
    );

    Some(SheetMapping {
        sheetname,
        oims_section,
        subsection,
        content_object,
        entity_class,
        table_orientation,
        attribute_pairs,
    })
}

/// Lookup over the `Property` / `value` rows of `mapping_metadata`.
struct MetadataProperties {
    records: Vec<SheetRecord>,
}

impl MetadataProperties {
    fn new(records: Vec<SheetRecord>) -> Self {
        Self { records }
    }

    /// Value of the first row whose `Property` equals `name` exactly. A
    /// blank value reads as an empty string.
    fn require(&self, name: &str) -> Result<String> {
        self.records
            .iter()
            .find(|record| record.get(PROPERTY_COLUMN) == Some(name))
            .map(|record| record.get(VALUE_COLUMN).unwrap_or_default().to_string())
            .ok_or_else(|| CompileError::MissingMetadataProperty {
                property: name.to_string(),
            })
    }
}

fn build_header(
    metadata: &MetadataProperties,
    options: &CompileOptions,
    output_path: Option<&Path>,
) -> Result<MappingHeader> {
    let display = |path: Option<&Path>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_default()
    };
    let mapping_info = MappingInfo {
        mapper_tool_name: MAPPER_TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        input_parameters: vec![
            ToolParameter::new("mapping_excel_path", display(options.source_path.as_deref())),
            ToolParameter::new("output_json_path", display(output_path)),
        ],
    };

    let metadata_schema = MetadataSchema {
        schema_name: metadata.require("schema_name")?,
        schema_description: metadata.require("schema_description")?,
        schema_type: MAPPING_SCHEMA_TYPE.to_string(),
        schema_version: metadata.require("schema_version")?,
        schema_url: metadata.require("schema_url")?,
        schema_pid: PersistentId {
            pid_scheme: metadata.require("pid_scheme")?,
            pid: metadata.require("pid")?,
        },
    };

    let version_date = options
        .version_date
        .unwrap_or_else(|| Local::now().date_naive());
    let file_descriptors = FileDescriptors {
        metadata_name: metadata.require("metadata_name")?,
        metadata_description: metadata.require("metadata_description")?,
        metadata_version: MetadataVersion {
            current_version: metadata.require("current_version")?,
            metadata_version_status: metadata.require("metadata_version_status")?,
            version_date: version_date.format("%Y-%m-%d").to_string(),
        },
        metadata_pid: PersistentId {
            pid_scheme: "TBD".to_string(),
            pid: "to be determined".to_string(),
        },
        contact: vec![Contact {
            contact_name: metadata.require("contact_name")?,
            contact_role: metadata.require("contact_role")?,
            contact_email: vec![metadata.require("contact_email")?],
        }],
    };

    Ok(MappingHeader {
        mapping_info,
        metadata_schema,
        file_descriptors,
        validated_schema_name: metadata.require("validated_oims_metadata_schema")?,
        metadata_class: MAPPINGS_METADATA_CLASS.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oims_ingest::Sheet;

    fn metadata_sheet_without(skip: &str) -> Sheet {
        let properties = [
            ("schema_name", "OIMS mapping schema"),
            ("schema_description", "Excel to OIMS"),
            ("schema_version", "1"),
            ("schema_url", "https://example.org/schema"),
            ("pid_scheme", "doi"),
            ("pid", "10.0/abc"),
            ("metadata_name", "Survey mapping"),
            ("metadata_description", "Maps the survey workbook"),
            ("current_version", "1.0"),
            ("metadata_version_status", "draft"),
            ("contact_name", "Data Team"),
            ("contact_role", "maintainer"),
            ("contact_email", "data@example.org"),
            ("validated_oims_metadata_schema", "Foresight data metametadata"),
        ];
        let mut rows = vec![vec!["Property", "value"]];
        rows.extend(
            properties
                .into_iter()
                .filter(|(name, _)| *name != skip)
                .map(|(name, value)| vec![name, value]),
        );
        Sheet::from_rows(MAPPING_METADATA_SHEET, rows)
    }

    fn mappings_sheet(rows: Vec<Vec<&str>>) -> Sheet {
        let mut all = vec![vec![
            "sheetname",
            "oims_section",
            "subsection",
            "content_object",
            "entity_class",
            "table_orientation",
        ]];
        all.extend(rows);
        Sheet::from_rows(MAPPINGS_SHEET, all)
    }

    #[test]
    fn shape_branches_follow_section() {
        let workbook = Workbook::from_sheets(vec![
            mappings_sheet(vec![
                vec!["MetadataFileDescriptors", "header", "", "", "dataset", "rows"],
                vec!["Dataset", "content", "", "DescriptiveMetadataDataset", "dataset", "rows"],
                vec!["Loose", "content", "", "", "", "columns"],
            ]),
            metadata_sheet_without(""),
        ]);

        let compiled = compile_mapping(&workbook, &CompileOptions::default()).unwrap();
        let content = &compiled.document.content;
        assert_eq!(content.len(), 3);

        assert_eq!(content[0].subsection.as_deref(), Some(DEFAULT_HEADER_SUBSECTION));
        assert_eq!(content[0].entity_class, None);

        assert_eq!(
            content[1].content_object.as_deref(),
            Some("DescriptiveMetadataDataset")
        );
        assert_eq!(content[1].entity_class.as_deref(), Some("dataset"));

        assert_eq!(content[2].content_object, None);
        assert_eq!(content[2].entity_class, None);
        assert!(content[2].attribute_pairs.is_empty());
    }

    #[test]
    fn rows_missing_mandatory_fields_are_skipped() {
        let workbook = Workbook::from_sheets(vec![
            mappings_sheet(vec![
                vec!["", "content", "", "Dataset", "dataset", "rows"],
                vec!["Dataset", "content", "", "Dataset", "dataset", ""],
                vec!["Dataset", "content", "", "Dataset", "dataset", "rows"],
            ]),
            metadata_sheet_without(""),
        ]);

        let compiled = compile_mapping(&workbook, &CompileOptions::default()).unwrap();
        assert_eq!(compiled.document.content.len(), 1);
        assert_eq!(compiled.document.content[0].table_orientation, "rows");
    }

    #[test]
    fn missing_metadata_property_is_named() {
        let workbook = Workbook::from_sheets(vec![
            mappings_sheet(vec![]),
            metadata_sheet_without("contact_role"),
        ]);
        let err = compile_mapping(&workbook, &CompileOptions::default()).unwrap_err();
        assert!(
            matches!(err, CompileError::MissingMetadataProperty { ref property } if property == "contact_role")
        );
    }

    #[test]
    fn missing_control_sheet_fails() {
        let workbook = Workbook::from_sheets(vec![mappings_sheet(vec![])]);
        let err = compile_mapping(&workbook, &CompileOptions::default()).unwrap_err();
        assert!(
            matches!(err, CompileError::MissingControlSheet { ref sheet } if sheet == MAPPING_METADATA_SHEET)
        );
    }

    #[test]
    fn header_is_assembled_from_properties() {
        let workbook =
            Workbook::from_sheets(vec![mappings_sheet(vec![]), metadata_sheet_without("")]);
        let options = CompileOptions {
            source_path: Some(PathBuf::from("/data/mapping.xlsx")),
            output_path: None,
            version_date: NaiveDate::from_ymd_opt(2024, 12, 10),
        };
        let compiled = compile_mapping(&workbook, &options).unwrap();
        let header = &compiled.document.header;

        assert_eq!(compiled.output_path, Some(PathBuf::from("/data/mapping.json")));
        assert_eq!(header.mapping_info.mapper_tool_name, MAPPER_TOOL_NAME);
        assert_eq!(
            header.mapping_info.input_parameters[1],
            ToolParameter::new("output_json_path", "/data/mapping.json")
        );
        assert_eq!(header.metadata_schema.schema_type, MAPPING_SCHEMA_TYPE);
        assert_eq!(header.metadata_schema.schema_pid.pid, "10.0/abc");
        assert_eq!(header.file_descriptors.metadata_version.version_date, "2024-12-10");
        assert_eq!(header.file_descriptors.metadata_pid.pid_scheme, "TBD");
        assert_eq!(
            header.file_descriptors.contact[0].contact_email,
            vec!["data@example.org".to_string()]
        );
        assert_eq!(header.validated_schema_name, "Foresight data metametadata");
        assert_eq!(header.metadata_class, MAPPINGS_METADATA_CLASS);
    }

    #[test]
    fn default_output_path_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("maps/mapping.xlsx")),
            PathBuf::from("maps/mapping.json")
        );
    }
}
