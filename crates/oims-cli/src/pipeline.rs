//! Conversion pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Resolve**: pick the strategy from the identifier triple
//! 2. **Load**: open the workbook, read the schema, load or compile the mapping
//! 3. **Validate**: workbook vs. mapping, then mapping vs. schema
//! 4. **Transform**: run the strategy
//! 5. **Output**: write the OIMS document and the run report
//!
//! Strategy resolution runs first so an unimplemented strategy fails before
//! any input is read.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use oims_ingest::{Workbook, read_json_document, write_json_document};
use oims_map::compile_mapping_file;
use oims_model::{MappingDocument, OimsSection, OutputDocument, SchemaDocument};
use oims_transform::{
    MapperIds, MappingStrategy, RegistryConfig, Resolution, ResolutionRule, Resolver,
    default_registry, select_strategy,
};
use oims_validate::{SheetPolicy, WorkbookCheckSummary, validate_schema, validate_workbook};

use crate::report::write_report;
use crate::settings::{MappingFormat, Settings};

/// Per-run overrides on top of the settings file.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    /// Validate and transform without writing the output document.
    pub dry_run: bool,
    /// Write a compiled mapping next to an authored mapping workbook.
    pub write_compiled_mapping: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            report_path: None,
            dry_run: false,
            write_compiled_mapping: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub workbook_sheets: usize,
    pub sheet_mappings: usize,
    pub sheets_checked: usize,
    pub sheets_skipped: usize,
    pub sheets_missing_allowed: usize,
    pub labels_checked: usize,
    pub attribute_ids_checked: usize,
    pub header_subsections: usize,
    pub entities: usize,
    pub properties: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunPaths {
    pub workbook: PathBuf,
    pub mapping: PathBuf,
    pub schema: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiled_mapping: Option<PathBuf>,
    /// Unset for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

/// Mapped output per source sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub sheet: String,
    pub section: String,
    pub entities: usize,
    pub properties: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub ids: MapperIds,
    pub strategy: String,
    pub rule: ResolutionRule,
    pub generic_conversion: bool,
    pub dry_run: bool,
    pub counts: RunCounts,
    pub paths: RunPaths,
    pub sheets: Vec<SheetSummary>,
    #[serde(skip)]
    pub document: OutputDocument,
}

/// Run a full conversion.
pub fn run_conversion(settings: &Settings, options: &RunOptions) -> Result<RunResult> {
    let ids = settings.mapper_ids();
    let run_span = info_span!("conversion", mapping_id = %ids.mapping_id);
    let _run_guard = run_span.enter();

    let format = settings.validate().context("invalid settings")?;

    // =========================================================================
    // Stage 1: Resolve
    // =========================================================================
    let resolver = Resolver::new(load_registry(settings.path_to_mapper_registry.as_deref())?);
    let (resolution, strategy) = select_strategy(&resolver, default_registry(), &ids)
        .context("resolve mapping strategy")?;
    info!(
        strategy = strategy.name(),
        rule = %resolution.rule,
        generic_conversion = resolution.generic_conversion,
        "Selected strategy"
    );

    // =========================================================================
    // Stage 2: Load
    // =========================================================================
    let workbook = Workbook::open(&settings.path_to_primary_metadata)
        .context("open primary metadata workbook")?;
    let schema: SchemaDocument = read_json_document(&settings.path_to_oims_metadata_schema_file)
        .context("load metadata schema")?;
    let (mapping, compiled_mapping) = load_mapping(
        &settings.path_to_mapping_file,
        format,
        options.write_compiled_mapping,
    )?;

    // =========================================================================
    // Stage 3: Validate
    // =========================================================================
    let policy = settings.sheet_policy();
    let (workbook_check, attribute_ids_checked) =
        validate_inputs(&workbook, &mapping, &schema, &policy)?;
    let mapped = policy.without_skipped(&mapping);

    // =========================================================================
    // Stage 4: Transform
    // =========================================================================
    let document = transform(strategy, &workbook, &mapped, &schema)?;

    // =========================================================================
    // Stage 5: Output
    // =========================================================================
    let output_path = options
        .output_path
        .clone()
        .unwrap_or_else(|| settings.path_to_output_oims_metadata_file.clone());
    let output = if options.dry_run {
        info!(path = %output_path.display(), "Dry run, output not written");
        None
    } else {
        write_json_document(&output_path, &document).context("write OIMS metadata")?;
        info!(path = %output_path.display(), "Wrote OIMS metadata");
        Some(output_path)
    };

    let counts = RunCounts {
        workbook_sheets: workbook.sheet_names().len(),
        sheet_mappings: mapping.content.len(),
        sheets_checked: workbook_check.sheets_checked,
        sheets_skipped: workbook_check.sheets_skipped,
        sheets_missing_allowed: workbook_check.sheets_missing_allowed,
        labels_checked: workbook_check.labels_checked,
        attribute_ids_checked,
        header_subsections: document.header.subsections.len(),
        entities: document.content.len(),
        properties: document.property_count(),
    };

    let mut result = RunResult {
        ids,
        strategy: resolution.strategy,
        rule: resolution.rule,
        generic_conversion: resolution.generic_conversion,
        dry_run: options.dry_run,
        counts,
        paths: RunPaths {
            workbook: settings.path_to_primary_metadata.clone(),
            mapping: settings.path_to_mapping_file.clone(),
            schema: settings.path_to_oims_metadata_schema_file.clone(),
            compiled_mapping,
            output,
            report: None,
        },
        sheets: summarize_sheets(&mapped, &document),
        document,
    };

    let report_path = options
        .report_path
        .clone()
        .or_else(|| settings.report_path.clone());
    if let Some(path) = report_path {
        result.paths.report = Some(path.clone());
        write_report(&path, &result).context("write run report")?;
        info!(path = %path.display(), "Wrote run report");
    }

    Ok(result)
}

/// Load a TOML registry, or the built-in one.
pub fn load_registry(path: Option<&Path>) -> Result<RegistryConfig> {
    match path {
        Some(path) => RegistryConfig::load(path).context("load mapper registry"),
        None => Ok(RegistryConfig::default()),
    }
}

/// Resolve an identifier triple without running a conversion.
pub fn resolve_ids(ids: &MapperIds, registry: Option<&Path>) -> Result<Resolution> {
    let resolver = Resolver::new(load_registry(registry)?);
    let (resolution, _) = select_strategy(&resolver, default_registry(), ids)
        .context("resolve mapping strategy")?;
    Ok(resolution)
}

/// Read a canonical mapping document, or compile an authored workbook.
///
/// Returns the document and, when a compiled mapping was written, its path.
pub fn load_mapping(
    path: &Path,
    format: MappingFormat,
    write_compiled: bool,
) -> Result<(MappingDocument, Option<PathBuf>)> {
    let _span = info_span!("load_mapping", path = %path.display()).entered();
    match format {
        MappingFormat::Json => {
            let document = read_json_document(path).context("load mapping document")?;
            Ok((document, None))
        }
        MappingFormat::Workbook => {
            let compiled = compile_mapping_file(path, None).context("compile mapping workbook")?;
            let written = if write_compiled {
                compiled
                    .write()
                    .context("write compiled mapping")?
                    .map(Path::to_path_buf)
            } else {
                None
            };
            Ok((compiled.document, written))
        }
    }
}

/// Pass A then Pass B. Returns the workbook summary and the number of
/// attribute ids checked against the schema.
///
/// Sheets the policy skips are left out of both passes.
pub fn validate_inputs(
    workbook: &Workbook,
    mapping: &MappingDocument,
    schema: &SchemaDocument,
    policy: &SheetPolicy,
) -> Result<(WorkbookCheckSummary, usize)> {
    let summary =
        validate_workbook(workbook, mapping, policy).context("workbook does not match mapping")?;
    info!(
        sheets = summary.sheets_checked,
        labels = summary.labels_checked,
        "Workbook matches mapping"
    );
    let checked = validate_schema(&policy.without_skipped(mapping), schema)
        .context("mapping does not match schema")?;
    info!(attribute_ids = checked, "Mapping matches schema");
    Ok((summary, checked))
}

fn transform(
    strategy: &dyn MappingStrategy,
    workbook: &Workbook,
    mapping: &MappingDocument,
    schema: &SchemaDocument,
) -> Result<OutputDocument> {
    let _span = info_span!("transform", strategy = strategy.name()).entered();
    let document = strategy
        .map(workbook, mapping, schema)
        .with_context(|| format!("{} failed", strategy.name()))?;
    info!(
        entities = document.content.len(),
        properties = document.property_count(),
        "Transformed workbook"
    );
    Ok(document)
}

/// One row per mapped sheet, in mapping order.
///
/// Header sheets sharing a subsection each claim the properties their pairs
/// name, first sheet first, so every property is counted once.
fn summarize_sheets(mapping: &MappingDocument, document: &OutputDocument) -> Vec<SheetSummary> {
    let mut content: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for entity in &document.content {
        let entry = content.entry(entity.source_sheet.as_str()).or_default();
        entry.0 += 1;
        entry.1 += entity.properties.len();
    }

    let mut claimed: BTreeSet<(&str, &str)> = BTreeSet::new();
    let mut summaries: Vec<SheetSummary> = Vec::new();
    for sheet_mapping in &mapping.content {
        let sheet = sheet_mapping.sheetname.as_str();
        let (entities, properties) = match sheet_mapping.section() {
            Some(OimsSection::Header) => {
                let name = sheet_mapping.subsection_or_default();
                let properties = document.header.subsections.get(name).map_or(0, |subsection| {
                    sheet_mapping
                        .attribute_pairs
                        .iter()
                        .filter_map(|pair| pair.oims_attribute_id.as_deref())
                        .filter(|id| subsection.properties.contains_key(*id))
                        .filter(|id| claimed.insert((name, *id)))
                        .count()
                });
                (0, properties)
            }
            _ if summaries.iter().any(|summary| summary.sheet == sheet) => continue,
            _ => content.get(sheet).copied().unwrap_or_default(),
        };
        match summaries.iter_mut().find(|summary| summary.sheet == sheet) {
            Some(summary) => summary.properties += properties,
            None => summaries.push(SheetSummary {
                sheet: sheet.to_string(),
                section: sheet_mapping.oims_section.clone(),
                entities,
                properties,
            }),
        }
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shared_header_subsection_is_counted_once() {
        let header_sheet = |name: &str, ids: &[&str]| {
            json!({
                "sheetname": name,
                "oims_section": "header",
                "subsection": "file_descriptors",
                "table_orientation": "rows",
                "attribute_pairs": ids
                    .iter()
                    .map(|id| json!({"oims_attribute_id": id, "excel_value_loc_range_start": "B1"}))
                    .collect::<Vec<_>>()
            })
        };
        let mapping: MappingDocument = serde_json::from_value(json!({
            "header": {"validated_schema_name": "Foresight data metametadata"},
            "content": [
                header_sheet("Descriptors", &["metadata_name", "keywords"]),
                header_sheet("MoreDescriptors", &["keywords", "version"]),
            ]
        }))
        .unwrap();
        let document: OutputDocument = serde_json::from_value(json!({
            "header": {
                "mapping_info": {"mapper_tool_name": "ConvertMappingExcel", "version": "0.1.0"},
                "converter": {"tool_name": "oims-convert", "version": "0.1.0", "strategy": "GenericMapper"},
                "file_descriptors": {"metadata_name": "Survey", "keywords": "maize", "version": "2"}
            },
            "content": []
        }))
        .unwrap();

        let summaries = summarize_sheets(&mapping, &document);
        let counts: Vec<(&str, usize)> = summaries
            .iter()
            .map(|summary| (summary.sheet.as_str(), summary.properties))
            .collect();
        assert_eq!(counts, vec![("Descriptors", 2), ("MoreDescriptors", 1)]);
        assert_eq!(
            counts.iter().map(|(_, count)| count).sum::<usize>(),
            document.property_count()
        );
    }
}
