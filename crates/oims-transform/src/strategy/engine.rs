//! Cell-run extraction shared by every strategy.
//!
//! Each attribute pair names the cell where its values start. Values run
//! from there to the edge of the sheet, along the row for `rows` mappings and
//! down the column for `columns` mappings. Empty cells are never written.

use indexmap::IndexMap;
use oims_ingest::{Sheet, Workbook};
use oims_model::{
    AttributePair, CellRef, ConverterInfo, EntityObject, FieldValue, HEADER_COMMENTS_KEY,
    HeaderSubsection, MappingDocument, OimsSection, OutputDocument, OutputHeader, Properties,
    RESERVED_HEADER_KEYS, SchemaDocument, SheetMapping, TableOrientation,
};

use crate::error::{Result, TransformError};

/// Tool name recorded in output headers.
pub const CONVERTER_TOOL_NAME: &str = "oims-convert";

/// Behavior switches distinguishing the strategies.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EngineOptions {
    /// Map only pairs whose information type is a field value.
    pub field_values_only: bool,
    /// Read `user_comments` cell references into `comments`.
    pub collect_comments: bool,
    /// Order properties by schema attribute order and record the schema
    /// block of each entity.
    pub schema_guided: bool,
}

/// One attribute pair with resolved cell references.
struct PairRun<'a> {
    attribute_id: &'a str,
    start: CellRef,
    comment: Option<CellRef>,
}

impl PairRun<'_> {
    fn value(&self, sheet: &Sheet, orientation: TableOrientation, step: usize) -> Option<String> {
        let (row, column) = self.start.step(orientation, step);
        sheet.get(row, column).text()
    }

    fn comment(&self, sheet: &Sheet, orientation: TableOrientation, step: usize) -> Option<String> {
        let (row, column) = self.comment?.step(orientation, step);
        sheet.get(row, column).text()
    }

    /// Number of cells between the start cell and the sheet edge.
    fn len(&self, sheet: &Sheet, orientation: TableOrientation) -> usize {
        match orientation {
            TableOrientation::Rows => sheet.width().saturating_sub(self.start.column()),
            TableOrientation::Columns => sheet.height().saturating_sub(self.start.row()),
        }
    }
}

pub(crate) fn build_document(
    strategy: &'static str,
    options: EngineOptions,
    workbook: &Workbook,
    mapping: &MappingDocument,
    schema: &SchemaDocument,
) -> Result<OutputDocument> {
    let mut subsections: IndexMap<String, HeaderSubsection> = IndexMap::new();
    let mut content = Vec::new();

    for sheet_mapping in &mapping.content {
        let sheetname = sheet_mapping.sheetname.as_str();
        let Some(sheet) = workbook.sheet(sheetname) else {
            tracing::info!(sheet = %sheetname, "Sheet not in workbook, nothing mapped");
            continue;
        };
        let Some(orientation) = sheet_mapping.orientation() else {
            tracing::warn!(
                sheet = %sheetname,
                orientation = %sheet_mapping.table_orientation,
                "Invalid table orientation, sheet not mapped"
            );
            continue;
        };
        let runs = pair_runs(sheet_mapping, options)?;

        match sheet_mapping.section() {
            Some(OimsSection::Header) => {
                let name = sheet_mapping.subsection_or_default();
                if RESERVED_HEADER_KEYS.contains(&name) {
                    tracing::warn!(
                        sheet = %sheetname,
                        subsection = %name,
                        "Subsection name is reserved for the converter, sheet not mapped"
                    );
                    continue;
                }
                if options.collect_comments
                    && let Some(run) = runs.iter().find(|r| r.attribute_id == HEADER_COMMENTS_KEY)
                {
                    return Err(TransformError::ReservedAttributeId {
                        sheet: sheetname.to_string(),
                        attribute_id: run.attribute_id.to_string(),
                    });
                }
                let subsection = subsections.entry(name.to_string()).or_default();
                map_header(sheet, orientation, &runs, subsection);
                if options.schema_guided {
                    sort_by_schema(&mut subsection.properties, schema);
                }
            }
            Some(OimsSection::Content) => {
                let entities =
                    map_content(sheet, orientation, &runs, sheet_mapping, schema, options);
                tracing::debug!(sheet = %sheetname, entities = entities.len(), "Mapped content sheet");
                content.extend(entities);
            }
            None => {
                tracing::warn!(
                    sheet = %sheetname,
                    section = %sheet_mapping.oims_section,
                    "Unrecognized oims_section, sheet not mapped"
                );
            }
        }
    }

    let document = OutputDocument {
        header: OutputHeader {
            mapping_info: mapping.header.mapping_info.clone(),
            converter: ConverterInfo {
                tool_name: CONVERTER_TOOL_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                strategy: strategy.to_string(),
            },
            subsections,
        },
        content,
    };
    tracing::info!(
        strategy,
        entities = document.content.len(),
        properties = document.property_count(),
        "Built output document"
    );
    Ok(document)
}

fn pair_runs(sheet_mapping: &SheetMapping, options: EngineOptions) -> Result<Vec<PairRun<'_>>> {
    let mut runs = Vec::new();
    for pair in &sheet_mapping.attribute_pairs {
        if options.field_values_only && !pair.is_field_value() {
            continue;
        }
        let (Some(attribute_id), Some(start)) = (
            pair.oims_attribute_id.as_deref(),
            pair.excel_value_loc_range_start.as_deref(),
        ) else {
            continue;
        };
        let start = CellRef::parse(start).map_err(|source| TransformError::InvalidLocation {
            sheet: sheet_mapping.sheetname.clone(),
            source,
        })?;
        let comment = if options.collect_comments {
            comment_cell(pair)
        } else {
            None
        };
        runs.push(PairRun {
            attribute_id,
            start,
            comment,
        });
    }
    Ok(runs)
}

/// `user_comments` holding a cell reference; free-text comments yield `None`.
fn comment_cell(pair: &AttributePair) -> Option<CellRef> {
    pair.user_comments
        .as_deref()
        .and_then(|text| CellRef::parse(text.trim()).ok())
}

fn map_header(
    sheet: &Sheet,
    orientation: TableOrientation,
    runs: &[PairRun<'_>],
    subsection: &mut HeaderSubsection,
) {
    for run in runs {
        let values: Vec<String> = (0..run.len(sheet, orientation))
            .filter_map(|step| run.value(sheet, orientation, step))
            .collect();
        if let Some(value) = FieldValue::from_values(values) {
            subsection
                .properties
                .insert(run.attribute_id.to_string(), value);
        }
        if let Some(comment) = run.comment(sheet, orientation, 0) {
            subsection
                .comments
                .insert(run.attribute_id.to_string(), comment);
        }
    }
}

fn map_content(
    sheet: &Sheet,
    orientation: TableOrientation,
    runs: &[PairRun<'_>],
    sheet_mapping: &SheetMapping,
    schema: &SchemaDocument,
    options: EngineOptions,
) -> Vec<EntityObject> {
    let schema_block = if options.schema_guided {
        sheet_mapping
            .content_object
            .as_deref()
            .filter(|name| schema.block(name).is_some())
            .map(str::to_string)
    } else {
        None
    };

    let instances = runs
        .iter()
        .map(|run| run.len(sheet, orientation))
        .max()
        .unwrap_or(0);

    let mut entities = Vec::new();
    for step in 0..instances {
        let mut properties = Properties::new();
        let mut comments = IndexMap::new();
        for run in runs {
            if let Some(value) = run.value(sheet, orientation, step) {
                properties.insert(run.attribute_id.to_string(), FieldValue::Single(value));
            }
            if let Some(comment) = run.comment(sheet, orientation, step) {
                comments.insert(run.attribute_id.to_string(), comment);
            }
        }
        if properties.is_empty() {
            continue;
        }
        if options.schema_guided {
            sort_by_schema(&mut properties, schema);
        }
        entities.push(EntityObject {
            content_object: sheet_mapping.content_object.clone(),
            entity_class: sheet_mapping.entity_class.clone(),
            source_sheet: sheet_mapping.sheetname.clone(),
            schema_block: schema_block.clone(),
            properties,
            comments,
        });
    }
    entities
}

/// Stable sort by schema attribute order; unknown ids keep their relative
/// order after the known ones.
fn sort_by_schema(properties: &mut Properties, schema: &SchemaDocument) {
    let rank = |id: &str| schema.attribute_position(id).unwrap_or(usize::MAX);
    properties.sort_by(|a, _, b, _| rank(a).cmp(&rank(b)));
}
