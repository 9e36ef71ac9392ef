//! Schema-guided strategies for Foresight mappings.
//!
//! Only field-value pairs are mapped. Properties follow the schema's
//! attribute order and every entity records the schema block it belongs to.

use oims_ingest::Workbook;
use oims_model::{MappingDocument, OutputDocument, SchemaDocument};

use super::MappingStrategy;
use super::engine::{EngineOptions, build_document};
use crate::error::Result;
use crate::registry::{GENNOVATE_MAPPER, STANDARD_FORESIGHT_MAPPER};

const SCHEMA_GUIDED: EngineOptions = EngineOptions {
    field_values_only: true,
    collect_comments: false,
    schema_guided: true,
};

pub struct StandardForesightMapper;

impl MappingStrategy for StandardForesightMapper {
    fn name(&self) -> &'static str {
        STANDARD_FORESIGHT_MAPPER
    }

    fn description(&self) -> &'static str {
        "Schema-ordered mapping for Foresight workbooks"
    }

    fn map(
        &self,
        workbook: &Workbook,
        mapping: &MappingDocument,
        schema: &SchemaDocument,
    ) -> Result<OutputDocument> {
        build_document(self.name(), SCHEMA_GUIDED, workbook, mapping, schema)
    }
}

/// Strategy registered for the `GENNOVATE_001` mapping.
pub struct GennovateMapper;

impl MappingStrategy for GennovateMapper {
    fn name(&self) -> &'static str {
        GENNOVATE_MAPPER
    }

    fn description(&self) -> &'static str {
        "Schema-ordered mapping for the GENNOVATE workbook"
    }

    fn map(
        &self,
        workbook: &Workbook,
        mapping: &MappingDocument,
        schema: &SchemaDocument,
    ) -> Result<OutputDocument> {
        build_document(self.name(), SCHEMA_GUIDED, workbook, mapping, schema)
    }
}
