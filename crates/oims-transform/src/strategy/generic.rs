//! Generic strategies usable with any structurally valid mapping.

use oims_ingest::Workbook;
use oims_model::{MappingDocument, OutputDocument, SchemaDocument};

use super::MappingStrategy;
use super::engine::{EngineOptions, build_document};
use crate::error::Result;
use crate::registry::{EXTENDED_GENERIC_MAPPER, GENERIC_MAPPER};

/// Fallback strategy: maps every pair that has an attribute id and a value
/// start cell.
pub struct GenericMapper;

impl MappingStrategy for GenericMapper {
    fn name(&self) -> &'static str {
        GENERIC_MAPPER
    }

    fn description(&self) -> &'static str {
        "Maps every located attribute pair"
    }

    fn map(
        &self,
        workbook: &Workbook,
        mapping: &MappingDocument,
        schema: &SchemaDocument,
    ) -> Result<OutputDocument> {
        build_document(
            self.name(),
            EngineOptions::default(),
            workbook,
            mapping,
            schema,
        )
    }
}

/// Generic mapping plus comment cells referenced from `user_comments`.
pub struct ExtendedGenericMapper;

impl MappingStrategy for ExtendedGenericMapper {
    fn name(&self) -> &'static str {
        EXTENDED_GENERIC_MAPPER
    }

    fn description(&self) -> &'static str {
        "Generic mapping with user comment cells"
    }

    fn map(
        &self,
        workbook: &Workbook,
        mapping: &MappingDocument,
        schema: &SchemaDocument,
    ) -> Result<OutputDocument> {
        let options = EngineOptions {
            collect_comments: true,
            ..EngineOptions::default()
        };
        build_document(self.name(), options, workbook, mapping, schema)
    }
}
