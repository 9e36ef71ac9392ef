//! Mapping compilation.
//!
//! Turns an author-facing mapping workbook (control sheets plus one
//! attribute sheet per mapped sheet) into the canonical [`MappingDocument`]
//! consumed by validation and transformation.
//!
//! [`MappingDocument`]: oims_model::MappingDocument

mod compiler;
mod error;

pub use compiler::{
    CompileOptions, CompiledMapping, MAPPER_TOOL_NAME, MAPPING_METADATA_SHEET, MAPPINGS_SHEET,
    compile_mapping, compile_mapping_file, default_output_path,
};
pub use error::{CompileError, Result};
