//! OIMS document model.
//!
//! This crate provides the types shared by every stage of the converter:
//!
//! - [`mapping`]: canonical mapping document (sheet mappings, attribute pairs)
//! - [`schema`]: OIMS metadata schema (canonical name, attribute vocabulary)
//! - [`output`]: OIMS output document built by a transformation strategy
//! - [`enums`]: controlled vocabularies (section, orientation, entity class)
//! - [`location`]: spreadsheet cell references (`"B7"` → `(6, 1)`)

pub mod enums;
pub mod location;
pub mod mapping;
pub mod output;
pub mod schema;

pub use enums::{EntityClass, HEADER_SUBSECTIONS, OimsSection, TableOrientation};
pub use location::{CellRef, LocationError, MAX_COLUMNS};
pub use mapping::{
    AttributePair, Contact, DEFAULT_HEADER_SUBSECTION, FileDescriptors, MAPPING_SCHEMA_TYPE,
    MAPPINGS_METADATA_CLASS, METADATA_FIELD_VALUE, MappingDocument, MappingHeader, MappingInfo,
    MetadataSchema, MetadataVersion, PersistentId, SheetMapping, ToolParameter,
};
pub use output::{
    ConverterInfo, EntityObject, FieldValue, HEADER_COMMENTS_KEY, HeaderSubsection, OutputDocument,
    OutputHeader, Properties, RESERVED_HEADER_KEYS,
};
pub use schema::{EntityBlock, SchemaAttribute, SchemaDocument, SchemaFileDescriptors};
