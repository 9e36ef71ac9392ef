//! Workbook and document ingestion for the OIMS converter.
//!
//! # Features
//!
//! - **Workbook Loading**: Read xlsx/xls/xlsb/ods workbooks through calamine
//!   into absolute-coordinate sheet grids
//! - **Attribute Pair Extraction**: Read the attribute sheets of an authored
//!   mapping workbook
//! - **JSON Documents**: Load mapping and schema documents, write output
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use oims_ingest::{Workbook, extract_attribute_pairs, read_json_document};
//! use oims_model::SchemaDocument;
//!
//! let workbook = Workbook::open(Path::new("mapping.xlsx"))?;
//! let pairs = extract_attribute_pairs(&workbook, "DescriptiveMetadataDataset");
//! let schema: SchemaDocument = read_json_document(Path::new("schema.json"))?;
//! ```

mod error;
mod json;
mod pairs;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Workbook Reading ===
pub use workbook::{CellValue, Sheet, SheetRecord, Workbook};

// === Attribute Pairs ===
pub use pairs::extract_attribute_pairs;

// === JSON Documents ===
pub use json::{read_json_document, to_pretty_json, write_json_document};
