//! Consistency checks, run in order before any transformation.

pub mod schema;
pub mod workbook;
