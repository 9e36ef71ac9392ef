//! JSON run report.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use oims_ingest::write_json_document;

use crate::pipeline::RunResult;

pub const REPORT_SCHEMA: &str = "oims-convert.run-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct RunReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    status: &'static str,
    converter_version: &'static str,
    #[serde(flatten)]
    result: &'a RunResult,
}

/// Write the report for a completed run.
pub fn write_report(path: &Path, result: &RunResult) -> oims_ingest::Result<()> {
    let payload = RunReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        status: "success",
        converter_version: env!("CARGO_PKG_VERSION"),
        result,
    };
    write_json_document(path, &payload)
}
