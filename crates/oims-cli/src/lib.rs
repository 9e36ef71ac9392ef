//! Library side of the `oims-convert` binary: run settings, logging setup,
//! the conversion pipeline and the run report.

pub mod logging;
pub mod pipeline;
pub mod report;
pub mod settings;
