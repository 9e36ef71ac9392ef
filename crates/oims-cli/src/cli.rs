//! CLI argument definitions for the OIMS converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "oims-convert",
    version,
    about = "Convert spreadsheet metadata to OIMS JSON",
    long_about = "Convert metadata authored in spreadsheet workbooks into OIMS JSON documents.\n\n\
                  A mapping document says which cells feed which schema attributes; the\n\
                  workbook is checked against the mapping and the mapping against the\n\
                  schema before a conversion strategy runs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a conversion described by a settings file.
    Run(RunArgs),

    /// Compile a mapping workbook into a mapping document.
    CompileMapping(CompileMappingArgs),

    /// Check a workbook against a mapping, and optionally a schema.
    Validate(ValidateArgs),

    /// Show which strategy an identifier triple resolves to.
    Resolve(ResolveArgs),

    /// List registered mappings and implemented strategies.
    Mappers(MappersArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Settings JSON file.
    #[arg(long = "settings", value_name = "FILE")]
    pub settings: PathBuf,

    /// Output file (overrides path_to_output_oims_metadata_file).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Run report file (overrides report_path).
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Validate and transform without writing the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Do not write the compiled mapping next to a mapping workbook.
    #[arg(long = "no-write-compiled-mapping")]
    pub no_write_compiled_mapping: bool,
}

#[derive(Parser)]
pub struct CompileMappingArgs {
    /// Mapping workbook to compile.
    #[arg(value_name = "MAPPING_XLSX")]
    pub mapping: PathBuf,

    /// Output file (default: the workbook path with a .json extension).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Primary metadata workbook.
    #[arg(long = "workbook", value_name = "FILE")]
    pub workbook: PathBuf,

    /// Mapping document (.json) or mapping workbook.
    #[arg(long = "mapping", value_name = "FILE")]
    pub mapping: PathBuf,

    /// Schema document; enables the attribute id check.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Sheet that may be missing from the workbook (repeatable).
    #[arg(long = "allow-missing", value_name = "SHEET")]
    pub allow_missing: Vec<String>,

    /// Sheet to leave unchecked (repeatable).
    #[arg(long = "skip", value_name = "SHEET")]
    pub skip: Vec<String>,
}

#[derive(Parser)]
pub struct ResolveArgs {
    #[arg(long = "mapping-id", value_name = "ID")]
    pub mapping_id: String,

    #[arg(long = "classification-id", value_name = "ID")]
    pub classification_id: String,

    #[arg(long = "schema-id", value_name = "ID")]
    pub schema_id: String,

    /// TOML registry replacing the built-in one.
    #[arg(long = "registry", value_name = "FILE")]
    pub registry: Option<PathBuf>,
}

#[derive(Parser)]
pub struct MappersArgs {
    /// TOML registry replacing the built-in one.
    #[arg(long = "registry", value_name = "FILE")]
    pub registry: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
