use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::logging::LogLevel;
use crate::schema::SchemaPreset;
use crate::validation::MissingColumnPolicy;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Import tabular files, check cell types against an expected schema, and write the processed output"
)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import one file, validate it and write `<stem>_processed.<ext>`
    Import(ImportArgs),
    /// Serve `POST /upload/` and `GET /logs/`
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Append-only log file
    #[arg(long, global = true, default_value = "import_log.log")]
    pub log_file: PathBuf,
    /// Minimum level written to the log file
    #[arg(long, global = true, value_enum, default_value_t = LogLevelArg::Debug)]
    pub log_level: LogLevelArg,
    /// Directory receiving processed files
    #[arg(long, global = true, default_value = "processed")]
    pub output_dir: PathBuf,
    /// JSON schema file; overrides the preset
    #[arg(long, global = true)]
    pub schema_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Input file (csv, tsv, json, xls, xlsx)
    pub input: PathBuf,
    /// Built-in expected schema
    #[arg(long, default_value = "customers")]
    pub schema: SchemaPreset,
    /// Handling of schema columns absent from the file
    #[arg(long, value_enum, default_value_t = MissingColumnsArg::Warn)]
    pub missing_columns: MissingColumnsArg,
    /// Always write CSV output
    #[arg(long)]
    pub force_csv: bool,
    /// Number of rows printed after processing
    #[arg(long, default_value_t = 10)]
    pub preview_rows: usize,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: String,
    /// Built-in expected schema
    #[arg(long, default_value = "emissions")]
    pub schema: SchemaPreset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingColumnsArg {
    /// Log a warning only
    Warn,
    /// Log a warning and report a `missing` error record
    Record,
}

impl From<MissingColumnsArg> for MissingColumnPolicy {
    fn from(value: MissingColumnsArg) -> Self {
        match value {
            MissingColumnsArg::Warn => MissingColumnPolicy::WarnOnly,
            MissingColumnsArg::Record => MissingColumnPolicy::Record,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Debug,
    Info,
    Warning,
    Error,
}

impl From<LogLevelArg> for LogLevel {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Warning => LogLevel::Warning,
            LogLevelArg::Error => LogLevel::Error,
        }
    }
}
