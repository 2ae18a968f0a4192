//! `tabular-ingest` loads CSV, TSV, JSON and Excel files into an in-memory
//! [`types::Table`], checks every cell's runtime type against an expected
//! [`types::Schema`], and writes the processed table back out.
//!
//! The primary entrypoint is [`pipeline::Pipeline::run`], which imports a file
//! ([`ingestion::import_file`]), validates it ([`validation::validate`]), writes
//! `<stem>_processed.<ext>` ([`export::export`]) and reports elapsed time and memory delta.
//!
//! ## Cell types
//!
//! Readers type each cell on its own: CSV/TSV text is inferred (`1` is an integer,
//! `1.5` a float, `true` a boolean, anything else a string), JSON keeps its own types
//! (`"5"` stays a string), spreadsheet numbers are integers when whole. Validation compares
//! these runtime types strictly against the schema, so a numeric-looking string in an integer
//! column is reported rather than silently converted.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tabular_ingest::ingestion::Source;
//! use tabular_ingest::logging::FileLogSink;
//! use tabular_ingest::pipeline::{Pipeline, PipelineConfig};
//! use tabular_ingest::types::{DataType, Field, Schema};
//!
//! # fn main() -> Result<(), tabular_ingest::IngestionError> {
//! let schema = Schema::new(vec![
//!     Field::new("Index", DataType::Int64),
//!     Field::new("Name", DataType::Utf8),
//! ]);
//! let log = Arc::new(FileLogSink::new("import_log.log"));
//! let pipeline = Pipeline::new(schema, PipelineConfig::plain(), log);
//!
//! let report = pipeline.run(&Source::path("people.csv"))?;
//! for e in &report.errors {
//!     println!("row {} column {}: {} is {}", e.row, e.column, e.value, e.observed);
//! }
//! println!("written to {}", report.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format detection and readers
//! - [`validation`]: strict cell-type validation
//! - [`export`]: writers for processed output
//! - [`pipeline`]: the measured import → validate → export sequence
//! - [`logging`]: injectable log sinks
//! - [`schema`]: built-in schemas and schema files
//! - [`server`]: the HTTP upload endpoint
//! - [`types`], [`error`]: data model and error types

pub mod cli;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod logging;
pub mod pipeline;
pub mod schema;
pub mod server;
pub mod types;
pub mod validation;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::cli::{Cli, CommonArgs, Commands, ImportArgs, ServeArgs};
use crate::export::ExportExtension;
use crate::export::csv::format_cell;
use crate::ingestion::Source;
use crate::logging::Logger;
use crate::pipeline::{Pipeline, PipelineConfig};
use crate::schema::SchemaPreset;
use crate::server::UploadService;
use crate::types::{Schema, Table};

pub use error::{FormatError, IngestionError, IngestionResult};

/// Command-line entrypoint.
pub fn run() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();
    let log = logging::file_logger(&cli.common.log_file, cli.common.log_level.into());
    match &cli.command {
        Commands::Import(args) => handle_import(&cli.common, args, log),
        Commands::Serve(args) => handle_serve(&cli.common, args, log),
    }
}

fn resolve_schema(schema_file: Option<&Path>, preset: SchemaPreset) -> Result<Schema> {
    match schema_file {
        Some(path) => schema::load_schema_file(path)
            .with_context(|| format!("Loading schema from {path:?}")),
        None => Ok(preset.schema()),
    }
}

fn handle_import(common: &CommonArgs, args: &ImportArgs, log: Logger) -> Result<()> {
    let schema = resolve_schema(common.schema_file.as_deref(), args.schema)?;
    info!(
        "Importing '{}' against {} expected column(s)",
        args.input.display(),
        schema.fields.len()
    );

    let mut config = PipelineConfig::plain();
    config.missing_columns = args.missing_columns.into();
    config.export.output_dir = common.output_dir.clone();
    if args.force_csv {
        config.export.extension = ExportExtension::ForceCsv;
    }

    let pipeline = Pipeline::new(schema, config, log);
    let report = pipeline
        .run(&Source::path(args.input.clone()))
        .with_context(|| format!("Processing {:?}", args.input))?;

    println!("Import time: {:.2} seconds", report.performance.elapsed_secs);
    println!("Memory used: {:.2} MB", report.performance.memory_delta_mb);
    println!("Type errors: {}", report.errors.len());
    println!("Table saved to: {}", report.output_path.display());
    print_preview(&report.table, args.preview_rows);
    Ok(())
}

fn print_preview(table: &Table, rows: usize) {
    if rows == 0 {
        return;
    }
    println!("{}", table.columns.join("\t"));
    for row in table.rows.iter().take(rows) {
        let cells: Vec<String> = row.iter().map(format_cell).collect();
        println!("{}", cells.join("\t"));
    }
}

fn handle_serve(common: &CommonArgs, args: &ServeArgs, log: Logger) -> Result<()> {
    let schema = resolve_schema(common.schema_file.as_deref(), args.schema)?;

    let mut config = PipelineConfig::http();
    config.export.output_dir = common.output_dir.clone();

    let service = UploadService {
        pipeline: Pipeline::new(schema, config, log),
        log_file: common.log_file.clone(),
    };
    server::serve(&args.addr, &service).with_context(|| format!("Serving on {}", args.addr))
}
