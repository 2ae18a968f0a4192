//! Import → validate → export, with timing and memory instrumentation.
//!
//! A [`Pipeline`] is built once per deployment (schema, policies, log handle) and then
//! [`Pipeline::run`] is called once per file. Failures from any stage propagate unchanged;
//! the stage that failed has already logged them.

mod memory;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::error::IngestionResult;
use crate::export::{ExportExtension, ExportOptions, export};
use crate::ingestion::{Source, import_file};
use crate::logging::Logger;
use crate::types::{Schema, Table};
use crate::validation::{MissingColumnPolicy, TypeErrorRecord, validate};

pub use memory::{MemoryProbe, SysinfoProbe};

/// Where the performance measurement stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementBoundary {
    /// Stop after validation; export runs outside the measured window.
    #[default]
    AfterValidation,
    /// Stop after the processed file has been written.
    AfterExport,
}

/// Per-deployment pipeline settings.
///
/// Use [`PipelineConfig::plain`] for command-line runs and [`PipelineConfig::http`] for the
/// upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub missing_columns: MissingColumnPolicy,
    pub export: ExportOptions,
    pub boundary: MeasurementBoundary,
    /// Drop rows containing any null before validation.
    pub drop_incomplete_rows: bool,
}

impl PipelineConfig {
    /// Missing columns only warn, output mirrors the input format, measurement ends after
    /// validation.
    pub fn plain() -> Self {
        Self {
            missing_columns: MissingColumnPolicy::WarnOnly,
            export: ExportOptions::default(),
            boundary: MeasurementBoundary::AfterValidation,
            drop_incomplete_rows: false,
        }
    }

    /// Missing columns are recorded, output is always CSV, incomplete rows are dropped and
    /// measurement ends after export.
    pub fn http() -> Self {
        Self {
            missing_columns: MissingColumnPolicy::Record,
            export: ExportOptions {
                extension: ExportExtension::ForceCsv,
                ..ExportOptions::default()
            },
            boundary: MeasurementBoundary::AfterExport,
            drop_incomplete_rows: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::plain()
    }
}

/// Elapsed wall time and resident-memory change of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Seconds, never negative.
    pub elapsed_secs: f64,
    /// Megabytes; negative when memory was released during the run.
    pub memory_delta_mb: f64,
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "import time = {:.2} seconds, memory used = {:.2} MB",
            self.elapsed_secs, self.memory_delta_mb
        )
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReport {
    pub table: Table,
    pub errors: Vec<TypeErrorRecord>,
    pub performance: PerformanceReport,
    pub output_path: PathBuf,
}

/// Runs the read → validate → write sequence for one deployment.
pub struct Pipeline {
    schema: Schema,
    config: PipelineConfig,
    log: Logger,
    memory: Arc<dyn MemoryProbe>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("schema_fields", &self.schema.fields.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Pipeline {
    /// Create a pipeline that measures memory with [`SysinfoProbe`].
    pub fn new(schema: Schema, config: PipelineConfig, log: Logger) -> Self {
        Self {
            schema,
            config,
            log,
            memory: Arc::new(SysinfoProbe::new()),
        }
    }

    /// Replace the memory probe.
    pub fn with_memory_probe(mut self, probe: Arc<dyn MemoryProbe>) -> Self {
        self.memory = probe;
        self
    }

    /// Import, validate and export `source`, measuring the configured window.
    pub fn run(&self, source: &Source) -> IngestionResult<IngestionReport> {
        let name = source.name();
        let _span = tracing::info_span!("ingest", source = %name).entered();

        let start = Instant::now();
        let mem_start = self.memory.resident_mb();

        let mut table = import_file(source, self.log.as_ref())?;
        if self.config.drop_incomplete_rows {
            table = table.drop_incomplete_rows();
        }

        let errors = validate(&table, &self.schema, self.config.missing_columns, self.log.as_ref());
        if errors.is_empty() {
            self.log.info(&format!("no type errors found in file {name}"));
        } else {
            self.log
                .warning(&format!("found {} type errors in file {name}", errors.len()));
        }

        let file_name = source.file_name();
        let (performance, output_path) = match self.config.boundary {
            MeasurementBoundary::AfterValidation => {
                let perf = self.finish_measurement(&name, start, mem_start);
                let path = export(&table, &file_name, &self.config.export, self.log.as_ref())?;
                (perf, path)
            }
            MeasurementBoundary::AfterExport => {
                let path = export(&table, &file_name, &self.config.export, self.log.as_ref())?;
                (self.finish_measurement(&name, start, mem_start), path)
            }
        };

        Ok(IngestionReport {
            table,
            errors,
            performance,
            output_path,
        })
    }

    fn finish_measurement(&self, name: &str, start: Instant, mem_start: f64) -> PerformanceReport {
        let mem_end = self.memory.resident_mb();
        let report = PerformanceReport {
            elapsed_secs: start.elapsed().as_secs_f64(),
            memory_delta_mb: mem_end - mem_start,
        };
        self.log
            .info(&format!("import performance for {name}: {report}"));
        report
    }
}
