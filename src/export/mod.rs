//! Writing processed tables back to disk.
//!
//! [`export`] resolves `<output_dir>/<stem>_processed.<ext>` from the original file name and
//! serializes the table with the matching writer. Existing output is overwritten.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FormatError, IngestionError, IngestionResult};
use crate::ingestion::FileFormat;
use crate::logging::LogSink;
use crate::types::Table;

/// Suffix appended to the input file stem.
pub const PROCESSED_SUFFIX: &str = "_processed";

/// How the output extension is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportExtension {
    /// csv→csv, tsv→tsv, json→json, xls/xlsx→xlsx.
    #[default]
    MirrorInput,
    /// Always write CSV, whatever the input format was.
    ForceCsv,
}

/// Where and how [`export`] writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub extension: ExportExtension,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("processed"),
            extension: ExportExtension::default(),
        }
    }
}

/// Output format for an input of `input` format under `policy`.
pub fn output_format(input: FileFormat, policy: ExportExtension) -> FileFormat {
    match policy {
        ExportExtension::MirrorInput => input,
        ExportExtension::ForceCsv => FileFormat::Csv,
    }
}

/// Output path for `original_filename`, without touching the filesystem.
pub fn output_path_for(original_filename: &str, options: &ExportOptions) -> IngestionResult<PathBuf> {
    let input = FileFormat::from_file_name(original_filename)?;
    let ext = output_format(input, options.extension).output_extension();
    let stem = Path::new(original_filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(options
        .output_dir
        .join(format!("{stem}{PROCESSED_SUFFIX}.{ext}")))
}

/// Serialize `table` next to the other processed outputs and return the written path.
///
/// The input extension is checked before the output directory is created, so an unsupported
/// name leaves the filesystem untouched.
pub fn export(
    table: &Table,
    original_filename: &str,
    options: &ExportOptions,
    log: &dyn LogSink,
) -> IngestionResult<PathBuf> {
    let input = FileFormat::from_file_name(original_filename)?;
    let path = output_path_for(original_filename, options)?;

    write_table(table, output_format(input, options.extension), &options.output_dir, &path)
        .map_err(|source| IngestionError::ExportFailure {
            path: path.clone(),
            source,
        })?;

    log.info(&format!("table saved to {}", path.display()));
    Ok(path)
}

fn write_table(table: &Table, format: FileFormat, dir: &Path, path: &Path) -> Result<(), FormatError> {
    fs::create_dir_all(dir)?;
    match format {
        FileFormat::Csv => csv::write_delimited(table, path, b','),
        FileFormat::Tsv => csv::write_delimited(table, path, b'\t'),
        FileFormat::Json => json::write_ndjson(table, path),
        FileFormat::Xls | FileFormat::Xlsx => write_xlsx(table, path),
    }
}

fn write_xlsx(table: &Table, path: &Path) -> Result<(), FormatError> {
    #[cfg(feature = "excel")]
    {
        excel::write_xlsx(table, path)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (table, path);
        Err(FormatError::malformed(
            "spreadsheet engine not enabled (enable cargo feature 'excel')",
        ))
    }
}
