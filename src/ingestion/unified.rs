//! Unified ingestion entrypoint.
//!
//! Most callers should use [`import_file`], which picks a reader from the source's file
//! extension and reads the whole input into an in-memory [`crate::types::Table`].

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{FormatError, IngestionError, IngestionResult};
use crate::logging::LogSink;
use crate::types::Table;

use super::{csv, json};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// JSON records, NDJSON or column-oriented JSON.
    Json,
    /// Legacy Excel workbook.
    Xls,
    /// Excel workbook.
    Xlsx,
}

impl FileFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "json" => Some(Self::Json),
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Resolve the format of a file name, failing with
    /// [`IngestionError::UnsupportedFormat`] for anything else.
    pub fn from_file_name(name: &str) -> IngestionResult<Self> {
        let ext = extension_of(name);
        Self::from_extension(&ext).ok_or(IngestionError::UnsupportedFormat { extension: ext })
    }

    /// Extension of the processed output file written for an input of this format.
    pub fn output_extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Xls | Self::Xlsx => "xlsx",
        }
    }
}

/// Lowercase text after the last `.` of the final path component.
///
/// A name without a dot yields the whole name, which no format accepts.
pub fn extension_of(name: &str) -> String {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_ascii_lowercase()
}

/// Where the bytes of an ingestion come from.
#[derive(Clone, PartialEq, Eq)]
pub enum Source {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An uploaded file held in memory; `filename` drives format detection.
    Upload { filename: String, bytes: Vec<u8> },
}

impl Source {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn upload(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Upload {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Identifier used in log lines and errors (the path, or the uploaded file name).
    pub fn name(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Upload { filename, .. } => filename.clone(),
        }
    }

    /// File name used for format detection and output naming.
    pub fn file_name(&self) -> String {
        match self {
            Self::Path(p) => p
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            Self::Upload { filename, .. } => filename.clone(),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Self::Upload { filename, bytes } => f
                .debug_struct("Upload")
                .field("filename", filename)
                .field("bytes_len", &bytes.len())
                .finish(),
        }
    }
}

/// Read `source` into a [`Table`].
///
/// Writes exactly one line to `log`: INFO on success, ERROR on failure (including an
/// unsupported extension, which is rejected before anything is opened).
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use tabular_ingest::ingestion::{import_file, Source};
/// use tabular_ingest::logging::TracingLogSink;
///
/// # fn main() -> Result<(), tabular_ingest::IngestionError> {
/// let table = import_file(&Source::path("customers.csv"), &TracingLogSink)?;
/// println!("columns={:?} rows={}", table.columns, table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn import_file(source: &Source, log: &dyn LogSink) -> IngestionResult<Table> {
    let name = source.name();
    let result = FileFormat::from_file_name(&source.file_name()).and_then(|format| {
        read_source(source, format).map_err(|e| IngestionError::ImportFailure {
            source_name: name.clone(),
            source: e,
        })
    });

    match &result {
        Ok(_) => log.info(&format!("file {name} imported successfully")),
        // The wrapper already names the source; log only the cause.
        Err(IngestionError::ImportFailure { source, .. }) => {
            log.error(&format!("failed to import file {name}: {source}"))
        }
        Err(e) => log.error(&format!("failed to import file {name}: {e}")),
    }
    result
}

fn read_source(source: &Source, format: FileFormat) -> Result<Table, FormatError> {
    match (format, source) {
        (FileFormat::Csv, Source::Path(p)) => csv::read_delimited_from_path(p, b','),
        (FileFormat::Csv, Source::Upload { bytes, .. }) => {
            csv::read_delimited_from_reader(bytes.as_slice(), b',')
        }
        (FileFormat::Tsv, Source::Path(p)) => csv::read_delimited_from_path(p, b'\t'),
        (FileFormat::Tsv, Source::Upload { bytes, .. }) => {
            csv::read_delimited_from_reader(bytes.as_slice(), b'\t')
        }
        (FileFormat::Json, Source::Path(p)) => json::read_json_from_path(p),
        (FileFormat::Json, Source::Upload { bytes, .. }) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| FormatError::malformed(format!("invalid utf-8: {e}")))?;
            json::read_json_from_str(text)
        }
        (FileFormat::Xls | FileFormat::Xlsx, source) => read_excel(source),
    }
}

fn read_excel(source: &Source) -> Result<Table, FormatError> {
    #[cfg(feature = "excel")]
    {
        use super::excel;

        match source {
            Source::Path(p) => excel::read_excel_from_path(p),
            Source::Upload { bytes, .. } => excel::read_excel_from_bytes(bytes),
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = source;
        Err(FormatError::malformed(
            "spreadsheet engine not enabled (enable cargo feature 'excel')",
        ))
    }
}
