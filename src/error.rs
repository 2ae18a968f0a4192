use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by the import/validate/export chain.
///
/// Type mismatches found by [`crate::validation::validate`] are not errors; they are collected
/// as [`crate::validation::TypeErrorRecord`]s and never abort a call.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The file extension is not one of csv, tsv, json, xls, xlsx.
    #[error("unsupported file extension '{extension}'")]
    UnsupportedFormat { extension: String },

    /// The source could not be read or parsed.
    #[error("failed to import '{source_name}': {source}")]
    ImportFailure {
        source_name: String,
        #[source]
        source: FormatError,
    },

    /// The processed table could not be written.
    #[error("failed to export to '{}': {source}", path.display())]
    ExportFailure {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// An expected-schema file could not be loaded.
    #[error("invalid schema file '{}': {message}", path.display())]
    SchemaFile { path: PathBuf, message: String },
}

impl IngestionError {
    /// Short classification label, used in log lines and HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "UnsupportedFormat",
            Self::ImportFailure { .. } => "ImportFailure",
            Self::ExportFailure { .. } => "ExportFailure",
            Self::SchemaFile { .. } => "SchemaFile",
        }
    }
}

/// Low-level failure of a format reader or writer.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV/TSV parse or write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse or write error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet read error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet write error (feature-gated behind `excel`).
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Input that parsed but does not have a tabular shape.
    #[error("malformed input: {message}")]
    Malformed { message: String },
}

impl FormatError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
