//! Ingestion entrypoints and format readers.
//!
//! Most callers should use [`import_file`] (from [`unified`]) which:
//!
//! - detects the format from the file extension (csv, tsv, json, xls, xlsx)
//! - reads the whole source into an in-memory [`crate::types::Table`]
//! - logs one success or failure line to the supplied sink
//!
//! Format-specific readers are also available under:
//! - [`csv`] (CSV and TSV)
//! - [`json`]
//! - `excel` (Cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod unified;

pub use unified::{FileFormat, Source, extension_of, import_file};
