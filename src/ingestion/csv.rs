//! CSV/TSV ingestion implementation.

use std::io::Read;
use std::path::Path;

use crate::error::FormatError;
use crate::types::{Table, Value};

/// Text values read as a missing cell.
const NA_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Read a delimited text file (comma for CSV, tab for TSV) into a [`Table`].
///
/// Rules:
///
/// - The first record is the header; its fields become the column names.
/// - Every cell is typed on its own by [`infer_cell`].
/// - Short records are padded with nulls; records longer than the header are an error.
pub fn read_delimited_from_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Table, FormatError> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    read_records(rdr)
}

/// Read delimited text from any reader (e.g. an uploaded body).
pub fn read_delimited_from_reader<R: Read>(input: R, delimiter: u8) -> Result<Table, FormatError> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(input);
    read_records(rdr)
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>) -> Result<Table, FormatError> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(FormatError::malformed("no columns to parse from file"));
    }
    let columns: Vec<String> = headers.iter().map(str::to_owned).collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > columns.len() {
            // +2: 1-based, and the header is line 1.
            return Err(FormatError::malformed(format!(
                "expected {} fields in line {}, saw {}",
                columns.len(),
                row_idx0 + 2,
                record.len()
            )));
        }

        let mut row: Vec<Value> = record.iter().map(infer_cell).collect();
        row.resize(columns.len(), Value::Null);
        rows.push(row);
    }

    Ok(Table::new(columns, rows))
}

/// Type a single text cell.
///
/// Empty text and NA markers become [`Value::Null`]; otherwise the first of integer, float
/// and boolean that parses wins, falling back to the raw text.
pub fn infer_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NA_MARKERS.contains(&trimmed) {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int64(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_nan() {
            return Value::Null;
        }
        return Value::Float64(f);
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::Utf8(raw.to_owned())
}
