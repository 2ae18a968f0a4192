//! NDJSON writer: one object per row, keys in column order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Map;

use crate::error::FormatError;
use crate::types::Table;

/// Write `table` as newline-delimited JSON records.
pub fn write_ndjson(table: &Table, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let out = BufWriter::new(File::create(path)?);
    write_ndjson_to_writer(table, out)
}

/// Write `table` as newline-delimited JSON records into any writer.
///
/// A table without rows is written as one object of empty columns (`{"a":[]}`), which keeps
/// the header readable on re-import.
pub fn write_ndjson_to_writer<W: Write>(table: &Table, mut out: W) -> Result<(), FormatError> {
    if table.rows.is_empty() {
        let columns: Map<String, serde_json::Value> = table
            .columns
            .iter()
            .map(|name| (name.clone(), serde_json::Value::Array(Vec::new())))
            .collect();
        serde_json::to_writer(&mut out, &columns)?;
        out.write_all(b"\n")?;
    }
    for row in &table.rows {
        let mut record = Map::with_capacity(table.columns.len());
        for (name, value) in table.columns.iter().zip(row) {
            record.insert(name.clone(), serde_json::to_value(value)?);
        }
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
