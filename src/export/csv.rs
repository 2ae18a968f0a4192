//! CSV/TSV writer.

use std::io::Write;
use std::path::Path;

use crate::error::FormatError;
use crate::types::{Table, Value};

/// Write `table` as delimited text with a header row.
pub fn write_delimited(table: &Table, path: impl AsRef<Path>, delimiter: u8) -> Result<(), FormatError> {
    let wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    write_records(table, wtr)
}

/// Write `table` as delimited text into any writer.
pub fn write_delimited_to_writer<W: Write>(table: &Table, out: W, delimiter: u8) -> Result<(), FormatError> {
    let wtr = csv::WriterBuilder::new().delimiter(delimiter).from_writer(out);
    write_records(table, wtr)
}

fn write_records<W: Write>(table: &Table, mut wtr: csv::Writer<W>) -> Result<(), FormatError> {
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(format_cell))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Text form of a cell. Nulls are empty; whole floats keep a `.0` so they read back as floats.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        Value::Float64(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Utf8(v) => v.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_empty_nulls() {
        let table = Table::new(
            vec!["id".into(), "score".into(), "name".into()],
            vec![
                vec![Value::Int64(1), Value::Float64(2.0), Value::Utf8("Ada, L".into())],
                vec![Value::Int64(2), Value::Null, Value::Bool(true)],
            ],
        );
        let mut out = Vec::new();
        write_delimited_to_writer(&table, &mut out, b',').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,score,name\n1,2.0,\"Ada, L\"\n2,,true\n"
        );
    }
}
