#![cfg(feature = "excel")]

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, ExcelDateTime, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use chrono::NaiveTime;

use crate::error::FormatError;
use crate::types::{Table, Value};

/// Read the first sheet of an Excel document (`.xlsx`, `.xls`) into a [`Table`].
///
/// Behavior:
/// - Uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Skips rows where every cell is empty
/// - Converts cells into [`Value`]s by cell kind (see [`convert_cell`])
pub fn read_excel_from_path(path: impl AsRef<Path>) -> Result<Table, FormatError> {
    let mut workbook = open_workbook_auto(path)?;
    read_first_sheet(&mut workbook)
}

/// Read the first sheet of an in-memory Excel document.
pub fn read_excel_from_bytes(bytes: &[u8]) -> Result<Table, FormatError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_first_sheet(&mut workbook)
}

fn read_first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<Table, FormatError> {
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| FormatError::malformed("workbook has no sheets"))?;
    let range = workbook.worksheet_range(&first)?;
    sheet_range_to_table(&first, &range)
}

fn sheet_range_to_table(sheet: &str, range: &calamine::Range<Data>) -> Result<Table, FormatError> {
    let mut rows_iter = range
        .rows()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)));

    let header = rows_iter.next().ok_or_else(|| {
        FormatError::malformed(format!(
            "sheet '{sheet}' has no non-empty rows (no header row found)"
        ))
    })?;
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let name = cell_to_header_string(c);
            if name.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                name
            }
        })
        .collect();

    let rows = rows_iter
        .map(|row| {
            let mut out: Vec<Value> = row.iter().take(columns.len()).map(convert_cell).collect();
            out.resize(columns.len(), Value::Null);
            out
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Largest float magnitude converted to an integer without precision loss (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Convert one spreadsheet cell.
///
/// Spreadsheets store every number as a float; whole-valued numbers become
/// [`Value::Int64`] so integer columns validate as integers.
pub fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT => Value::Int64(*f as i64),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::Utf8(s.clone()),
        Data::DateTime(dt) => Value::Utf8(excel_datetime_text(dt).unwrap_or_else(|| c.to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
    }
}

/// ISO text of a date-formatted cell: `YYYY-MM-DD`, with ` HH:MM:SS` when the time is set.
/// Durations read as `H:MM:SS`.
fn excel_datetime_text(dt: &ExcelDateTime) -> Option<String> {
    if dt.is_duration() {
        let secs = dt.as_duration()?.num_seconds();
        let sign = if secs < 0 { "-" } else { "" };
        let secs = secs.abs();
        return Some(format!("{sign}{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60));
    }
    let datetime = dt.as_datetime()?;
    if datetime.time() == NaiveTime::MIN {
        Some(datetime.format("%Y-%m-%d").to_string())
    } else {
        Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}
