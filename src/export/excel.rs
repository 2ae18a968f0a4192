#![cfg(feature = "excel")]

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::FormatError;
use crate::types::{Table, Value};

/// Write `table` to the first sheet of a new `.xlsx` workbook, header in row 0.
///
/// Null cells are left blank.
pub fn write_xlsx(table: &Table, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        ws.write_string(0, col_num(col)?, name)?;
    }

    for (idx0, row) in table.rows.iter().enumerate() {
        let r = row_num(idx0 + 1)?;
        for (col, value) in row.iter().enumerate() {
            let c = col_num(col)?;
            match value {
                Value::Null => {}
                Value::Int64(v) => {
                    ws.write_number(r, c, *v as f64)?;
                }
                Value::Float64(v) => {
                    ws.write_number(r, c, *v)?;
                }
                Value::Bool(v) => {
                    ws.write_boolean(r, c, *v)?;
                }
                Value::Utf8(v) => {
                    ws.write_string(r, c, v)?;
                }
            }
        }
    }

    wb.save(path.as_ref())?;
    Ok(())
}

fn row_num(idx: usize) -> Result<u32, FormatError> {
    u32::try_from(idx).map_err(|_| FormatError::malformed(format!("row {idx} exceeds the sheet size")))
}

fn col_num(idx: usize) -> Result<u16, FormatError> {
    u16::try_from(idx).map_err(|_| FormatError::malformed(format!("column {idx} exceeds the sheet size")))
}
