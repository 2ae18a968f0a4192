//! Cell-level type validation against an expected [`Schema`].
//!
//! Validation never fails: it scans every row and returns the mismatches it found, logging
//! each one as it goes. Type identity is strict; a numeric-looking string is still a string.

use serde::Serialize;

use crate::logging::LogSink;
use crate::types::{Schema, Table, Value};

/// Observed-type label of a record produced for a missing column.
pub const MISSING_COLUMN: &str = "missing";

/// Stand-in for cells past the end of a short row.
static NULL_CELL: Value = Value::Null;

/// What to do when a schema column is absent from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingColumnPolicy {
    /// Log a warning only.
    #[default]
    WarnOnly,
    /// Log a warning and append a record with a null value and type label `missing`.
    Record,
}

/// One type mismatch (or missing column) found during validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeErrorRecord {
    /// 1-based row number.
    pub row: usize,
    pub column: String,
    /// The offending cell ([`Value::Null`] for a missing column).
    pub value: Value,
    /// Runtime type name of `value`, or [`MISSING_COLUMN`].
    pub observed: String,
}

impl TypeErrorRecord {
    pub fn new(row: usize, column: impl Into<String>, value: Value, observed: impl Into<String>) -> Self {
        Self {
            row,
            column: column.into(),
            value,
            observed: observed.into(),
        }
    }

    pub fn is_missing_column(&self) -> bool {
        self.observed == MISSING_COLUMN
    }
}

/// Check every non-null cell of the schema's columns against the expected type.
///
/// Rows are scanned in order and, within a row, columns in schema declaration order, so the
/// returned records are in scan order. Null cells are skipped.
pub fn validate(
    table: &Table,
    schema: &Schema,
    policy: MissingColumnPolicy,
    log: &dyn LogSink,
) -> Vec<TypeErrorRecord> {
    // Resolve column positions once; `None` marks a missing column.
    let positions: Vec<Option<usize>> = schema
        .fields
        .iter()
        .map(|f| table.index_of(&f.name))
        .collect();

    let mut errors = Vec::new();
    for (row_idx0, row) in table.rows.iter().enumerate() {
        let row_num = row_idx0 + 1;
        for (field, pos) in schema.fields.iter().zip(&positions) {
            let Some(idx) = *pos else {
                log.warning(&format!("column '{}' not found in the imported file", field.name));
                if policy == MissingColumnPolicy::Record {
                    errors.push(TypeErrorRecord::new(row_num, &field.name, Value::Null, MISSING_COLUMN));
                }
                continue;
            };

            let value = row.get(idx).unwrap_or(&NULL_CELL);
            match value.data_type() {
                None => continue,
                Some(dt) if dt == field.data_type => continue,
                Some(_) => {}
            }

            log.error(&format!(
                "type error at row {row_num}, column '{}': value '{value}' is {}, expected {}",
                field.name,
                value.type_name(),
                field.data_type
            ));
            errors.push(TypeErrorRecord::new(
                row_num,
                &field.name,
                value.clone(),
                value.type_name(),
            ));
        }
    }
    errors
}
