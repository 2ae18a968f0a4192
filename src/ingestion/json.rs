//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects (records): `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//! - A single object of columns: `{"a": [1, 2]}` or `{"a": {"0": 1, "1": 2}}`
//! - A single record object: `{"a": 1, "b": "x"}`
//!
//! Column order is the order in which keys are first seen.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Map;

use crate::error::FormatError;
use crate::types::{Table, Value};

/// Read a JSON file into a [`Table`].
pub fn read_json_from_path(path: impl AsRef<Path>) -> Result<Table, FormatError> {
    let text = fs::read_to_string(path)?;
    read_json_from_str(&text)
}

/// Read JSON text into a [`Table`].
pub fn read_json_from_str(input: &str) -> Result<Table, FormatError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FormatError::malformed("json input is empty"));
    }

    // First try parsing as a single JSON value (array or object).
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => records_to_table(&items),
        Ok(serde_json::Value::Object(map)) => {
            if is_column_oriented(&map) {
                columns_to_table(&map)
            } else {
                records_to_table(&[serde_json::Value::Object(map)])
            }
        }
        Ok(_) => Err(FormatError::malformed(
            "json must be an object, an array of objects, or NDJSON",
        )),
        Err(e) if !trimmed.contains('\n') => Err(e.into()),
        Err(_) => {
            // Fall back to NDJSON.
            let mut values = Vec::new();
            for (i, line) in trimmed.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                    FormatError::malformed(format!("invalid ndjson at line {}: {}", i + 1, e))
                })?;
                values.push(v);
            }
            records_to_table(&values)
        }
    }
}

/// `{}` counts as column-oriented: a table with no columns and no rows.
fn is_column_oriented(map: &Map<String, serde_json::Value>) -> bool {
    map.values().all(|v| v.is_array() || v.is_object())
}

/// Keeps column names in first-seen order.
#[derive(Default)]
struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn insert(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.positions.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_owned());
        self.positions.insert(name.to_owned(), idx);
        idx
    }
}

fn records_to_table(values: &[serde_json::Value]) -> Result<Table, FormatError> {
    let mut objects = Vec::with_capacity(values.len());
    let mut columns = ColumnIndex::default();
    for (idx0, v) in values.iter().enumerate() {
        let obj = v
            .as_object()
            .ok_or_else(|| FormatError::malformed(format!("row {} is not a json object", idx0 + 1)))?;
        for key in obj.keys() {
            columns.insert(key);
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            let mut row = vec![Value::Null; columns.names.len()];
            for (key, jv) in obj {
                row[columns.positions[key.as_str()]] = convert_json_value(jv);
            }
            row
        })
        .collect();

    Ok(Table::new(columns.names, rows))
}

fn columns_to_table(map: &Map<String, serde_json::Value>) -> Result<Table, FormatError> {
    let names: Vec<String> = map.keys().cloned().collect();

    // Row labels: positions for arrays, keys for index objects, first-seen order overall.
    let mut labels = ColumnIndex::default();
    for v in map.values() {
        match v {
            serde_json::Value::Array(items) => {
                for i in 0..items.len() {
                    labels.insert(&i.to_string());
                }
            }
            serde_json::Value::Object(cells) => {
                for k in cells.keys() {
                    labels.insert(k);
                }
            }
            _ => {}
        }
    }

    let mut rows = vec![vec![Value::Null; names.len()]; labels.names.len()];
    for (col, v) in map.values().enumerate() {
        match v {
            serde_json::Value::Array(items) => {
                for (i, jv) in items.iter().enumerate() {
                    rows[labels.positions[i.to_string().as_str()]][col] = convert_json_value(jv);
                }
            }
            serde_json::Value::Object(cells) => {
                for (k, jv) in cells {
                    rows[labels.positions[k.as_str()]][col] = convert_json_value(jv);
                }
            }
            _ => {}
        }
    }

    Ok(Table::new(names, rows))
}

fn convert_json_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int64(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float64(f)
            } else {
                Value::Utf8(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        nested => Value::Utf8(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_stay_strings() {
        let t = read_json_from_str(r#"[{"Index": "5"}, {"Index": 6}]"#).unwrap();
        assert_eq!(t.rows[0][0], Value::Utf8("5".into()));
        assert_eq!(t.rows[1][0], Value::Int64(6));
    }

    #[test]
    fn whole_floats_stay_floats() {
        let t = read_json_from_str(r#"{"x": 1.0}"#).unwrap();
        assert_eq!(t.rows, vec![vec![Value::Float64(1.0)]]);
    }

    #[test]
    fn nested_values_become_json_text() {
        let t = read_json_from_str(r#"[{"tags": ["a", "b"]}]"#).unwrap();
        assert_eq!(t.rows[0][0], Value::Utf8(r#"["a","b"]"#.into()));
    }

    #[test]
    fn scalar_document_is_rejected() {
        let err = read_json_from_str("42").unwrap_err();
        assert!(err.to_string().contains("json must be an object"));
    }
}
