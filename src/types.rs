//! Core data model types.
//!
//! Readers produce a [`Table`] of dynamically typed [`Value`]s; the validator checks those
//! values against an expected [`Schema`] (a list of typed [`Field`]s).

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Expected primitive type of a schema field.
///
/// Schema files name types `integer`, `float`, `bool` and `string`; the short forms used by
/// other tools are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer.
    #[serde(rename = "integer", alias = "int", alias = "int64")]
    Int64,
    /// 64-bit floating point number.
    #[serde(rename = "float", alias = "float64", alias = "double")]
    Float64,
    /// Boolean.
    #[serde(rename = "bool", alias = "boolean")]
    Bool,
    /// UTF-8 string.
    #[serde(rename = "string", alias = "str", alias = "utf8")]
    Utf8,
}

impl DataType {
    /// Runtime type name of values of this type, as reported in type error records.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Int64 => "int",
            Self::Float64 => "float",
            Self::Bool => "bool",
            Self::Utf8 => "str",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Expected type of every non-null cell in the column.
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Expected column → type mapping.
///
/// Field order is the order in which columns are checked for every row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// A single cell value, typed by whatever the format reader produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Runtime type name of this value (`int`, `float`, `bool`, `str`, `NoneType`).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NoneType",
            Value::Int64(_) => DataType::Int64.type_name(),
            Value::Float64(_) => DataType::Float64.type_name(),
            Value::Bool(_) => DataType::Bool.type_name(),
            Value::Utf8(_) => DataType::Utf8.type_name(),
        }
    }

    /// The [`DataType`] this value is an instance of, or `None` for [`Value::Null`].
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::Bool(_) => Some(DataType::Bool),
            Value::Utf8(_) => Some(DataType::Utf8),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::Float64(v) if v.is_finite() => serializer.serialize_f64(*v),
            Value::Float64(_) => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Utf8(v) => serializer.serialize_str(v),
        }
    }
}

/// In-memory tabular data: ordered column names plus row-major cell storage.
///
/// Every row holds exactly one value per column, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column names, in file order.
    pub columns: Vec<String>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `(row, column)`, if both are in range.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.index_of(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table keeps the original columns.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Drop every row that contains at least one null cell.
    pub fn drop_incomplete_rows(&self) -> Self {
        self.filter_rows(|row| !row.iter().any(Value::is_null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_follow_value_variants() {
        assert_eq!(Value::Int64(1).type_name(), "int");
        assert_eq!(Value::Float64(1.5).type_name(), "float");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Utf8("x".into()).type_name(), "str");
        assert_eq!(Value::Null.type_name(), "NoneType");
    }

    #[test]
    fn drop_incomplete_rows_keeps_columns() {
        let t = Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![Value::Int64(1), Value::Null],
                vec![Value::Int64(2), Value::Utf8("x".into())],
            ],
        );
        let out = t.drop_incomplete_rows();
        assert_eq!(out.columns, t.columns);
        assert_eq!(out.rows, vec![vec![Value::Int64(2), Value::Utf8("x".into())]]);
    }

    #[test]
    fn data_type_deserializes_from_aliases() {
        let f: Field = serde_json::from_str(r#"{"name":"Index","type":"int"}"#).unwrap();
        assert_eq!(f.data_type, DataType::Int64);
        let f: Field = serde_json::from_str(r#"{"name":"Name","type":"string"}"#).unwrap();
        assert_eq!(f.data_type, DataType::Utf8);
    }

    #[test]
    fn schema_file_type_names_round_trip() {
        let json = serde_json::to_string(&[
            DataType::Int64,
            DataType::Float64,
            DataType::Bool,
            DataType::Utf8,
        ])
        .unwrap();
        assert_eq!(json, r#"["integer","float","bool","string"]"#);
        let back: Vec<DataType> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![DataType::Int64, DataType::Float64, DataType::Bool, DataType::Utf8]);
    }

    #[test]
    fn value_serializes_as_plain_json() {
        let json = serde_json::to_string(&vec![
            Value::Int64(3),
            Value::Utf8("abc".into()),
            Value::Null,
            Value::Float64(f64::NAN),
        ])
        .unwrap();
        assert_eq!(json, r#"[3,"abc",null,null]"#);
    }
}
