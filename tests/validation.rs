use tabular_ingest::ingestion::{Source, import_file};
use tabular_ingest::logging::{LogLevel, MemoryLogSink, NullLogSink};
use tabular_ingest::schema::customers_schema;
use tabular_ingest::types::{DataType, Field, Schema, Table, Value};
use tabular_ingest::validation::{MissingColumnPolicy, TypeErrorRecord, validate};

fn index_name_schema() -> Schema {
    Schema::new(vec![
        Field::new("Index", DataType::Int64),
        Field::new("Name", DataType::Utf8),
    ])
}

#[test]
fn non_numeric_index_is_reported_once() {
    let table = import_file(&Source::path("tests/fixtures/index_name.csv"), &NullLogSink).unwrap();
    let log = MemoryLogSink::new();
    let errors = validate(&table, &index_name_schema(), MissingColumnPolicy::WarnOnly, &log);

    assert_eq!(
        errors,
        vec![TypeErrorRecord::new(2, "Index", Value::Utf8("notanumber".into()), "str")]
    );
    assert_eq!(log.messages_at(LogLevel::Error).len(), 1);
}

#[test]
fn single_bad_cell_at_row_three() {
    let table = Table::new(
        vec!["Index".into(), "Name".into()],
        vec![
            vec![Value::Int64(1), Value::Utf8("a".into())],
            vec![Value::Int64(2), Value::Utf8("b".into())],
            vec![Value::Utf8("abc".into()), Value::Utf8("c".into())],
        ],
    );
    let errors = validate(&table, &index_name_schema(), MissingColumnPolicy::WarnOnly, &NullLogSink);
    assert_eq!(
        errors,
        vec![TypeErrorRecord::new(3, "Index", Value::Utf8("abc".into()), "str")]
    );
}

#[test]
fn matching_table_has_no_errors_and_no_log_lines() {
    let table = import_file(&Source::path("tests/fixtures/people.csv"), &NullLogSink).unwrap();
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("name", DataType::Utf8),
        Field::new("score", DataType::Float64),
        Field::new("active", DataType::Bool),
    ]);
    let log = MemoryLogSink::new();
    assert!(validate(&table, &schema, MissingColumnPolicy::Record, &log).is_empty());
    assert!(log.records().is_empty());
}

#[test]
fn numeric_phone_in_customers_file_is_an_int() {
    let table = import_file(&Source::path("tests/fixtures/customers.csv"), &NullLogSink).unwrap();
    let errors = validate(&table, &customers_schema(), MissingColumnPolicy::WarnOnly, &NullLogSink);
    assert_eq!(
        errors,
        vec![TypeErrorRecord::new(2, "Phone 1", Value::Int64(5153435776), "int")]
    );
}

#[test]
fn missing_column_warns_per_row_without_records() {
    let table = Table::new(
        vec!["Index".into()],
        vec![vec![Value::Int64(1)], vec![Value::Int64(2)]],
    );
    let log = MemoryLogSink::new();
    let errors = validate(&table, &index_name_schema(), MissingColumnPolicy::WarnOnly, &log);

    assert!(errors.is_empty());
    assert_eq!(
        log.messages_at(LogLevel::Warning),
        vec!["column 'Name' not found in the imported file".to_string(); 2]
    );
}

#[test]
fn missing_column_can_be_recorded() {
    let table = Table::new(
        vec!["Index".into()],
        vec![vec![Value::Int64(1)], vec![Value::Int64(2)]],
    );
    let errors = validate(&table, &index_name_schema(), MissingColumnPolicy::Record, &NullLogSink);

    assert_eq!(
        errors,
        vec![
            TypeErrorRecord::new(1, "Name", Value::Null, "missing"),
            TypeErrorRecord::new(2, "Name", Value::Null, "missing"),
        ]
    );
    assert!(errors.iter().all(TypeErrorRecord::is_missing_column));
}

#[test]
fn short_rows_read_as_nulls() {
    let table = Table::new(
        vec!["Index".into(), "Name".into()],
        vec![vec![Value::Int64(1)], vec![Value::Utf8("x".into())]],
    );
    let errors = validate(&table, &index_name_schema(), MissingColumnPolicy::Record, &NullLogSink);
    assert_eq!(
        errors,
        vec![TypeErrorRecord::new(2, "Index", Value::Utf8("x".into()), "str")]
    );
}

#[test]
fn extra_columns_are_ignored() {
    let table = Table::new(
        vec!["Index".into(), "Name".into(), "Extra".into()],
        vec![vec![Value::Int64(1), Value::Utf8("a".into()), Value::Bool(true)]],
    );
    assert!(validate(&table, &index_name_schema(), MissingColumnPolicy::Record, &NullLogSink).is_empty());
}

#[test]
fn records_serialize_with_named_fields() {
    let record = TypeErrorRecord::new(2, "Index", Value::Utf8("notanumber".into()), "str");
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"row":2,"column":"Index","value":"notanumber","observed":"str"}"#
    );
}
