use tabular_ingest::ingestion::csv::{read_delimited_from_path, read_delimited_from_reader};
use tabular_ingest::types::Value;

fn people_columns() -> Vec<String> {
    ["id", "name", "score", "active"].iter().map(|s| s.to_string()).collect()
}

#[test]
fn read_csv_from_path_happy_path() {
    let table = read_delimited_from_path("tests/fixtures/people.csv", b',').unwrap();

    assert_eq!(table.columns, people_columns());
    assert_eq!(table.row_count(), 2);
    assert_eq!(
        table.rows[0],
        vec![
            Value::Int64(1),
            Value::Utf8("Ada".to_string()),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );
}

#[test]
fn read_tsv_from_path_happy_path() {
    let table = read_delimited_from_path("tests/fixtures/people.tsv", b'\t').unwrap();
    assert_eq!(table.columns, people_columns());
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[1][1], Value::Utf8("Grace".to_string()));
}

#[test]
fn cells_are_typed_independently_within_a_column() {
    let input = "Index,Name\n1,Alice\nnotanumber,Bob\n";
    let table = read_delimited_from_reader(input.as_bytes(), b',').unwrap();
    assert_eq!(table.rows[0][0], Value::Int64(1));
    assert_eq!(table.rows[1][0], Value::Utf8("notanumber".to_string()));
}

#[test]
fn short_records_are_padded_with_nulls() {
    let input = "a,b,c\n1,2\n";
    let table = read_delimited_from_reader(input.as_bytes(), b',').unwrap();
    assert_eq!(table.rows[0], vec![Value::Int64(1), Value::Int64(2), Value::Null]);
}

#[test]
fn long_records_are_rejected() {
    let input = "a,b\n1,2\n1,2,3\n";
    let err = read_delimited_from_reader(input.as_bytes(), b',').unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("malformed input"));
    assert!(msg.contains("expected 2 fields in line 3, saw 3"));
}

#[test]
fn empty_input_has_no_columns() {
    let err = read_delimited_from_reader("".as_bytes(), b',').unwrap_err();
    assert!(err.to_string().contains("no columns to parse from file"));
}

#[test]
fn invalid_utf8_is_an_error() {
    let input: &[u8] = b"a,b\n1,\xff\xfe\n";
    let err = read_delimited_from_reader(input, b',').unwrap_err();
    assert!(err.to_string().contains("csv error"));
}

#[test]
fn missing_file_is_io_error() {
    let err = read_delimited_from_path("tests/fixtures/does_not_exist.csv", b',').unwrap_err();
    assert!(err.to_string().contains("No such file") || err.to_string().contains("cannot find"));
}
