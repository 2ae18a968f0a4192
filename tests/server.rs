use std::path::Path;
use std::sync::Arc;

use tabular_ingest::logging::FileLogSink;
use tabular_ingest::pipeline::{Pipeline, PipelineConfig};
use tabular_ingest::server::{HttpRequest, UPLOAD_OK_MESSAGE, UploadService, handle};
use tabular_ingest::types::{DataType, Field, Schema};

const BOUNDARY: &str = "----formboundary7MA4YWxk";

fn service(dir: &Path) -> UploadService {
    let log_file = dir.join("import_log.log");
    let mut config = PipelineConfig::http();
    config.export.output_dir = dir.join("processed");
    let schema = Schema::new(vec![
        Field::new("Index", DataType::Int64),
        Field::new("Name", DataType::Utf8),
    ]);
    UploadService {
        pipeline: Pipeline::new(schema, config, Arc::new(FileLogSink::new(&log_file))),
        log_file,
    }
}

fn request(method: &str, url: &str) -> HttpRequest {
    HttpRequest {
        method: method.to_string(),
        url: url.to_string(),
        content_type: None,
        body: Vec::new(),
    }
}

fn multipart(filename: &str, data: &[u8]) -> HttpRequest {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    HttpRequest {
        method: "POST".to_string(),
        url: "/upload/".to_string(),
        content_type: Some(format!("multipart/form-data; boundary={BOUNDARY}")),
        body,
    }
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

#[test]
fn multipart_upload_returns_details() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let data = std::fs::read("tests/fixtures/index_name.csv").unwrap();

    let resp = handle(&svc, &multipart("index_name.csv", &data));
    assert_eq!(resp.status, 200);

    let body = json(&resp.body);
    assert_eq!(body["mensagem"], UPLOAD_OK_MESSAGE);
    let details = &body["detalhes"];
    assert!(details["tempo_importacao"].as_str().unwrap().ends_with(" seconds"));
    assert!(details["memoria_utilizada"].as_str().unwrap().ends_with(" MB"));
    assert_eq!(
        details["erros"],
        serde_json::json!([{"row": 2, "column": "Index", "value": "notanumber", "observed": "str"}])
    );
    let written = details["caminho_arquivo"].as_str().unwrap();
    assert!(written.ends_with("index_name_processed.csv"));
    assert!(Path::new(written).exists());
}

#[test]
fn raw_body_upload_uses_filename_query() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let mut req = request("POST", "/upload?filename=my%20people.json");
    req.body = br#"[{"Index": 1, "Name": "Ada"}]"#.to_vec();

    let resp = handle(&svc, &req);
    assert_eq!(resp.status, 200);
    let body = json(&resp.body);
    assert_eq!(body["detalhes"]["erros"], serde_json::json!([]));
    assert!(
        body["detalhes"]["caminho_arquivo"]
            .as_str()
            .unwrap()
            .ends_with("my people_processed.csv")
    );
}

#[test]
fn upload_without_file_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let resp = handle(&service(dir.path()), &request("POST", "/upload/"));
    assert_eq!(resp.status, 400);
}

#[test]
fn unsupported_upload_is_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let resp = handle(&service(dir.path()), &multipart("notes.txt", b"hello"));

    assert_eq!(resp.status, 500);
    assert_eq!(
        json(&resp.body)["detail"],
        "failed to process file: unsupported file extension 'txt'"
    );
}

#[test]
fn logs_are_missing_before_first_upload() {
    let dir = tempfile::tempdir().unwrap();
    let resp = handle(&service(dir.path()), &request("GET", "/logs/"));
    assert_eq!(resp.status, 404);
    assert_eq!(json(&resp.body)["detail"], "Log file not found.");
}

#[test]
fn logs_list_every_line_after_upload() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let data = std::fs::read("tests/fixtures/index_name.csv").unwrap();
    assert_eq!(handle(&svc, &multipart("index_name.csv", &data)).status, 200);

    let resp = handle(&svc, &request("GET", "/logs/"));
    assert_eq!(resp.status, 200);
    let logs = json(&resp.body)["logs"].as_array().unwrap().clone();
    assert!(!logs.is_empty());
    assert!(logs.iter().all(|l| l.as_str().unwrap().ends_with('\n')));
    assert!(logs[0].as_str().unwrap().contains(" - INFO - file index_name.csv imported successfully"));
}

#[test]
fn unknown_routes_and_methods() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    assert_eq!(handle(&svc, &request("GET", "/upload/")).status, 405);
    assert_eq!(handle(&svc, &request("DELETE", "/logs")).status, 405);
    assert_eq!(handle(&svc, &request("GET", "/")).status, 404);
}
