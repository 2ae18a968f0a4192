//! Blocking HTTP front end for the upload pipeline.
//!
//! Routes:
//! - `POST /upload/`: run the pipeline on one uploaded file (multipart `file` part, or a raw
//!   body with `?filename=`), answer with timing, memory, type errors and the output path.
//! - `GET /logs/`: return the log file as a list of lines.
//!
//! Requests are handled one at a time on the calling thread. Routing and response building
//! live in [`handle`], which does not touch the socket, so it can be tested directly.

pub mod multipart;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use serde::Serialize;
use tiny_http::{Header, Response, Server, StatusCode};
use tracing::{error, info, warn};

use crate::ingestion::Source;
use crate::pipeline::{IngestionReport, Pipeline};
use crate::validation::TypeErrorRecord;

/// Success message of `POST /upload/`.
pub const UPLOAD_OK_MESSAGE: &str = "File processed successfully!";

/// Shared state of the upload service.
#[derive(Debug)]
pub struct UploadService {
    pub pipeline: Pipeline,
    /// File served by `GET /logs/`.
    pub log_file: PathBuf,
}

/// A request reduced to what the routes need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Path plus optional query string.
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::detail(500, &format!("failed to encode response: {e}")),
        }
    }

    fn detail(status: u16, detail: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "detail": detail }).to_string(),
        }
    }
}

#[derive(Serialize)]
struct UploadResponse<'a> {
    mensagem: &'static str,
    detalhes: UploadDetails<'a>,
}

#[derive(Serialize)]
struct UploadDetails<'a> {
    tempo_importacao: String,
    memoria_utilizada: String,
    erros: &'a [TypeErrorRecord],
    caminho_arquivo: String,
}

impl<'a> UploadDetails<'a> {
    fn from_report(report: &'a IngestionReport) -> Self {
        Self {
            tempo_importacao: format!("{:.2} seconds", report.performance.elapsed_secs),
            memoria_utilizada: format!("{:.2} MB", report.performance.memory_delta_mb),
            erros: &report.errors,
            caminho_arquivo: report.output_path.display().to_string(),
        }
    }
}

#[derive(Serialize)]
struct LogsResponse<'a> {
    logs: Vec<&'a str>,
}

/// Route one request.
pub fn handle(service: &UploadService, req: &HttpRequest) -> HttpResponse {
    let (path, query) = req.url.split_once('?').unwrap_or((req.url.as_str(), ""));
    let path = path.trim_end_matches('/');
    match (req.method.as_str(), path) {
        ("POST", "/upload") => upload(service, req, query),
        ("GET", "/logs") => logs(service),
        (_, "/upload" | "/logs") => HttpResponse::detail(405, "Method Not Allowed"),
        _ => HttpResponse::detail(404, "Not Found"),
    }
}

fn upload(service: &UploadService, req: &HttpRequest, query: &str) -> HttpResponse {
    let Some(source) = upload_source(req, query) else {
        return HttpResponse::detail(400, "request carries no file");
    };

    match service.pipeline.run(&source) {
        Ok(report) => HttpResponse::json(
            200,
            &UploadResponse {
                mensagem: UPLOAD_OK_MESSAGE,
                detalhes: UploadDetails::from_report(&report),
            },
        ),
        Err(e) => {
            warn!(kind = e.kind(), "upload failed: {e}");
            HttpResponse::detail(500, &format!("failed to process file: {e}"))
        }
    }
}

fn upload_source(req: &HttpRequest, query: &str) -> Option<Source> {
    if let Some(boundary) = req
        .content_type
        .as_deref()
        .and_then(multipart::boundary_from_content_type)
    {
        let part = multipart::first_file_part(&req.body, &boundary)?;
        return Some(Source::upload(part.filename, part.data));
    }

    let filename = query_param(query, "filename")?;
    Some(Source::upload(filename, req.body.clone()))
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k != key {
            return None;
        }
        let v = v.replace('+', " ");
        urlencoding::decode(&v).ok().map(|s| s.into_owned())
    })
}

fn logs(service: &UploadService) -> HttpResponse {
    match fs::read_to_string(&service.log_file) {
        Ok(text) => HttpResponse::json(
            200,
            &LogsResponse {
                logs: text.split_inclusive('\n').collect(),
            },
        ),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            HttpResponse::detail(404, "Log file not found.")
        }
        Err(e) => HttpResponse::detail(500, &format!("cannot read log file: {e}")),
    }
}

/// Bind `addr` and serve requests until the listener fails.
pub fn serve(addr: &str, service: &UploadService) -> io::Result<()> {
    let server = Server::http(addr).map_err(io::Error::other)?;
    info!("listening on http://{addr}");

    for mut request in server.incoming_requests() {
        let mut body = Vec::new();
        let response = match request.as_reader().read_to_end(&mut body) {
            Ok(_) => {
                let req = HttpRequest {
                    method: request.method().as_str().to_ascii_uppercase(),
                    url: request.url().to_string(),
                    content_type: request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Content-Type"))
                        .map(|h| h.value.as_str().to_string()),
                    body,
                };
                handle(service, &req)
            }
            Err(e) => HttpResponse::detail(400, &format!("cannot read request body: {e}")),
        };

        info!(
            method = %request.method(),
            url = request.url(),
            status = response.status,
            "request handled"
        );

        let mut out = Response::from_string(response.body).with_status_code(StatusCode(response.status));
        if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            out = out.with_header(h);
        }
        if let Err(e) = request.respond(out) {
            error!("failed to send response: {e}");
        }
    }
    Ok(())
}
