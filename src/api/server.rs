//! HTTP server for the puestos API.
//!
//! The front end (upload widget, editable table, download button) talks to
//! these endpoints; the core pipeline itself does no I/O.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                              |
//! |--------|---------------|------------------------------------------|
//! | GET    | `/health`     | Health check                             |
//! | POST   | `/api/upload` | Upload a roster workbook for processing  |
//! | POST   | `/api/export` | Download a (possibly edited) table as xlsx |
//! | GET    | `/api/logs`   | SSE stream for real-time pipeline logs   |

use axum::{
    extract::Multipart,
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, path::Path, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BROADCASTER;
use super::types::{error_response, ExportRequest, UploadResponse};
use crate::error::{ProcessError, ServerError};
use crate::export::table_to_xlsx;
use crate::models::EXPORT_FILE_NAME;
use crate::parser::Engine;
use crate::transform::pipeline::process_bytes;

/// Start the HTTP server.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // Permissive CORS for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_roster))
        .route("/api/export", post(export_table))
        .route("/api/logs", get(sse_logs))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Puestos server running on http://localhost:{}", port);
    println!("   POST /api/upload - Upload roster workbook (.xls/.xlsx)");
    println!("   POST /api/export - Download a table as xlsx");
    println!("   GET  /api/logs   - SSE log stream");
    println!("   GET  /health     - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "puestos",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "export": "POST /api/export",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn reject(err: ServerError) -> (StatusCode, Json<Value>) {
    (err.status(), Json(error_response(&err.to_string())))
}

/// Upload endpoint: multipart `file` field, engine picked from the filename.
async fn upload_roster(
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<Value>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        reject(ServerError::BadRequest(format!("Multipart error: {}", e)))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        reject(ServerError::BadRequest(format!("Read error: {}", e)))
                    })?
                    .to_vec(),
            );
        }
    }

    let bytes =
        file_data.ok_or_else(|| reject(ServerError::BadRequest("No file provided".into())))?;
    let name = file_name
        .ok_or_else(|| reject(ServerError::BadRequest("Uploaded file has no name".into())))?;

    let engine = Engine::from_path(Path::new(&name))
        .map_err(|e| reject(ProcessError::Sheet(e).into()))?;

    println!("\n{}", "=".repeat(70));
    println!("📄 NEW UPLOAD: {} ({} bytes)", name, bytes.len());
    println!("{}\n", "=".repeat(70));

    let processed = process_bytes(&bytes, engine).map_err(|e| {
        eprintln!("❌ Processing error: {}", e);
        reject(e.into())
    })?;

    println!("\n{}", "=".repeat(70));
    println!("📊 SUMMARY");
    println!("{}", "=".repeat(70));
    println!("   Rows:            {}", processed.sheet_info.row_count);
    println!("   Groups:          {}", processed.summary.groups.len());
    println!("   Total headcount: {}", processed.summary.total);
    println!("   Flagged:         {}", processed.summary.flagged_count());
    println!("{}\n", "=".repeat(70));

    Ok(Json(UploadResponse::from(processed)))
}

/// Export endpoint: a table as shown (possibly edited) comes back as JSON
/// and leaves as an xlsx attachment.
async fn export_table(
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let bytes = table_to_xlsx(&request.columns, &request.rows)
        .map_err(|e| reject(ServerError::Export(e)))?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        ),
    ];

    Ok((headers, bytes))
}
