//! HTTP upload surface: accept a PDF or Word document over multipart and
//! serve compliance reports for previously uploaded files.
//!
//! The extraction and agent pipeline are blocking (file parsing, OCR, one
//! HTTP round-trip per stage), so report requests hop onto the blocking
//! pool instead of stalling the async runtime.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::processing::{DocumentProcessor, ProcessError};

/// Content types accepted on upload. The third entry covers legacy clients
/// that still label .docx payloads as msword.
const PERMITTED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Slack for multipart framing overhead on top of the file limit.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 5 * 1024 * 1024;

#[derive(Clone)]
pub struct UploadState {
    pub upload_dir: PathBuf,
}

#[derive(Serialize)]
struct UploadResponse {
    filename: String,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct ReportParams {
    #[serde(default)]
    rewrite: bool,
}

pub fn router(upload_dir: PathBuf) -> Router {
    let state = Arc::new(UploadState { upload_dir });

    Router::new()
        .route("/upload", post(handle_upload))
        .route("/documents/:filename/report", post(handle_report))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

/// Reject anything that is not a PDF or Word document up front, before
/// the body is drained.
fn check_content_type(content_type: Option<&str>) -> Result<(), Response> {
    let accepted = content_type
        .map(|ct| PERMITTED_CONTENT_TYPES.contains(&ct))
        .unwrap_or(false);

    if accepted {
        Ok(())
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Unsupported file format. Only PDF and Word documents are accepted."
                    .into(),
            }),
        )
            .into_response())
    }
}

/// Strip path separators so an uploaded name cannot escape the upload
/// directory.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|&c| c != '/' && c != '\\' && c != '\0')
        .collect();
    let sanitized = sanitized.replace("..", "");

    if sanitized.is_empty() {
        "document".into()
    } else {
        sanitized
    }
}

async fn handle_upload(
    State(state): State<Arc<UploadState>>,
    mut multipart: Multipart,
) -> Response {
    let mut field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No file provided.".into(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::warn!("malformed multipart request: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Malformed upload request.".into(),
                }),
            )
                .into_response();
        }
    };

    if let Err(rejection) = check_content_type(field.content_type()) {
        return rejection;
    }

    let filename = sanitize_filename(field.file_name().unwrap_or("document"));

    if let Err(e) = tokio::fs::create_dir_all(&state.upload_dir).await {
        tracing::error!("cannot create upload directory: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to save file.".into(),
            }),
        )
            .into_response();
    }

    // Stream chunk-by-chunk so a large upload never sits fully in memory.
    let destination = state.upload_dir.join(&filename);
    let mut file = match tokio::fs::File::create(&destination).await {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("cannot create {}: {e}", destination.display());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save file.".into(),
                }),
            )
                .into_response();
        }
    };

    let mut written = 0usize;
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                written += chunk.len();
                if written > MAX_UPLOAD_BYTES {
                    let _ = tokio::fs::remove_file(&destination).await;
                    return (
                        StatusCode::PAYLOAD_TOO_LARGE,
                        Json(ErrorResponse {
                            error: format!(
                                "File too large. Maximum {}MB.",
                                MAX_UPLOAD_BYTES / (1024 * 1024)
                            ),
                        }),
                    )
                        .into_response();
                }
                if let Err(e) = tokio::io::AsyncWriteExt::write_all(&mut file, &chunk).await {
                    tracing::error!("write failed for {}: {e}", destination.display());
                    let _ = tokio::fs::remove_file(&destination).await;
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to save file.".into(),
                        }),
                    )
                        .into_response();
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("upload stream interrupted: {e}");
                let _ = tokio::fs::remove_file(&destination).await;
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Failed to read file data.".into(),
                    }),
                )
                    .into_response();
            }
        }
    }

    tracing::info!(filename, bytes = written, "document uploaded");

    (
        StatusCode::OK,
        Json(UploadResponse {
            filename,
            message: "File successfully uploaded.".into(),
        }),
    )
        .into_response()
}

async fn handle_report(
    State(state): State<Arc<UploadState>>,
    AxumPath(filename): AxumPath<String>,
    Query(params): Query<ReportParams>,
) -> Response {
    let filename = sanitize_filename(&filename);
    let upload_dir = state.upload_dir.clone();
    let rewrite = params.rewrite;

    // The whole pipeline is synchronous; run it on the blocking pool.
    let result = tokio::task::spawn_blocking(move || {
        let processor = DocumentProcessor::from_env()?;
        processor.process(&filename, &upload_dir, rewrite)
    })
    .await;

    match result {
        Ok(Ok(results)) => (StatusCode::OK, Json(results)).into_response(),
        Ok(Err(err)) => {
            tracing::error!("processing failed: {err}");
            (
                status_for(&err),
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        Err(join_err) => {
            tracing::error!("processing task panicked: {join_err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal processing error.".into(),
                }),
            )
                .into_response()
        }
    }
}

fn status_for(err: &ProcessError) -> StatusCode {
    match err {
        ProcessError::NotFound { .. } => StatusCode::NOT_FOUND,
        ProcessError::InvalidType(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
