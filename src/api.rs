//! HTTP surface for Rusty Digest.
//!
//! This module exposes a compact Axum router:
//!
//! - `POST /upload` – Accept a multipart upload with a `pdf` file field, extract its text, and
//!   return `{"summary": "..."}`. Blank documents yield `400 {"error": ...}`; parse or model
//!   failures yield `500 {"error": ...}` carrying the failure description.
//! - `GET /metrics` – Observe summarization counters, including chunks dropped by the cap.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.

use crate::processing::{ProcessingApi, ProcessingError};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Multipart field carrying the uploaded document.
pub const UPLOAD_FIELD: &str = "pdf";

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: ProcessingApi + 'static,
{
    Router::new()
        .route("/upload", post(upload_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

/// Success response for the `POST /upload` endpoint.
#[derive(Serialize)]
struct SummaryResponse {
    /// Per-chunk summaries joined with line breaks.
    summary: String,
}

/// Summarize an uploaded PDF.
///
/// Reads the `pdf` field into memory, then hands the bytes to the processing pipeline. Other
/// form fields are ignored.
async fn upload_document<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: ProcessingApi,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("upload", %request_id);

    async move {
        let multipart = multipart.map_err(|rejection| AppError {
            status: rejection.status(),
            message: rejection.body_text(),
        })?;
        let document = read_document(multipart).await?;
        tracing::info!(bytes = document.len(), "Received PDF upload");

        let outcome = service.summarize_document(document).await.inspect_err(|error| {
            if error.is_rejection() {
                tracing::info!(error = %error, "Upload rejected");
            } else {
                tracing::error!(error = %error, "Summarization failed");
            }
        })?;
        tracing::info!(
            chunks = outcome.chunks_summarized,
            chunks_total = outcome.chunks_total,
            characters = outcome.characters,
            "Upload request completed"
        );
        Ok::<_, AppError>(Json(SummaryResponse {
            summary: outcome.summary,
        }))
    }
    .instrument(span)
    .await
}

async fn read_document(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field.bytes().await?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ProcessingError::InvalidUpload(format!("missing multipart field '{UPLOAD_FIELD}'")).into())
}

/// Return the summarization counters accumulated since startup.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<crate::metrics::MetricsSnapshot>
where
    S: ProcessingApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "upload",
                method: "POST",
                path: "/upload",
                description: "Summarize a PDF sent as multipart field 'pdf'. Returns { \"summary\": string } or { \"error\": string }.",
                request_example: Some(json!({
                    "content_type": "multipart/form-data",
                    "fields": { "pdf": "<file.pdf>" }
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summarization counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

/// Error payload returned as `{"error": message}` with an explicit status code.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(error: ProcessingError) -> Self {
        let status = match error {
            ProcessingError::InvalidUpload(_) | ProcessingError::NoReadableText => {
                StatusCode::BAD_REQUEST
            }
            ProcessingError::Extraction(_)
            | ProcessingError::Chunking(_)
            | ProcessingError::Summarization(_)
            | ProcessingError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(error: MultipartError) -> Self {
        Self {
            status: error.status(),
            message: error.body_text(),
        }
    }
}
