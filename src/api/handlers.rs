//! HTTP request handlers

use super::types::{ChatRequest, ErrorResponse};
use super::AppState;
use crate::export::{export_all, export_page};
use crate::llm::{GenerationError, GenerationErrorKind, GenerationRequest};
use crate::system_prompt::build_system_prompt;
use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use tokio::time::{timeout_at, Instant};
use tower_http::compression::CompressionLayer;
use tracing::Instrument;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_MARKDOWN: &str = "text/markdown; charset=utf-8";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    // Exports are whole documents and compress well; the chat stream must
    // not be buffered by a compressor, so it stays outside this layer.
    let exports = Router::new()
        .route("/llms.mdx", get(export_root))
        .route("/llms.mdx/*slug", get(export_by_slug))
        .route("/llms-full.txt", get(export_full))
        .layer(CompressionLayer::new());

    Router::new()
        .route("/api/ai", post(chat))
        .route("/version", get(get_version))
        .merge(exports)
        .with_state(state)
}

// ============================================================
// Chat
// ============================================================

async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid chat request: {e}")))?;

    let Some(generator) = state.generator.clone() else {
        return Err(AppError::Unavailable(
            "No generation provider configured".to_string(),
        ));
    };

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id, turns = request.messages.len());

    async move {
        let deadline = Instant::now() + state.chat_deadline;

        let context = state.context.build_context();
        let system = build_system_prompt(&state.site_name, &context);
        let generation = GenerationRequest::new(system, request.messages);

        let mut stream = match timeout_at(deadline, generator.generate(&generation)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(AppError::from(e)),
            Err(_) => return Err(AppError::deadline()),
        };

        // Hold the response until the first chunk so early failures can
        // still be reported with a proper status code.
        let first = match timeout_at(deadline, stream.next()).await {
            Ok(Some(Ok(chunk))) => Some(chunk),
            Ok(Some(Err(e))) => return Err(AppError::from(e)),
            Ok(None) => None,
            Err(_) => return Err(AppError::deadline()),
        };

        tracing::debug!(empty = first.is_none(), "Streaming chat response");

        // A generation error after this point aborts the connection; the
        // deadline simply ends the body.
        let body = futures::stream::iter(first.map(Ok))
            .chain(stream)
            .take_until(tokio::time::sleep_until(deadline))
            .map(|item| item.map(Bytes::from));

        Ok(([(header::CONTENT_TYPE, TEXT_PLAIN)], Body::from_stream(body)).into_response())
    }
    .instrument(span)
    .await
}

// ============================================================
// Exports
// ============================================================

async fn export_root(State(state): State<AppState>) -> Result<Response, AppError> {
    export_slug(&state, "").await
}

async fn export_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    export_slug(&state, &slug).await
}

async fn export_slug(state: &AppState, slug: &str) -> Result<Response, AppError> {
    let page = state
        .corpus
        .find_by_slug(slug)
        .ok_or_else(|| AppError::NotFound(format!("No page at /docs/{slug}")))?;

    let text = export_page(state.corpus.as_ref(), page).await;
    Ok(([(header::CONTENT_TYPE, TEXT_MARKDOWN)], text).into_response())
}

async fn export_full(State(state): State<AppState>) -> impl IntoResponse {
    let text = export_all(state.corpus.as_ref()).await;
    ([(header::CONTENT_TYPE, TEXT_PLAIN)], text)
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("z360-docs ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    Upstream { status: StatusCode, message: String },
}

impl AppError {
    fn deadline() -> Self {
        AppError::Upstream {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: "Generation did not start before the deadline".to_string(),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        let status = match e.kind {
            GenerationErrorKind::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::BAD_GATEWAY,
        };
        AppError::Upstream {
            status,
            message: e.message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Upstream { status, message } => {
                tracing::warn!(status = %status, error = %message, "Chat request failed before streaming");
                (status, message)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
