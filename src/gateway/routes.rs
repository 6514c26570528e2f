//! Gateway routes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::error::{
    GatewayError, MISSING_URL_MSG, PARSE_FAILED_MSG, STATUS_FAILED_MSG, SUBMIT_FAILED_MSG,
};
use crate::fs::sanitize_filename;
use crate::gateway::backend::BackendClient;

type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Shared state for the gateway routes.
#[derive(Clone)]
pub struct GatewayState {
    backend: Arc<BackendClient>,
    cache_max_age_secs: u64,
}

impl GatewayState {
    pub fn new(backend: BackendClient, cache_max_age_secs: u64) -> Self {
        Self {
            backend: Arc::new(backend),
            cache_max_age_secs,
        }
    }
}

/// Build the gateway router.
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/parse", post(parse_handler))
        .route("/api/download", post(download_handler))
        .route("/api/status/{task_id}", get(status_handler))
        .route("/api/files/{filename}", get(file_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reject bodies without a non-blank `url` before they reach the backend.
fn require_url(payload: std::result::Result<Json<Value>, JsonRejection>) -> GatewayResult<Value> {
    let Json(body) = payload?;
    let has_url = body
        .get("url")
        .and_then(Value::as_str)
        .map(|url| !url.trim().is_empty())
        .unwrap_or(false);

    if !has_url {
        return Err(GatewayError::InvalidInput(MISSING_URL_MSG.to_string()));
    }
    Ok(body)
}

/// POST /api/parse
async fn parse_handler(
    State(state): State<GatewayState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> GatewayResult<Json<Value>> {
    let body = require_url(payload)?;
    let parsed = state.backend.parse(&body, PARSE_FAILED_MSG).await?;
    Ok(Json(parsed))
}

/// POST /api/download
async fn download_handler(
    State(state): State<GatewayState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> GatewayResult<Json<Value>> {
    let body = require_url(payload)?;
    let submitted = state.backend.download(&body, SUBMIT_FAILED_MSG).await?;
    Ok(Json(submitted))
}

/// GET /api/status/{task_id}
async fn status_handler(
    State(state): State<GatewayState>,
    Path(task_id): Path<String>,
) -> GatewayResult<Json<Value>> {
    // Task ids are opaque; the backend client percent-encodes them.
    if task_id.trim().is_empty() {
        return Err(GatewayError::InvalidInput("missing task id".to_string()));
    }

    let mut payload = state.backend.status(&task_id, STATUS_FAILED_MSG).await?;
    if let Some(Value::String(url)) = payload.get_mut("downloadUrl") {
        *url = state.backend.rewrite_result_url(url);
    }
    Ok(Json(payload))
}

/// GET /api/files/{filename}
async fn file_handler(
    State(state): State<GatewayState>,
    Path(filename): Path<String>,
) -> GatewayResult<Response> {
    let safe_name =
        sanitize_filename(&filename).map_err(|e| GatewayError::InvalidInput(e.to_string()))?;

    let upstream = state.backend.file(&filename).await?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .or_else(|| {
            let guessed = mime_guess::from_path(&safe_name).first_or_octet_stream();
            HeaderValue::from_str(guessed.as_ref()).ok()
        });
    let content_length = upstream.headers().get(header::CONTENT_LENGTH).cloned();

    let mut response = Body::from_stream(upstream.bytes_stream()).into_response();
    let headers = response.headers_mut();

    if let Some(value) = content_type {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Some(value) = content_length {
        headers.insert(header::CONTENT_LENGTH, value);
    }

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    if let Ok(cache) = HeaderValue::from_str(&format!("public, max-age={}", state.cache_max_age_secs))
    {
        headers.insert(header::CACHE_CONTROL, cache);
    }

    Ok(response)
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "app": "postgrab-gateway" }))
}
