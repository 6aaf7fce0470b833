//! HTTP request handlers
//!
//! Every syntactically valid generation request is answered with `200`
//! and a single `response` field, even when generation itself failed or
//! was filtered; the only non-`200` statuses are for bodies that never
//! reach the engine.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tokio::runtime::Handle;
use tokio::task;

use super::bridge;
use crate::config::{Defaults, EffectiveConfig, GenerateRequest};
use crate::engine::{Engine, GenerationOutcome};

/// Shared application state
pub struct AppState {
    pub engine: Arc<dyn Engine>,
    pub defaults: Defaults,
}

impl AppState {
    pub fn new(engine: Arc<dyn Engine>, defaults: Defaults) -> Self {
        Self { engine, defaults }
    }
}

/// Root endpoint: liveness text for anything but POST, generation for POST.
pub async fn root(State(state): State<Arc<AppState>>, method: Method, body: Bytes) -> Response {
    if method == Method::POST {
        generate(state, body).await
    } else {
        (StatusCode::OK, "OK").into_response()
    }
}

/// Ollama-compatible generation alias; POST only.
pub async fn api_generate(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::POST {
        generate(state, body).await
    } else {
        StatusCode::BAD_REQUEST.into_response()
    }
}

/// Static model listing for Ollama clients that insist on asking.
/// Never touches the engine.
pub async fn list_models() -> Response {
    let payload = json!({
        "models": [
            {
                "name": "lumen:latest",
                "model": "lumen:latest",
            }
        ]
    });
    (StatusCode::OK, Json(payload)).into_response()
}

/// Shared generation pipeline for `/` and `/api/generate`.
async fn generate(state: Arc<AppState>, body: Bytes) -> Response {
    // Empty body is rejected before any parsing is attempted.
    if body.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let handle = Handle::current();
    match task::spawn_blocking(move || handle_on_thread(state, handle, body)).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("generation handler aborted: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Runs on a blocking-pool thread: parse, resolve, block on the engine,
/// format.
fn handle_on_thread(state: Arc<AppState>, handle: Handle, body: Bytes) -> Response {
    let request: GenerateRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::error!("error decoding request: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // A request without a usable prompt never reaches the engine.
    if request.prompt.is_empty() {
        tracing::error!("error decoding request: prompt is empty");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let config = EffectiveConfig::resolve(&request, &state.defaults);
    let outcome = bridge::invoke(
        &handle,
        Arc::clone(&state.engine),
        request.prompt.clone(),
        config,
    );

    format_response(&request.prompt, &outcome)
}

/// Serialize an outcome to the wire and emit the request log record.
///
/// All three outcome variants map to `200` with one string field; the
/// log record carries the prompt and the resulting text (the subscriber
/// supplies the timestamp) and can never change the response.
fn format_response(prompt: &str, outcome: &GenerationOutcome) -> Response {
    let text = outcome.text();
    let response = (StatusCode::OK, Json(json!({ "response": text }))).into_response();
    tracing::info!(prompt, response = text, "request handled");
    response
}
