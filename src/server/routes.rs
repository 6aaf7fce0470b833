//! Route definitions

use std::sync::Arc;

use axum::{routing::any, Router};

use super::handlers::{api_generate, list_models, root, AppState};

/// Create the API router with the native and Ollama-compatible endpoints
///
/// `/` and `/api/generate` are aliases over the same generation pipeline;
/// `/api/tags` is a static compatibility answer.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", any(root))
        .route("/api/generate", any(api_generate))
        .route("/api/tags", any(list_models))
}
