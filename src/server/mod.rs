//! HTTP server for the generation bridge
//!
//! Binds IPv4 and IPv6 listeners (loopback-only when configured) and
//! serves the native and Ollama-compatible routes over one pipeline.

mod bridge;
mod handlers;
mod routes;

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Defaults, ServerConfig};
use crate::engine::Engine;

pub use handlers::AppState;
pub use routes::api_routes;

/// Start the HTTP bridge server
///
/// The IPv4 listener is required; the IPv6 one is best effort, since
/// some hosts have IPv6 disabled (or fold it into the IPv4 bind).
pub async fn start(engine: Arc<dyn Engine>, defaults: Defaults, config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::new(engine, defaults));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let v4_addr = format!("{}:{}", config.bind_addr_v4(), config.port);
    let v4 = TcpListener::bind(&v4_addr).await?;

    let v6_addr = format!("[{}]:{}", config.bind_addr_v6(), config.port);
    let v6 = match TcpListener::bind(&v6_addr).await {
        Ok(listener) => Some(listener),
        Err(err) => {
            tracing::warn!("IPv6 bind on {} unavailable: {}", v6_addr, err);
            None
        }
    };

    println!("lumen started on port {}!", config.port);
    tracing::info!("listening on {}", v4_addr);
    tracing::info!("  GET  /             - liveness probe");
    tracing::info!("  POST /             - generate text");
    tracing::info!("  POST /api/generate - generate text (Ollama-compatible)");
    tracing::info!("  GET  /api/tags     - list models (Ollama-compatible)");

    match v6 {
        Some(v6) => {
            tokio::try_join!(
                axum::serve(v4, app.clone()).into_future(),
                axum::serve(v6, app).into_future()
            )?;
        }
        None => axum::serve(v4, app).await?,
    }

    Ok(())
}
