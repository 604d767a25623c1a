//! HTTP server setup and routing
//!
//! The control surface is deliberately tiny and always answers 200: the
//! current-track page at `/`, the skip action at `/next`, plus the usual
//! `/health` and `/status` JSON endpoints. Unknown paths get a plain-text
//! "not understood" page rather than an error status.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine::EngineEvent;
use crate::error::{Error, Result};
use crate::state::SharedState;

/// Shared application context passed to all handlers.
#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<SharedState>,
    /// Events into the engine loop. Handlers never mutate playback state
    /// themselves; they only queue events here.
    pub events: mpsc::Sender<EngineEvent>,
}

/// Build the application router.
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(super::handlers::index))
        .route("/next", get(super::handlers::skip_next))
        .route("/health", get(super::handlers::health))
        .route("/status", get(super::handlers::status))
        .fallback(super::handlers::not_understood)
        .with_state(ctx)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve the control surface.
pub async fn run(port: u16, ctx: AppContext) -> Result<()> {
    let app = build_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Http(format!("server error: {}", e)))?;

    Ok(())
}
