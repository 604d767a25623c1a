//! HTTP request handlers

use axum::{extract::State, response::Html, Json};
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::server::AppContext;
use crate::engine::EngineEvent;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    current_track: Option<String>,
    remaining: usize,
}

/// GET / - current-track page with a skip link
pub async fn index(State(ctx): State<AppContext>) -> Html<String> {
    let current = ctx
        .state
        .current_track()
        .await
        .unwrap_or_else(|| "(nothing)".to_string());
    Html(format!(
        "Playing <b>{}</b><br/><a href=\"/next\">skip</a>",
        current
    ))
}

/// GET /next - queue a skip request and bounce back to `/`
///
/// Responds immediately; the actual stop/advance happens on the engine
/// loop once it picks the event up.
pub async fn skip_next(State(ctx): State<AppContext>) -> Html<&'static str> {
    debug!("skip requested via control surface");
    if ctx.events.send(EngineEvent::SkipRequested).await.is_err() {
        // Engine loop has ended (playlist exhausted); nothing to skip.
        warn!("skip requested but playback loop is not running");
    }
    Html(r#"<meta http-equiv="refresh" content="0; url=/" />"#)
}

/// GET /health - health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "shufd".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /status - machine-readable playback status
pub async fn status(State(ctx): State<AppContext>) -> Json<StatusResponse> {
    Json(StatusResponse {
        current_track: ctx.state.current_track().await,
        remaining: ctx.state.remaining(),
    })
}

/// Fallback - the control surface never answers with an error status
pub async fn not_understood() -> &'static str {
    "Request not understood"
}
