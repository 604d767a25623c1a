//! shufd - Shuffle playback daemon entry point
//!
//! Wires the pieces together: resolved configuration, the shared state the
//! HTTP handlers read, the engine event channel, the playback loop, and the
//! axum control surface.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shufd::api::{self, AppContext};
use shufd::config::{Args, Config};
use shufd::engine::Engine;
use shufd::state::SharedState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shufd=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::resolve(args).context("failed to resolve configuration")?;

    info!(
        "Starting shufd v{} on port {}",
        env!("CARGO_PKG_VERSION"),
        config.port
    );
    info!("Music root: {}", config.music_root.display());
    info!("Playlist: {}", config.playlist_path.display());

    let state = Arc::new(SharedState::new());
    let (event_tx, event_rx) = mpsc::channel(64);

    // Engine construction loads the playlist and state snapshot; any
    // configuration problem aborts startup before the server binds.
    let engine = Engine::new(&config, Arc::clone(&state), event_tx.clone())
        .context("failed to initialize playback engine")?;

    let ctx = AppContext {
        state,
        events: event_tx,
    };

    tokio::select! {
        res = engine.run(event_rx) => {
            res.context("playback engine failed")?;
            info!("playback finished, shutting down");
        }
        res = api::run(config.port, ctx) => {
            res.context("HTTP server failed")?;
        }
        _ = shutdown_signal() => {
            // Any live player process is left to the OS.
            info!("shutdown signal received");
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
