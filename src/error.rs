//! Error types for shufd
//!
//! Module-specific error types using thiserror for clear error propagation.
//! The engine decides fatal vs. tolerable per variant: `Config` aborts
//! startup, `Spawn` and `Signal` are fatal to the playback loop,
//! `PlaylistExhausted` ends the loop cleanly, and `NoActiveProcess` is a
//! benign no-op.

use thiserror::Error;

/// Main error type for shufd
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The current shuffle epoch has no tracks left
    #[error("Playlist exhausted")]
    PlaylistExhausted,

    /// Launching the external player process failed
    #[error("Failed to spawn player: {0}")]
    Spawn(#[source] std::io::Error),

    /// Delivering a signal to the tracked player process failed
    #[error("Failed to signal player: {0}")]
    Signal(String),

    /// Stop or reap requested while no player process is tracked
    #[error("No active player process")]
    NoActiveProcess,

    /// A player process is already tracked (caller must reap first)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// File I/O errors (playlist source, state snapshot)
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server errors
    #[error("HTTP server error: {0}")]
    Http(String),
}

/// Convenience Result type using shufd Error
pub type Result<T> = std::result::Result<T, Error>;
