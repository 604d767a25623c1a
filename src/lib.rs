//! # shufd — shuffle playback daemon
//!
//! Maintains a persistent, resumable shuffled playlist, runs one external
//! decoder process for the current track, and serves a minimal HTTP control
//! surface (current track + skip). When the player process exits, the next
//! track starts automatically.
//!
//! **Architecture:** all playback-state mutation happens on a single event
//! loop ([`engine::Engine`]); the HTTP handlers and the child-exit watcher
//! only send [`engine::EngineEvent`]s into it.

pub mod api;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod player;
pub mod playlist;
pub mod state;

pub use error::{Error, Result};
pub use state::SharedState;
