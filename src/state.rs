//! Shared playback state
//!
//! Read by the HTTP handlers, written only by the engine loop. Uses RwLock
//! for concurrent read access with rare writes.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// State accessible to the control surface.
#[derive(Debug)]
pub struct SharedState {
    /// Track currently handed to the player (None before the first start).
    current_track: RwLock<Option<String>>,
    /// Tracks left in the current shuffle epoch.
    remaining: AtomicUsize,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            current_track: RwLock::new(None),
            remaining: AtomicUsize::new(0),
        }
    }

    pub async fn current_track(&self) -> Option<String> {
        self.current_track.read().await.clone()
    }

    pub async fn set_current_track(&self, track: Option<String>) {
        *self.current_track.write().await = track;
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Relaxed)
    }

    pub fn set_remaining(&self, remaining: usize) {
        self.remaining.store(remaining, Ordering::Relaxed);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
