//! Playback engine: the single-owner control loop
//!
//! All playback-state mutation happens here, on one task. Everything else
//! (HTTP handlers, the child-exit watcher) communicates by sending
//! [`EngineEvent`]s; the loop's only suspension point is `recv().await` on
//! that channel. An event is queued before the wait can return, so an exit
//! notification is never lost between iterations.
//!
//! State machine: Idle → Playing → (skip) Stopping → Playing → … The loop
//! ends cleanly when the shuffle epoch is exhausted or on `Shutdown`; a
//! live child is then left to the OS.

use std::process::ExitStatus;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::display::DisplayNotifier;
use crate::error::{Error, Result};
use crate::player::PlayerSupervisor;
use crate::playlist::PlaylistState;
use crate::state::SharedState;

/// All inputs into the engine loop.
#[derive(Debug)]
pub enum EngineEvent {
    /// A skip was requested on the control surface.
    SkipRequested,
    /// The watcher observed the player process exit. `status` is `None`
    /// only when the OS wait itself failed.
    PlayerExited {
        pid: u32,
        status: Option<ExitStatus>,
    },
    /// Stop the loop.
    Shutdown,
}

#[derive(Debug)]
pub struct Engine {
    playlist: PlaylistState,
    player: PlayerSupervisor,
    state: Arc<SharedState>,
    display: DisplayNotifier,
    /// A stop is in flight; coalesces repeated skip requests so one skip
    /// produces exactly one SIGTERM and one subsequent start.
    stop_pending: bool,
}

impl Engine {
    pub fn new(
        config: &Config,
        state: Arc<SharedState>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self> {
        let playlist = PlaylistState::load(&config.playlist_path, &config.state_path)?;
        info!(
            seed = playlist.seed(),
            consumed = playlist.count(),
            remaining = playlist.remaining().len(),
            "playlist ready"
        );

        let player = PlayerSupervisor::new(
            config.player.clone(),
            config.player_args.clone(),
            config.music_root.clone(),
            event_tx,
        );

        Ok(Self {
            playlist,
            player,
            state,
            display: DisplayNotifier::new(config.display_url.clone()),
            stop_pending: false,
        })
    }

    /// Run the control loop until the playlist is exhausted, `Shutdown`
    /// arrives, or a fatal error (spawn/signal failure) occurs.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<EngineEvent>) -> Result<()> {
        info!("engine: starting playback loop");

        if !self.start_next().await? {
            return Ok(());
        }

        while let Some(evt) = event_rx.recv().await {
            match evt {
                EngineEvent::SkipRequested => self.handle_skip()?,

                EngineEvent::PlayerExited { pid, status } => {
                    match self.player.reap(pid) {
                        Ok(track) => match status {
                            Some(s) if s.success() => debug!(pid, %track, "track finished"),
                            Some(s) => debug!(pid, %track, %s, "player exited non-zero"),
                            None => warn!(pid, %track, "player exit status unknown"),
                        },
                        Err(Error::NoActiveProcess) => {
                            warn!(pid, "stale exit notification, ignoring");
                            continue;
                        }
                        Err(e) => return Err(e),
                    }
                    self.stop_pending = false;

                    if !self.start_next().await? {
                        break;
                    }
                }

                EngineEvent::Shutdown => {
                    info!("engine: shutdown requested");
                    break;
                }
            }
        }

        info!("engine: playback loop ended");
        Ok(())
    }

    fn handle_skip(&mut self) -> Result<()> {
        if self.stop_pending {
            debug!("skip already in flight, coalescing");
            return Ok(());
        }
        match self.player.request_stop() {
            Ok(()) => {
                self.stop_pending = true;
                Ok(())
            }
            Err(Error::NoActiveProcess) => {
                debug!("skip requested with no active player");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Advance the playlist and start the next track. The snapshot is
    /// persisted by `advance()` before the spawn.
    ///
    /// Returns `Ok(false)` when the shuffle epoch is exhausted (clean end
    /// of the loop). Spawn and snapshot-write failures are fatal: without
    /// a player no forward progress is possible, and idling silently would
    /// leave no visible cause.
    async fn start_next(&mut self) -> Result<bool> {
        let track = match self.playlist.advance() {
            Ok(track) => track,
            Err(Error::PlaylistExhausted) => {
                info!("shuffle epoch complete, stopping playback");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        info!(%track, remaining = self.playlist.remaining().len(), "playing");

        self.player.start(&track)?;

        self.state.set_current_track(Some(track.clone())).await;
        self.state.set_remaining(self.playlist.remaining().len());
        self.display.notify_track(&track).await;

        Ok(true)
    }
}
