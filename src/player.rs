//! External player process supervision
//!
//! [`PlayerSupervisor`] owns the lifecycle of at most one external decoder
//! process. `start()` spawns the configured player command against the
//! resolved track path and hands the `Child` to a watcher task; the watcher
//! awaits the exit (which also releases the OS process-table entry) and
//! sends [`EngineEvent::PlayerExited`] into the engine channel. `reap()` is
//! pure bookkeeping afterwards: it clears the tracked handle and never
//! blocks.
//!
//! Stop is asynchronous by design: `request_stop()` delivers SIGTERM and
//! returns immediately; the exit is observed through the watcher like any
//! natural end-of-track.

use std::path::PathBuf;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::EngineEvent;
use crate::error::{Error, Result};

/// The one live player process, if any.
#[derive(Debug)]
struct ActivePlayer {
    pid: u32,
    track: String,
}

/// Launches, signals, and reaps the external player process.
#[derive(Debug)]
pub struct PlayerSupervisor {
    command: String,
    args: Vec<String>,
    music_root: PathBuf,
    active: Option<ActivePlayer>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl PlayerSupervisor {
    pub fn new(
        command: String,
        args: Vec<String>,
        music_root: PathBuf,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        Self {
            command,
            args,
            music_root,
            active: None,
            event_tx,
        }
    }

    /// Spawn the player for `track`, resolved against the music root.
    ///
    /// The previous process must have been reaped first; starting on top of
    /// a tracked process would leak its handle, so that is surfaced as an
    /// [`Error::InvalidState`] rather than silently allowed. Spawn failures
    /// propagate: the caller treats them as fatal.
    pub fn start(&mut self, track: &str) -> Result<()> {
        if let Some(active) = &self.active {
            return Err(Error::InvalidState(format!(
                "player pid {} still tracked for \"{}\"",
                active.pid, active.track
            )));
        }

        let path = self.music_root.join(track);
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(&path)
            .spawn()
            .map_err(Error::Spawn)?;

        let pid = child.id().ok_or_else(|| {
            Error::Spawn(std::io::Error::new(
                std::io::ErrorKind::Other,
                "spawned child has no pid",
            ))
        })?;

        info!(pid, track, "player started");
        self.active = Some(ActivePlayer {
            pid,
            track: track.to_string(),
        });

        // Watcher task: owns the Child, performs the OS-level wait, and
        // wakes the engine loop. Channel send is the flag-then-wake step;
        // the event is queued before the loop's recv() can return, so an
        // exit is never lost.
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let status = match child.wait().await {
                Ok(status) => {
                    debug!(pid, %status, "player exited");
                    Some(status)
                }
                Err(e) => {
                    warn!(pid, "waiting on player failed: {}", e);
                    None
                }
            };
            let _ = tx.send(EngineEvent::PlayerExited { pid, status }).await;
        });

        Ok(())
    }

    /// Deliver SIGTERM to the tracked process. Does not wait for the exit.
    ///
    /// ESRCH (the process already exited, notification still in flight) is
    /// tolerated as a no-op; other delivery failures surface, since an
    /// unsignalled process would play on forever.
    pub fn request_stop(&self) -> Result<()> {
        let active = self.active.as_ref().ok_or(Error::NoActiveProcess)?;

        match signal::kill(Pid::from_raw(active.pid as i32), Signal::SIGTERM) {
            Ok(()) => {
                debug!(pid = active.pid, "SIGTERM sent to player");
                Ok(())
            }
            Err(Errno::ESRCH) => {
                debug!(pid = active.pid, "player already gone, stop is a no-op");
                Ok(())
            }
            Err(e) => Err(Error::Signal(format!(
                "SIGTERM to pid {} failed: {}",
                active.pid, e
            ))),
        }
    }

    /// Clear the tracked handle after an exit notification for `pid`.
    ///
    /// The OS-level reap already happened in the watcher; this only
    /// releases the slot so the next `start()` is legal. A stale pid (an
    /// exit event from a process that is no longer the tracked one) is
    /// rejected with [`Error::NoActiveProcess`] and leaves the slot alone.
    pub fn reap(&mut self, pid: u32) -> Result<String> {
        match self.active.take() {
            Some(active) if active.pid == pid => Ok(active.track),
            Some(active) => {
                self.active = Some(active);
                Err(Error::NoActiveProcess)
            }
            None => Err(Error::NoActiveProcess),
        }
    }

    /// Whether a player process is currently tracked.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
