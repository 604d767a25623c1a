//! Persistent shuffled playlist state
//!
//! The shuffle is deterministic: a `seed` is drawn once when no snapshot
//! exists, then persisted forever. On every load the full track list is
//! permuted with a seeded RNG (Fisher-Yates via `SliceRandom::shuffle`), so
//! the same seed yields the same order on any machine and any run. `count`
//! records how many tracks of that order have been consumed.
//!
//! `advance()` rewrites the snapshot *before* the caller starts playback.
//! A crash between the snapshot write and the spawn therefore skips one
//! track; it can never replay a track already marked consumed. Accepted
//! trade-off for a single flat-file snapshot.
//!
//! Snapshot format: one `key value` pair per line (`seed`, `count`),
//! overwritten wholesale on every save.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Persisted shuffle progress plus the derived track order.
#[derive(Debug)]
pub struct PlaylistState {
    /// Full track list in seed-determined shuffle order (never persisted).
    order: Vec<String>,
    /// Shuffle seed, fixed for the lifetime of the snapshot file.
    seed: u64,
    /// Tracks consumed since `seed` was fixed. Monotone; persisted.
    count: usize,
    /// Track returned by the most recent `advance()`.
    current: Option<String>,
    state_path: PathBuf,
}

impl PlaylistState {
    /// Load the playlist source and the state snapshot.
    ///
    /// An absent snapshot starts a fresh shuffle epoch: a new seed drawn
    /// uniformly from `[0, 2^63)` and `count = 0`. An empty playlist source
    /// is a fatal configuration error.
    pub fn load(playlist_path: &Path, state_path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(playlist_path).map_err(|e| {
            Error::Config(format!(
                "cannot read playlist {}: {}",
                playlist_path.display(),
                e
            ))
        })?;

        let tracks: Vec<String> = source
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if tracks.is_empty() {
            return Err(Error::Config(format!(
                "playlist {} contains no tracks",
                playlist_path.display()
            )));
        }

        let (seed, count) = match std::fs::read_to_string(state_path) {
            Ok(text) => Self::parse_snapshot(&text, state_path)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let seed = rand::thread_rng().gen_range(0..1u64 << 63);
                info!(seed, "no state snapshot, starting fresh shuffle epoch");
                (seed, 0)
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "cannot read state snapshot {}: {}",
                    state_path.display(),
                    e
                )))
            }
        };

        let mut order = tracks;
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        debug!(
            seed,
            count,
            total = order.len(),
            "playlist loaded and shuffled"
        );

        Ok(Self {
            order,
            seed,
            count,
            current: None,
            state_path: state_path.to_path_buf(),
        })
    }

    fn parse_snapshot(text: &str, path: &Path) -> Result<(u64, usize)> {
        let mut seed = None;
        let mut count = None;
        for line in text.lines() {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("seed"), Some(v)) => {
                    seed = Some(v.parse::<u64>().map_err(|e| {
                        Error::Config(format!("bad seed in {}: {}", path.display(), e))
                    })?)
                }
                (Some("count"), Some(v)) => {
                    count = Some(v.parse::<usize>().map_err(|e| {
                        Error::Config(format!("bad count in {}: {}", path.display(), e))
                    })?)
                }
                _ => {}
            }
        }
        match (seed, count) {
            (Some(s), Some(c)) => Ok((s, c)),
            _ => Err(Error::Config(format!(
                "state snapshot {} is missing seed or count",
                path.display()
            ))),
        }
    }

    /// Consume and return the next track in the shuffle order.
    ///
    /// The updated snapshot is written (and the file closed) before this
    /// returns, so the caller may only start playback for a track already
    /// marked consumed. Returns [`Error::PlaylistExhausted`], without
    /// touching the snapshot, when nothing remains.
    pub fn advance(&mut self) -> Result<String> {
        if self.count >= self.order.len() {
            return Err(Error::PlaylistExhausted);
        }

        self.count += 1;
        self.persist()?;

        let track = self.order[self.count - 1].clone();
        self.current = Some(track.clone());
        Ok(track)
    }

    /// Track returned by the most recent `advance()`, if any.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Tracks not yet consumed in this shuffle epoch.
    pub fn remaining(&self) -> &[String] {
        self.order.get(self.count..).unwrap_or(&[])
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn persist(&self) -> Result<()> {
        std::fs::write(
            &self.state_path,
            format!("seed {}\ncount {}\n", self.seed, self.count),
        )?;
        Ok(())
    }
}
