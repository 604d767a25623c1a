//! Configuration loading and resolution
//!
//! Every setting resolves with the same priority order: command-line
//! argument, then environment variable (handled by clap), then the TOML
//! config file, then the compiled default. The config file is
//! `~/.config/shufd/config.toml` unless `--config` points elsewhere.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_PLAYER: &str = "/usr/bin/mpg321";

/// Command-line arguments for shufd
#[derive(Parser, Debug, Default)]
#[command(name = "shufd")]
#[command(about = "Shuffle playback daemon with HTTP control surface")]
#[command(version)]
pub struct Args {
    /// Port for the HTTP control surface
    #[arg(short, long, env = "SHUFD_PORT")]
    port: Option<u16>,

    /// Root folder track identifiers are resolved against
    #[arg(short = 'r', long, env = "SHUFD_MUSIC_ROOT")]
    music_root: Option<PathBuf>,

    /// Playlist source file, one track per line
    #[arg(long, env = "SHUFD_PLAYLIST")]
    playlist: Option<PathBuf>,

    /// Shuffle-progress snapshot file
    #[arg(long, env = "SHUFD_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// External player command
    #[arg(long, env = "SHUFD_PLAYER")]
    player: Option<String>,

    /// Display service URL (omit to disable display pushes)
    #[arg(long, env = "SHUFD_DISPLAY_URL")]
    display_url: Option<String>,

    /// Explicit config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Optional TOML config file contents.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    port: Option<u16>,
    music_root: Option<PathBuf>,
    playlist: Option<PathBuf>,
    state_file: Option<PathBuf>,
    player: Option<String>,
    player_args: Option<Vec<String>>,
    display_url: Option<String>,
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub music_root: PathBuf,
    pub playlist_path: PathBuf,
    pub state_path: PathBuf,
    pub player: String,
    pub player_args: Vec<String>,
    pub display_url: Option<String>,
}

impl Config {
    /// Merge CLI/env arguments over the config file over compiled defaults.
    pub fn resolve(args: Args) -> Result<Self> {
        let file = load_file_config(args.config.as_deref())?;

        Ok(Self {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            music_root: args
                .music_root
                .or(file.music_root)
                .unwrap_or_else(default_music_root),
            playlist_path: args
                .playlist
                .or(file.playlist)
                .unwrap_or_else(|| PathBuf::from("files.txt")),
            state_path: args
                .state_file
                .or(file.state_file)
                .unwrap_or_else(|| PathBuf::from("state.txt")),
            player: args
                .player
                .or(file.player)
                .unwrap_or_else(|| DEFAULT_PLAYER.to_string()),
            player_args: file
                .player_args
                .unwrap_or_else(|| vec!["-quiet".to_string()]),
            display_url: args.display_url.or(file.display_url),
        })
    }
}

fn default_music_root() -> PathBuf {
    dirs::audio_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shufd").join("config.toml"))
}

fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FileConfig::default()),
        },
    };

    debug!(path = %path.display(), "loading config file");
    let text = std::fs::read_to_string(&path).map_err(|e| {
        Error::Config(format!("cannot read config {}: {}", path.display(), e))
    })?;
    toml::from_str(&text)
        .map_err(|e| Error::Config(format!("cannot parse config {}: {}", path.display(), e)))
}
