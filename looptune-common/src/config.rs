//! Configuration loading and config-file resolution
//!
//! Looptune reads a single TOML file. Every field has a built-in default, so
//! a missing file simply yields [`Config::default`].
//!
//! # Config File Priority
//!
//! 1. Command-line argument (`--config`)
//! 2. Environment variable (`LOOPTUNE_CONFIG`)
//! 3. Platform config dir (`<config_dir>/looptune/config.toml`)
//! 4. Built-in defaults (no file)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "LOOPTUNE_CONFIG";

/// Complete player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for audio files
    pub music_dir: PathBuf,

    /// Directory holding saved `playlist{N}.json` files
    pub playlist_dir: PathBuf,

    /// Number of playlist slots available at once
    pub playlist_slots: usize,

    /// Playback tuning
    pub playback: PlaybackConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Playback tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seek distance for the seek-back / seek-forward keys
    pub seek_step_secs: u32,

    /// Idle time between key polls while paused
    pub pause_idle_ms: u64,

    /// Wait between consecutive tracks of a mode
    pub track_gap_ms: u64,

    /// Decode buffer size in PCM frames
    pub buffer_frames: usize,

    /// Scan compressed sources whose container does not declare a length
    pub scan_unknown_duration: bool,

    /// Output device name (None = system default)
    pub device: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from("music"),
            playlist_dir: PathBuf::from("."),
            playlist_slots: 3,
            playback: PlaybackConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            seek_step_secs: 10,
            pause_idle_ms: 100,
            track_gap_ms: 2000,
            buffer_frames: 4096,
            scan_unknown_duration: true,
            device: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve and load configuration following the documented priority
    ///
    /// An explicitly named file (CLI or environment) must exist; the platform
    /// default location is optional.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_path {
            return Self::load_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_file(Path::new(&path));
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            _ => {
                debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reject values the player cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.playlist_slots == 0 {
            return Err(Error::Config("playlist_slots must be at least 1".to_string()));
        }
        if self.playback.buffer_frames == 0 {
            return Err(Error::Config("playback.buffer_frames must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Path of the saved playlist file for a 1-based slot number
    pub fn playlist_file(&self, slot_number: usize) -> PathBuf {
        self.playlist_dir.join(playlist_file_name(slot_number))
    }
}

/// Saved playlist file name for a 1-based slot number
pub fn playlist_file_name(slot_number: usize) -> String {
    format!("playlist{}.json", slot_number)
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("looptune").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.playlist_slots, 3);
        assert_eq!(config.playback.seek_step_secs, 10);
        assert_eq!(config.playback.pause_idle_ms, 100);
        assert_eq!(config.playback.track_gap_ms, 2000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            music_dir = "/srv/music"

            [playback]
            track_gap_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.music_dir, PathBuf::from("/srv/music"));
        assert_eq!(config.playback.track_gap_ms, 0);
        assert_eq!(config.playback.seek_step_secs, 10);
        assert_eq!(config.playlist_slots, 3);
    }

    #[test]
    fn test_zero_slots_rejected() {
        assert!(Config::from_toml_str("playlist_slots = 0").is_err());
    }

    #[test]
    fn test_playlist_file_naming() {
        let config = Config {
            playlist_dir: PathBuf::from("/tmp/lists"),
            ..Config::default()
        };
        assert_eq!(config.playlist_file(2), PathBuf::from("/tmp/lists/playlist2.json"));
    }
}
