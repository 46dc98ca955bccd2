//! # Configuration Persistence
//!
//! Manages user configuration stored in `~/.config/hearing-ui/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is serialized to / deserialized from a JSON file in
//! the user's config directory. Every field has a default, so an empty file
//! (or no file at all) is a valid configuration. Command-line flags override
//! whatever the file says.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/hearing-ui/config.json
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! and data directories.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APPLICATION: &str = "hearing-ui";

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How long the main loop waits for a key before pumping the UI queue.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Log file; defaults to a dated file under the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Entries offered in the Session screen's device picker.
    #[serde(default = "default_audio_devices")]
    pub audio_devices: Vec<String>,

    /// Entries offered in the Test Setup screen's transducer picker.
    #[serde(default = "default_transducers")]
    pub transducers: Vec<String>,

    /// Trials between continue-testing prompts in the walkthrough.
    #[serde(default = "default_trials_per_block")]
    pub trials_per_block: u32,
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_audio_devices() -> Vec<String> {
    vec!["Default output".to_string()]
}

fn default_transducers() -> Vec<String> {
    vec![
        "headphone".to_string(),
        "2 speakers".to_string(),
        "1 speaker".to_string(),
    ]
}

fn default_trials_per_block() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            log_filter: default_log_filter(),
            log_file: None,
            audio_devices: default_audio_devices(),
            transducers: default_transducers(),
            trials_per_block: default_trials_per_block(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    /// The configured log file, or `<data dir>/logs/hearing-ui-<date>.log`.
    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        let dirs = project_dirs()?;
        Ok(dirs.data_dir().join("logs").join(dated_log_name(chrono::Local::now().date_naive())))
    }

    /// Return the path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.json"))
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APPLICATION)
        .context("Could not determine config directory")
}

fn dated_log_name(date: chrono::NaiveDate) -> String {
    format!("{APPLICATION}-{}.log", date.format("%Y%m%d"))
}
