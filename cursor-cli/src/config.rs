//! Configuration loading for mailcursor.
//!
//! Configuration is loaded from an optional TOML file (`--config`).

use mailcursor_client::LifecycleConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration for mailcursor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Session lifecycle configuration.
    #[serde(default)]
    pub lifecycle: LifecycleSection,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Session lifecycle configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleSection {
    /// Milliseconds a cursor survives without observers (default: 5000).
    #[serde(default = "default_teardown_grace_ms")]
    pub teardown_grace_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_teardown_grace_ms() -> u64 {
    5000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LifecycleSection {
    fn default() -> Self {
        Self {
            teardown_grace_ms: default_teardown_grace_ms(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// The lifecycle manager configuration this file describes.
    pub fn lifecycle_config(&self) -> LifecycleConfig {
        LifecycleConfig::default()
            .with_teardown_grace(Duration::from_millis(self.lifecycle.teardown_grace_ms))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}
