//! Configuration loading for userlist.
//!
//! Configuration is loaded from a TOML file (default: `userlist.toml` in the
//! data directory). Every field has a default, so the file is optional.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use userlist_sync_client::{CacheKeys, HttpRemoteConfig, SyncConfig};
use userlist_sync_core::VerificationMode;

/// Name of the config file looked up in the data directory.
pub const CONFIG_FILE_NAME: &str = "userlist.toml";

/// Root configuration for userlist.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Remote API configuration.
    #[serde(default)]
    pub remote: HttpRemoteConfig,
    /// Local storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Read-back verification configuration.
    #[serde(default)]
    pub verification: VerificationConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file, relative to the data directory
    /// unless absolute (default: `userlist.db`).
    #[serde(default = "default_database_path")]
    pub database: PathBuf,
    /// Keys the snapshot is stored under.
    #[serde(flatten)]
    pub keys: CacheKeys,
}

/// Verification configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VerificationConfig {
    /// `partial` (default) or `full`.
    #[serde(default)]
    pub mode: VerificationMode,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset (default: `warn`).
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

// Default value functions

fn default_database_path() -> PathBuf {
    PathBuf::from("userlist.db")
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            keys: CacheKeys::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
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

    /// Load `path` if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Database location, resolved against `data_dir` when relative.
    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        if self.storage.database.is_absolute() {
            self.storage.database.clone()
        } else {
            data_dir.join(&self.storage.database)
        }
    }

    /// The controller settings carried by this file.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::default()
            .with_cache_keys(self.storage.keys.clone())
            .with_verification(self.verification.mode)
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
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
