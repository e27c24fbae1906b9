//! Configuration management for healthtrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults. With no
//! file and no environment variables the defaults reproduce the stock
//! behavior: one `health_data.db` file in the local data directory.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::{DEFAULT_JOURNAL_MODE, JOURNAL_MODES};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "healthtrack";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "health_data.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "HEALTHTRACK_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `HEALTHTRACK_`, sections separated
///    by `__`, e.g. `HEALTHTRACK_STORAGE__DATABASE_PATH`)
/// 2. TOML config file at `~/.config/healthtrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/healthtrack/health_data.db`
    pub database_path: Option<PathBuf>,
    /// `SQLite` journal mode applied when the database is opened.
    pub journal_mode: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            journal_mode: DEFAULT_JOURNAL_MODE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// A config file that does not exist is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "database_path cannot be empty".to_string(),
                });
            }
        }

        let mode = self.storage.journal_mode.to_ascii_uppercase();
        if !JOURNAL_MODES.contains(&mode.as_str()) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "unknown journal_mode '{}' (expected one of {})",
                    self.storage.journal_mode,
                    JOURNAL_MODES.join(", ")
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Override the database path, e.g. from a command-line flag.
    #[must_use]
    pub fn with_database_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.storage.database_path = path;
        }
        self
    }
}
