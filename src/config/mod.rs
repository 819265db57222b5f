//! Configuration management for archivist
//!
//! Handles loading and validating configuration from TOML files. Every value
//! has a compiled default, so the tool runs without any config file at all;
//! the defaults for the database and recycle directory names are the on-disk
//! compatibility contract with the other library tools.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Playback-endpoint probing configuration
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Library layout configuration
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Playback-endpoint probing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Seconds to wait after a 503 before probing again
    #[serde(default = "default_probe_backoff_secs")]
    pub backoff_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent string
    #[serde(default = "default_probe_user_agent")]
    pub user_agent: String,
}

/// Library layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Catalog database file name, resolved inside the library root
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Recycle directory name, resolved inside the library root
    #[serde(default = "default_recycle_dir")]
    pub recycle_dir: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            backoff_secs: default_probe_backoff_secs(),
            timeout_secs: default_probe_timeout_secs(),
            user_agent: default_probe_user_agent(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            database_name: default_database_name(),
            recycle_dir: default_recycle_dir(),
        }
    }
}

impl Config {
    /// Get the default config file path (~/.archivist/config.toml)
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".archivist")
            .join("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or the default location if one exists,
    /// or compiled defaults
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load(path);
        }

        let default_path = Self::default_config_path();
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.probe.timeout_secs == 0 {
            return Err(Error::Config(
                "probe.timeout_secs must be positive".to_string(),
            ));
        }

        if self.library.database_name.is_empty() {
            return Err(Error::Config(
                "library.database_name must not be empty".to_string(),
            ));
        }

        let recycle = self.library.recycle_dir.as_str();
        if recycle.is_empty()
            || recycle == "."
            || recycle == ".."
            || recycle.contains('/')
            || recycle.contains('\\')
        {
            return Err(Error::Config(
                "library.recycle_dir must be a single directory name".to_string(),
            ));
        }

        Ok(())
    }
}
