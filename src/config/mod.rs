//! Configuration module for cqlnav
//!
//! Manages paging sizes, the optional segment override file and the default
//! log filter. Configuration is stored in the user's config directory and
//! can be overridden with `CQLNAV_*` environment variables.

use crate::segments::{SegmentError, SegmentRegistry};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CQLNAV";

/// Application settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Records fetched per request by paged resources
    #[serde(default = "default_per_request")]
    pub per_request: u32,

    /// Records fetched before a browse anchor
    #[serde(default = "default_preceding_records_count")]
    pub preceding_records_count: u32,

    /// Initial value of the result count resource
    #[serde(default = "default_initial_result_count")]
    pub initial_result_count: u32,

    /// TOML file with segment definitions layered over the built-in ones
    #[serde(default)]
    pub segments_file: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

const fn default_per_request() -> u32 {
    100
}

const fn default_preceding_records_count() -> u32 {
    5
}

const fn default_initial_result_count() -> u32 {
    100
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            per_request: default_per_request(),
            preceding_records_count: default_preceding_records_count(),
            initial_result_count: default_initial_result_count(),
            segments_file: None,
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("cqlnav").join("config.toml"))
    }

    /// Load settings from the default config file and the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load settings from `path` (optional) and the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed, or an
    /// environment override has the wrong type.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        settings.try_deserialize()
    }

    /// Save settings to the default config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save settings as TOML to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the settings
    /// cannot be serialized, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Segment registry: built-in, or layered with `segments_file`
    ///
    /// # Errors
    ///
    /// Returns `SegmentError` if the segments file cannot be loaded.
    pub fn segment_registry(&self) -> Result<SegmentRegistry, SegmentError> {
        match &self.segments_file {
            Some(path) => SegmentRegistry::from_file(path),
            None => Ok(SegmentRegistry::builtin()),
        }
    }
}
