//! Configuration management for SQLean.
//!
//! Handles loading configuration from a TOML file. Every setting has a
//! default, so the file is optional.

use crate::error::{Result, SqleanError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for SQLean.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where course content, datasets and progress live.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Terminal output settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// File system locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding `manifest.yml` and module files.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Directory holding one sub-directory per dataset.
    #[serde(default = "default_datasets_dir")]
    pub datasets_dir: PathBuf,

    /// Progress file.
    #[serde(default = "default_progress_file")]
    pub progress_file: PathBuf,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_datasets_dir() -> PathBuf {
    PathBuf::from("datasets")
}

fn default_progress_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("user"))
        .join("sqlean")
        .join("progress.json")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            datasets_dir: default_datasets_dir(),
            progress_file: default_progress_file(),
        }
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Use colors and styles.
    #[serde(default = "default_color")]
    pub color: bool,

    /// Rows shown when printing a result table.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_color() -> bool {
    true
}

fn default_max_rows() -> usize {
    50
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            max_rows: default_max_rows(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sqlean")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SqleanError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            SqleanError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
