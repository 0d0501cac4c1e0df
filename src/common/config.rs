//! Settings file handling
//!
//! User-level defaults for the CLI. Command-line flags always win over
//! these, and these win over the built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main settings structure
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    /// Spec runner settings
    #[serde(default)]
    pub runner: RunnerSettings,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,
}

/// Spec runner settings
#[derive(Debug, Deserialize, Default)]
pub struct RunnerSettings {
    /// Path to the spec runner binary
    pub path: Option<PathBuf>,

    /// Kill the spec runner after this many seconds
    pub timeout_secs: Option<u64>,
}

/// Output settings
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Ask the spec runner for colourised output
    #[serde(default)]
    pub colors: bool,
}

impl Settings {
    /// Load settings from the default settings file
    ///
    /// Returns default settings if the file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| super::Error::Settings(e.to_string()))
    }
}
