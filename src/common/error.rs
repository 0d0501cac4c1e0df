//! Error types for the spec runner front end
//!
//! Every variant that concerns a missing or unreadable resource carries the
//! offending path so the CLI can name it in its message.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for jasmine-headless
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Jasmine config '{}' not found. Pass --jasmine-config to point at your jasmine.yml", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid Jasmine config '{}': {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid settings file: {0}")]
    Settings(String),

    // === Engine Errors ===
    #[error("Failed to launch spec runner '{}': {error}", .path.display())]
    BinaryLaunch { path: PathBuf, error: String },

    #[error("Spec runner timed out after {0:?} and was killed")]
    RunTimeout(Duration),

    // === Report Errors ===
    #[error("Report '{}' not found. Did the spec runner get a -r option?", .path.display())]
    ReportNotFound { path: PathBuf },

    #[error("Invalid report '{}': {message}", .path.display())]
    ReportParse { path: PathBuf, message: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a config parse error
    pub fn config_parse(path: &Path, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a report parse error
    pub fn report_parse(path: &Path, message: impl Into<String>) -> Self {
        Self::ReportParse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a launch error from the underlying IO failure
    pub fn binary_launch(path: &Path, error: impl ToString) -> Self {
        Self::BinaryLaunch {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    }
}
