//! Run options
//!
//! Callers describe a run with a [`PartialOptions`], leaving out anything
//! they don't care about, and turn it into a fully populated [`Options`]
//! with [`Options::from_partial`]. There is no process-wide default store.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default label for a run
pub const DEFAULT_TEST: &str = "test";

/// Where jasmine.yml lives in a conventional project layout
pub const DEFAULT_JASMINE_CONFIG: &str = "spec/javascripts/support/jasmine.yml";

/// Spec runner binary looked up on PATH when none is configured
pub const DEFAULT_RUNNER: &str = "jasmine-webkit-specrunner";

/// Caller-supplied options, every key optional
///
/// Keys this crate doesn't know about are kept in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialOptions {
    pub test: Option<String>,
    pub jasmine_config: Option<String>,
    pub colors: Option<bool>,
    pub report: Option<PathBuf>,
    pub runner: Option<PathBuf>,
    pub files: Option<Vec<String>>,
    pub keep_runner: Option<bool>,
    pub timeout_secs: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Fully resolved options for a single run
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    test: String,
    jasmine_config: String,
    colors: bool,
    report: Option<PathBuf>,
    runner: PathBuf,
    files: Vec<String>,
    keep_runner: bool,
    timeout_secs: Option<u64>,
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl Options {
    /// Fill every unset key of `partial` with its default
    ///
    /// Empty strings count as unset for `test` and `jasmine_config`, so
    /// `jasmine_config` is never empty afterwards.
    pub fn from_partial(partial: PartialOptions) -> Self {
        Self {
            test: non_empty_or(partial.test, DEFAULT_TEST),
            jasmine_config: non_empty_or(partial.jasmine_config, DEFAULT_JASMINE_CONFIG),
            colors: partial.colors.unwrap_or(false),
            report: partial.report.filter(|p| !p.as_os_str().is_empty()),
            runner: partial
                .runner
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RUNNER)),
            files: partial.files.unwrap_or_default(),
            keep_runner: partial.keep_runner.unwrap_or(false),
            timeout_secs: partial.timeout_secs.filter(|&secs| secs > 0),
            extra: partial.extra,
        }
    }

    pub fn test(&self) -> &str {
        &self.test
    }

    pub fn jasmine_config(&self) -> &str {
        &self.jasmine_config
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    /// Path the spec runner should write its report to, if any
    pub fn report(&self) -> Option<&Path> {
        self.report.as_deref()
    }

    pub fn runner(&self) -> &Path {
        &self.runner
    }

    /// Spec files for a targeted run; empty means "use the config"
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn keep_runner(&self) -> bool {
        self.keep_runner
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Unrecognized keys, carried through untouched
    pub fn extra(&self) -> &BTreeMap<String, serde_yaml::Value> {
        &self.extra
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::from_partial(PartialOptions::default())
    }
}

impl From<PartialOptions> for Options {
    fn from(partial: PartialOptions) -> Self {
        Self::from_partial(partial)
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
