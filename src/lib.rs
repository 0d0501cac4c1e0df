//! jasmine-headless - a front end for headless Jasmine spec runners
//!
//! Resolves a Jasmine config, launches the spec runner binary and
//! interprets its exit code and report.

pub mod cli;
pub mod commands;
pub mod common;
pub mod runner;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use runner::{run, Options, PartialOptions, ReportDocument, ResolvedConfig, RunResult, Runner};
