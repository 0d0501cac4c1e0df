//! CLI command definitions
//!
//! Defines the clap commands for the jasmine-headless CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::runner::DEFAULT_JASMINE_CONFIG;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the specs (the default when no command is given)
    Run(RunArgs),

    /// Parse a report written by the spec runner and summarize it
    Report {
        /// Path to the report file
        path: PathBuf,

        /// Print the parsed report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved Jasmine config
    Config {
        /// Path to jasmine.yml
        #[arg(short = 'j', long, default_value = DEFAULT_JASMINE_CONFIG)]
        jasmine_config: String,
    },
}

/// Options for a spec run
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to jasmine.yml (default: spec/javascripts/support/jasmine.yml)
    #[arg(short = 'j', long)]
    pub jasmine_config: Option<String>,

    /// Colourise spec runner output
    #[arg(short = 'c', long, overrides_with = "no_colors")]
    pub colors: bool,

    /// Never colourise output, even if the settings file asks for it
    #[arg(long, overrides_with = "colors")]
    pub no_colors: bool,

    /// Have the spec runner write a report to this file
    #[arg(short = 'r', long)]
    pub report: Option<PathBuf>,

    /// Spec runner binary to use
    #[arg(long)]
    pub runner: Option<PathBuf>,

    /// Keep the generated runner page instead of deleting it
    #[arg(long)]
    pub keep: bool,

    /// Kill the spec runner after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Only run these spec files
    pub files: Vec<String>,
}
