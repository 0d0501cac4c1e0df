//! Spec run orchestration
//!
//! Loads the Jasmine config, writes a runner page, hands it to the spec
//! runner binary and returns the binary's exit code untouched. Reading
//! the report is left to the caller.

mod command;
mod config;
mod options;
mod page;
mod process;
pub mod report;

use std::path::Path;
use std::sync::OnceLock;

pub use command::{Command, COLORS_FLAG, REPORT_FLAG};
pub use config::{ResolvedConfig, DEFAULT_SPEC_DIR};
pub use options::{Options, PartialOptions, DEFAULT_JASMINE_CONFIG, DEFAULT_RUNNER, DEFAULT_TEST};
pub use page::{collect_files, RunnerFiles, RunnerPage};
pub use process::{OutputMode, ProcessRunner};
pub use report::{FailedSpec, ReportDocument, ScriptError};

use crate::common::{Error, Result};

/// Exit code and raw report of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub exit_code: i32,
    /// Report text, when a report path was configured and the engine wrote it
    pub report: Option<String>,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// One configured spec run
///
/// The Jasmine config is read on first use and kept for the lifetime of
/// the runner.
#[derive(Debug)]
pub struct Runner {
    options: Options,
    config: OnceLock<ResolvedConfig>,
}

impl Runner {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            config: OnceLock::new(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The resolved Jasmine config, loaded once per runner
    pub fn jasmine_config(&self) -> Result<&ResolvedConfig> {
        if let Some(config) = self.config.get() {
            return Ok(config);
        }
        let config = ResolvedConfig::load(Path::new(self.options.jasmine_config()))?;
        Ok(self.config.get_or_init(|| config))
    }

    /// Spec runner invocation, optionally targeting `file`
    pub fn jasmine_command(&self, file: Option<&Path>) -> Command {
        Command::build(self.options.runner(), &self.options, file)
    }

    /// Run the specs and return the spec runner's exit code
    ///
    /// 0 means every spec passed. Anything else is passed through exactly as
    /// the spec runner reported it.
    pub async fn run(&self) -> Result<i32> {
        let config = self.jasmine_config()?;
        let files = page::collect_files(config, &self.options)?;
        let page = page::write(&files, self.options.keep_runner())?;
        let command = self.jasmine_command(Some(page.path()));
        self.clear_report()?;

        tracing::info!(
            test = %self.options.test(),
            config = %config.path().display(),
            "Running specs"
        );
        let code = ProcessRunner::new()
            .with_timeout(self.options.timeout())
            .execute(&command)
            .await?;
        tracing::info!(code, "Spec run finished");

        Ok(code)
    }

    /// Like [`Runner::run`], also returning the report text if there is one
    pub async fn run_with_report(&self) -> Result<RunResult> {
        let exit_code = self.run().await?;

        let report = match self.options.report() {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(content) => Some(content),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => {
                    return Err(Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    })
                }
            },
            None => None,
        };

        Ok(RunResult { exit_code, report })
    }

    /// Remove a report left behind by an earlier run
    fn clear_report(&self) -> Result<()> {
        let Some(path) = self.options.report() else {
            return Ok(());
        };
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed stale report");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::FileRead {
                path: path.display().to_string(),
                error: e.to_string(),
            }),
        }
    }

    /// Parse the configured report; `None` when no report was requested
    pub fn report(&self) -> Result<Option<ReportDocument>> {
        self.options.report().map(report::parse).transpose()
    }
}

/// Run the specs described by `options`
pub async fn run(options: Options) -> Result<i32> {
    Runner::new(options).run().await
}
