//! Spec runner process execution
//!
//! Launches the engine, waits for it and hands back its exit code exactly as
//! the engine produced it. Failing to start the engine is an error of its
//! own, never folded into a nonzero exit code.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command as TokioCommand;

use super::command::Command;
use crate::common::{Error, Result};

/// What the child does with stdout/stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Share the caller's terminal
    #[default]
    Inherit,
    /// Discard everything
    Null,
}

/// Runs spec runner commands
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    output: OutputMode,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child and fail with [`Error::RunTimeout`] after `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Run `command` to completion and return its exit code
    pub async fn execute(&self, command: &Command) -> Result<i32> {
        let program = locate(command.program())?;
        tracing::debug!(program = %program.display(), argv = %command, "Launching spec runner");

        let mut child = TokioCommand::new(&program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(self.stdio())
            .stderr(self.stdio())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::binary_launch(&program, e))?;

        let status = match self.timeout {
            Some(limit) => {
                let waited = tokio::time::timeout(limit, child.wait()).await;
                match waited {
                    Ok(status) => status?,
                    Err(_) => {
                        tracing::warn!(?limit, "Spec runner timed out, killing it");
                        if let Err(e) = child.kill().await {
                            tracing::warn!("Failed to kill spec runner: {}", e);
                        }
                        return Err(Error::RunTimeout(limit));
                    }
                }
            }
            None => child.wait().await?,
        };

        let code = exit_code(status);
        tracing::debug!(code, "Spec runner exited");
        Ok(code)
    }

    fn stdio(&self) -> Stdio {
        match self.output {
            OutputMode::Inherit => Stdio::inherit(),
            OutputMode::Null => Stdio::null(),
        }
    }
}

/// Find the binary: bare names are looked up on PATH, anything with a
/// directory component is used as given
fn locate(program: &Path) -> Result<PathBuf> {
    if program.is_absolute() || program.components().count() > 1 {
        return Ok(program.to_path_buf());
    }
    which::which(program).map_err(|e| Error::binary_launch(program, e))
}

/// Exit code of a finished child
///
/// A child killed by a signal has no code; report it the way a shell would.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_is_passed_through() {
        let runner = ProcessRunner::new().with_output(OutputMode::Null);

        let ok = Command::from_parts("sh", ["-c", "exit 0"]);
        assert_eq!(runner.execute(&ok).await.unwrap(), 0);

        let failed = Command::from_parts("sh", ["-c", "exit 3"]);
        assert_eq!(runner.execute(&failed).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let runner = ProcessRunner::new();
        let command = Command::from_parts("/definitely/not/here/specrunner", Vec::<String>::new());

        let err = runner.execute(&command).await.unwrap_err();
        assert!(matches!(err, Error::BinaryLaunch { .. }));
        assert!(err.to_string().contains("/definitely/not/here/specrunner"));
    }

    #[tokio::test]
    async fn test_unknown_bare_name_is_launch_error() {
        let command = Command::from_parts("no-such-specrunner-on-path", Vec::<String>::new());
        let err = ProcessRunner::new().execute(&command).await.unwrap_err();
        assert!(matches!(err, Error::BinaryLaunch { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_child() {
        let runner = ProcessRunner::new()
            .with_output(OutputMode::Null)
            .with_timeout(Some(Duration::from_millis(200)));
        let command = Command::from_parts("sh", ["-c", "sleep 5"]);

        let err = runner.execute(&command).await.unwrap_err();
        assert!(matches!(err, Error::RunTimeout(limit) if limit == Duration::from_millis(200)));
        assert!(err.to_string().contains("200ms"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_maps_to_shell_code() {
        let runner = ProcessRunner::new().with_output(OutputMode::Null);
        let command = Command::from_parts("sh", ["-c", "kill -9 $$"]);
        assert_eq!(runner.execute(&command).await.unwrap(), 137);
    }
}
