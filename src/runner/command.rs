//! Spec runner command construction
//!
//! The engine is invoked as `<binary> [-c] [-r <report>] [<file>]`. Each
//! flag and its value is a separate argv element.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use super::options::Options;

/// Flag asking the engine for colourised output
pub const COLORS_FLAG: &str = "-c";

/// Flag introducing the report path
pub const REPORT_FLAG: &str = "-r";

/// A ready-to-run spec runner invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Command {
    /// Build the invocation for `binary` from `options`
    ///
    /// `extra_file` is appended last when given; without it the command has
    /// no positional argument.
    pub fn build(binary: &Path, options: &Options, extra_file: Option<&Path>) -> Self {
        let mut args = Vec::new();

        if options.colors() {
            args.push(OsString::from(COLORS_FLAG));
        }

        if let Some(report) = options.report() {
            args.push(OsString::from(REPORT_FLAG));
            args.push(report.as_os_str().to_os_string());
        }

        if let Some(file) = extra_file {
            args.push(file.as_os_str().to_os_string());
        }

        Self {
            program: binary.to_path_buf(),
            args,
        }
    }

    /// An arbitrary invocation, for callers driving some other binary
    pub fn from_parts<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The binary, always the first token
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Everything after the binary
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// All tokens, binary first
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::options::PartialOptions;

    const RUNNER: &str = "ext/jasmine-webkit-specrunner/jasmine-webkit-specrunner";

    fn options(colors: bool, report: Option<&str>) -> Options {
        Options::from_partial(PartialOptions {
            colors: Some(colors),
            report: report.map(PathBuf::from),
            ..Default::default()
        })
    }

    #[test]
    fn test_right_options() {
        let options = options(true, Some("test"));

        let command = Command::build(Path::new(RUNNER), &options, None);
        let line = command.to_string();
        assert!(line.contains("jasmine-webkit-specrunner"));
        assert!(line.contains("-c"));
        assert!(line.contains("-r test"));

        let command = Command::build(Path::new(RUNNER), &options, Some(Path::new("file.js")));
        assert!(command.to_string().contains("file.js"));
    }

    #[test]
    fn test_token_order() {
        let command = Command::build(
            Path::new(RUNNER),
            &options(true, Some("test")),
            Some(Path::new("file.js")),
        );
        assert_eq!(command.argv(), vec![RUNNER, "-c", "-r", "test", "file.js"]);
    }

    #[test]
    fn test_bare_command() {
        let command = Command::build(Path::new(RUNNER), &options(false, None), None);
        assert_eq!(command.argv(), vec![RUNNER]);
        assert!(command.args().is_empty());
    }

    #[test]
    fn test_report_without_colors() {
        let command = Command::build(Path::new(RUNNER), &options(false, Some("out/report.txt")), None);
        assert_eq!(command.argv(), vec![RUNNER, "-r", "out/report.txt"]);
    }

    #[test]
    fn test_report_path_with_spaces_stays_one_token() {
        let command = Command::build(Path::new(RUNNER), &options(false, Some("my report.txt")), None);
        assert_eq!(command.args().len(), 2);
        assert_eq!(command.args()[1], OsString::from("my report.txt"));
    }
}
