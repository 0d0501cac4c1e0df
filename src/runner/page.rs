//! Runner page generation
//!
//! The spec runner loads a single HTML page. We build it from the config's
//! file lists: sources first, then helpers, then specs, each list expanded
//! as globs relative to its base directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::config::ResolvedConfig;
use super::options::Options;
use crate::common::{Error, Result};

/// Files the runner page pulls in, in load order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerFiles {
    pub stylesheets: Vec<PathBuf>,
    pub scripts: Vec<PathBuf>,
}

/// Expand the config's globs into the list of files to load
///
/// A non-empty `options.files()` replaces the config's `spec_files`.
pub fn collect_files(config: &ResolvedConfig, options: &Options) -> Result<RunnerFiles> {
    let src_dir = config.src_dir();
    let spec_dir = config.spec_dir();
    let mut files = RunnerFiles::default();

    expand(config, &src_dir, &config.get_list("src_files"), &mut files.scripts)?;
    expand(config, &spec_dir, &config.get_list("helpers"), &mut files.scripts)?;

    if options.files().is_empty() {
        expand(config, &spec_dir, &config.get_list("spec_files"), &mut files.scripts)?;
    } else {
        for file in options.files() {
            let path = PathBuf::from(file);
            push_unique(&mut files.scripts, path.canonicalize().unwrap_or(path));
        }
    }

    expand(config, &src_dir, &config.get_list("stylesheets"), &mut files.stylesheets)?;

    tracing::debug!(
        scripts = files.scripts.len(),
        stylesheets = files.stylesheets.len(),
        "Collected runner files"
    );
    Ok(files)
}

fn expand(
    config: &ResolvedConfig,
    base: &Path,
    patterns: &[String],
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    let base = base.to_str().ok_or_else(|| {
        Error::config_parse(config.path(), format!("'{}' is not valid UTF-8", base.display()))
    })?;
    let base = glob::Pattern::escape(base);

    for pattern in patterns {
        let full = if base.is_empty() || Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            format!("{}/{}", base.trim_end_matches(|c| c == '/' || c == '\\'), pattern)
        };

        let entries = glob::glob(&full).map_err(|e| {
            Error::config_parse(config.path(), format!("bad pattern '{}': {}", pattern, e))
        })?;

        let mut matched = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::Io(e.into_error()))?;
            if path.is_file() {
                matched.push(path.canonicalize().unwrap_or(path));
            }
        }
        matched.sort();

        if matched.is_empty() {
            tracing::debug!(pattern = %full, "Pattern matched no files");
        }
        for path in matched {
            push_unique(out, path);
        }
    }

    Ok(())
}

fn push_unique(list: &mut Vec<PathBuf>, path: PathBuf) {
    if !list.contains(&path) {
        list.push(path);
    }
}

/// A runner page on disk
///
/// Removed when dropped unless it was written with `keep`.
#[derive(Debug)]
pub struct RunnerPage {
    path: PathBuf,
    _temp: Option<tempfile::TempPath>,
}

impl RunnerPage {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render `files` to a `specrunner.*.html` file in the temp directory
pub fn write(files: &RunnerFiles, keep: bool) -> Result<RunnerPage> {
    let mut file = tempfile::Builder::new()
        .prefix("specrunner.")
        .suffix(".html")
        .tempfile()?;
    file.write_all(render(files).as_bytes())?;
    file.flush()?;

    let temp = file.into_temp_path();
    if keep {
        let path = temp.keep().map_err(|e| e.error)?;
        tracing::info!(path = %path.display(), "Keeping runner page");
        Ok(RunnerPage { path, _temp: None })
    } else {
        Ok(RunnerPage {
            path: temp.to_path_buf(),
            _temp: Some(temp),
        })
    }
}

/// HTML for a runner page
pub fn render(files: &RunnerFiles) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\" />\n  <title>Jasmine Test Runner - Generated by jasmine-headless</title>\n",
    );

    for sheet in &files.stylesheets {
        html.push_str(&format!(
            "  <link rel=\"stylesheet\" href=\"{}\" type=\"text/css\" />\n",
            escape_attr(&sheet.to_string_lossy())
        ));
    }
    for script in &files.scripts {
        html.push_str(&format!(
            "  <script type=\"text/javascript\" src=\"{}\"></script>\n",
            escape_attr(&script.to_string_lossy())
        ));
    }

    html.push_str("</head>\n<body></body>\n</html>\n");
    html
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
