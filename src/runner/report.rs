//! Report artifact interpretation
//!
//! The spec runner writes one record per line, fields separated by `||`:
//!
//! ```text
//! PASS||suite||spec||file.js:3
//! FAIL||failure||should fail with error code of 1||failure_spec.js:3
//! PENDING||suite||spec
//! ERROR||ReferenceError: foo is not defined||broken.js:1
//! CONSOLE||anything logged
//! TOTAL||2||1||0.021||F
//! ```
//!
//! The last field of `TOTAL` is the pending flag (`T`/`F`). A JSON encoding
//! of [`ReportDocument`] is accepted as well.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::common::{Error, Result};

const FIELD_SEPARATOR: &str = "||";

/// Parsed outcome of a spec run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Number of specs executed
    pub total: u32,
    /// Number of failing specs
    pub failures: u32,
    /// Whether any spec was left pending
    #[serde(default)]
    pub pending: bool,
    /// Failing specs in report order
    #[serde(default)]
    pub failed_specs: Vec<FailedSpec>,
    /// Script errors raised outside any assertion
    #[serde(default)]
    pub errors: Vec<ScriptError>,
    /// Wall time reported by the engine
    #[serde(default)]
    pub time_secs: Option<f64>,
}

/// One failing spec, identified by its suite/spec labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FailedSpecRepr")]
pub struct FailedSpec {
    /// Outermost suite first, spec description last
    pub labels: Vec<String>,
    /// `file:line` of the failure, when the engine knows it
    pub location: Option<String>,
}

/// Failing specs may be written as a bare label list or a full object
#[derive(Deserialize)]
#[serde(untagged)]
enum FailedSpecRepr {
    Labels(Vec<String>),
    Full {
        labels: Vec<String>,
        #[serde(default)]
        location: Option<String>,
    },
}

impl From<FailedSpecRepr> for FailedSpec {
    fn from(repr: FailedSpecRepr) -> Self {
        match repr {
            FailedSpecRepr::Labels(labels) => Self {
                labels,
                location: None,
            },
            FailedSpecRepr::Full { labels, location } => Self { labels, location },
        }
    }
}

/// A script error the engine caught while loading or running code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptError {
    pub message: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl ReportDocument {
    /// No failing specs and no script errors
    pub fn passed(&self) -> bool {
        self.failures == 0 && self.errors.is_empty()
    }

    /// Whether a failing spec with exactly these labels was reported
    pub fn has_failing_spec<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        self.failed_specs.iter().any(|spec| {
            spec.labels.len() == labels.len()
                && spec
                    .labels
                    .iter()
                    .zip(labels)
                    .all(|(have, want)| have == want.as_ref())
        })
    }
}

/// Parse the report at `path`
///
/// Fails with [`Error::ReportNotFound`] when the engine didn't write one.
pub fn parse(path: &Path) -> Result<ReportDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::ReportNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        },
    })?;

    parse_str(path, &content)
}

/// Parse report text; `path` is only used in error messages
pub fn parse_str(path: &Path, content: &str) -> Result<ReportDocument> {
    if content.trim_start().starts_with('{') {
        return serde_json::from_str(content).map_err(|e| Error::report_parse(path, e.to_string()));
    }
    parse_lines(path, content)
}

#[derive(Debug)]
struct Totals {
    total: u32,
    failures: u32,
    time_secs: Option<f64>,
    pending: bool,
}

fn parse_lines(path: &Path, content: &str) -> Result<ReportDocument> {
    let mut report = ReportDocument::default();
    let mut passed = 0u32;
    let mut pending = 0u32;
    let mut totals = None;

    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(FIELD_SEPARATOR);
        let tag = fields.next().unwrap_or_default();
        let fields: Vec<&str> = fields.collect();

        match tag {
            "PASS" => passed += 1,
            "FAIL" => {
                let (labels, location) = split_location(&fields);
                report.failed_specs.push(FailedSpec { labels, location });
            }
            "PENDING" => pending += 1,
            "ERROR" => report.errors.push(ScriptError {
                message: fields.first().copied().unwrap_or_default().to_string(),
                location: fields.get(1).map(|s| s.to_string()),
            }),
            "TOTAL" => {
                totals = Some(parse_totals(&fields).map_err(|message| {
                    Error::report_parse(path, format!("line {}: {}", index + 1, message))
                })?);
            }
            other => tracing::trace!(tag = other, "Skipping report record"),
        }
    }

    match totals {
        Some(totals) => {
            report.total = totals.total;
            report.failures = totals.failures;
            report.time_secs = totals.time_secs;
            report.pending = totals.pending;
        }
        None => {
            let failures = report.failed_specs.len() as u32;
            report.total = passed + failures;
            report.failures = failures;
            report.pending = pending > 0;
        }
    }

    Ok(report)
}

fn parse_totals(fields: &[&str]) -> std::result::Result<Totals, String> {
    let count = |index: usize, name: &str| -> std::result::Result<u32, String> {
        let raw = fields
            .get(index)
            .ok_or_else(|| format!("TOTAL record is missing the {name} count"))?;
        raw.trim()
            .parse()
            .map_err(|_| format!("invalid {name} count '{raw}'"))
    };

    let time_secs: Option<f64> = match fields.get(2).map(|s| s.trim()) {
        Some("") | None => None,
        Some(raw) => Some(
            raw.parse()
                .map_err(|_| format!("invalid elapsed time '{raw}'"))?,
        ),
    };

    Ok(Totals {
        total: count(0, "total")?,
        failures: count(1, "failure")?,
        time_secs,
        pending: matches!(fields.get(3).map(|s| s.trim()), Some("T") | Some("true")),
    })
}

/// Split trailing `file:line` off a FAIL record's label fields
fn split_location(fields: &[&str]) -> (Vec<String>, Option<String>) {
    match fields.split_last() {
        Some((last, rest)) if !rest.is_empty() && is_location(last) => (
            rest.iter().map(|s| s.to_string()).collect(),
            Some(last.to_string()),
        ),
        _ => (fields.iter().map(|s| s.to_string()).collect(), None),
    }
}

/// `<file>.<ext>:<line>`, where the extension starts with a letter
fn is_location(field: &str) -> bool {
    let Some((file, line)) = field.rsplit_once(':') else {
        return false;
    };
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let name = file.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file);
    match name.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && ext.starts_with(|c: char| c.is_ascii_alphabetic())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse_text(content: &str) -> ReportDocument {
        parse_str(Path::new("report.txt"), content).unwrap()
    }

    #[test]
    fn test_passing_report() {
        let report = parse_text("PASS||success||should be successful||success_spec.js:2\nTOTAL||1||0||0.01||F\n");
        assert_eq!(report.total, 1);
        assert_eq!(report.failures, 0);
        assert!(!report.pending);
        assert!(report.failed_specs.is_empty());
        assert_eq!(report.time_secs, Some(0.01));
        assert!(report.passed());
    }

    #[test]
    fn test_failing_report() {
        let report = parse_text(
            "FAIL||failure||should fail with error code of 1||failure_spec.js:3\nTOTAL||1||1||0.02||F\n",
        );
        assert_eq!(report.total, 1);
        assert_eq!(report.failures, 1);
        assert!(!report.pending);
        assert!(report.has_failing_spec(&["failure", "should fail with error code of 1"]));
        assert_eq!(report.failed_specs[0].location.as_deref(), Some("failure_spec.js:3"));
        assert!(!report.passed());
    }

    #[test]
    fn test_nested_labels_without_location() {
        let report = parse_text("FAIL||outer||inner||does a thing\nTOTAL||3||1||0.1||F\n");
        assert!(report.has_failing_spec(&["outer", "inner", "does a thing"]));
        assert!(!report.has_failing_spec(&["outer", "inner"]));
    }

    #[test]
    fn test_missing_pending_flag_is_false() {
        let report = parse_text("TOTAL||4||0||0.5\n");
        assert_eq!(report.total, 4);
        assert!(!report.pending);
    }

    #[test]
    fn test_pending_flag() {
        let report = parse_text("PENDING||suite||later\nTOTAL||2||0||0.1||T\n");
        assert!(report.pending);
    }

    #[test]
    fn test_counts_without_total_record() {
        let report = parse_text("PASS||a||b||a.js:1\nFAIL||a||c||a.js:4\nPENDING||a||d\nCONSOLE||hello\n");
        assert_eq!(report.total, 2);
        assert_eq!(report.failures, 1);
        assert!(report.pending);
    }

    #[test]
    fn test_script_errors() {
        let report = parse_text("ERROR||ReferenceError: foo is not defined||broken.js:1\nTOTAL||1||0||0.1||F\n");
        assert_eq!(report.failures, 0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].location.as_deref(), Some("broken.js:1"));
        assert!(!report.passed());
    }

    #[test]
    fn test_invalid_total_is_rejected() {
        let err = parse_str(Path::new("report.txt"), "TOTAL||one||0||0.1||F\n").unwrap_err();
        assert!(matches!(err, Error::ReportParse { .. }));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_json_report() {
        let report = parse_text(
            r#"{"total": 1, "failures": 1, "failed_specs": [["failure", "should fail with error code of 1"]]}"#,
        );
        assert_eq!(report.total, 1);
        assert_eq!(report.failures, 1);
        assert!(!report.pending);
        assert!(report.has_failing_spec(&["failure", "should fail with error code of 1"]));
    }

    #[test]
    fn test_json_report_with_locations() {
        let report = parse_text(
            r#"{"total": 2, "failures": 1, "pending": true,
                "failed_specs": [{"labels": ["a", "b"], "location": "a.js:9"}]}"#,
        );
        assert!(report.pending);
        assert_eq!(report.failed_specs[0].location.as_deref(), Some("a.js:9"));
    }

    #[test]
    fn test_missing_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let err = parse(&path).unwrap_err();
        assert!(matches!(err, Error::ReportNotFound { .. }));
        assert!(err.to_string().contains("report.txt"));
    }

    #[test]
    fn test_location_detection() {
        assert!(is_location("spec/a_spec.js:12"));
        assert!(is_location("C:\\spec\\a.js:3"));
        assert!(!is_location("should fail"));
        assert!(!is_location("ratio 1:2 things"));
        assert!(!is_location(":3"));
        assert!(!is_location("handles ratio 1:2"));
        assert!(!is_location("version 1.2:3"));
        assert!(!is_location("spec/.js:3"));
    }

    #[test]
    fn test_label_with_ratio_is_not_a_location() {
        let report = parse_text("FAIL||timing||handles ratio 1:2\nTOTAL||1||1||0.1||F\n");
        assert_eq!(report.failed_specs[0].labels, vec!["timing", "handles ratio 1:2"]);
        assert_eq!(report.failed_specs[0].location, None);
        assert!(report.has_failing_spec(&["timing", "handles ratio 1:2"]));
    }
}
