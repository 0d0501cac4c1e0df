//! Jasmine config loading
//!
//! Reads a `jasmine.yml`, lays it over the built-in defaults and remembers
//! where it came from so relative paths can be resolved against the
//! config file's own directory.

use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::ops::Index;
use std::path::{Path, PathBuf};

use crate::common::paths::{parent_dir, resolve_against};
use crate::common::{Error, Result};

/// Spec directory used when the config doesn't name one
pub const DEFAULT_SPEC_DIR: &str = "spec/javascripts";

static NULL: Value = Value::Null;

/// A parsed jasmine.yml merged over the defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    path: PathBuf,
    dir: PathBuf,
    values: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    /// Load and resolve the config at `path`
    ///
    /// Fails with [`Error::ConfigNotFound`] when the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::FileRead {
                path: path.display().to_string(),
                error: e.to_string(),
            },
        })?;

        let config = Self::from_yaml(path, &content)?;
        tracing::debug!(path = %path.display(), keys = config.values.len(), "Loaded jasmine config");
        Ok(config)
    }

    /// Resolve config text as if it had been read from `path`
    pub fn from_yaml(path: &Path, content: &str) -> Result<Self> {
        let document: Value = if content.trim().is_empty() {
            Value::Mapping(Mapping::new())
        } else {
            serde_yaml::from_str(content).map_err(|e| Error::config_parse(path, e.to_string()))?
        };

        let mapping = match document {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => return Err(Error::config_parse(path, "expected a mapping at the top level")),
        };

        let mut values = defaults();
        for (key, value) in mapping {
            let key = key_to_string(&key)
                .ok_or_else(|| Error::config_parse(path, "keys must be strings, numbers or booleans"))?;
            if key == "spec_dir" && value.is_null() {
                continue;
            }
            values.insert(key, value);
        }

        Ok(Self {
            path: path.to_path_buf(),
            dir: parent_dir(path),
            values,
        })
    }

    /// Path the config was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative paths in the config are resolved against
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// A key holding either one string or a list of strings
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Sequence(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// A string value as a path, joined onto the config directory when relative
    pub fn resolve(&self, key: &str) -> Option<PathBuf> {
        self.get_str(key)
            .map(|value| resolve_against(&self.dir, Path::new(value)))
    }

    /// Resolved spec directory
    pub fn spec_dir(&self) -> PathBuf {
        self.resolve("spec_dir")
            .unwrap_or_else(|| self.dir.join(DEFAULT_SPEC_DIR))
    }

    /// Resolved source directory; the config directory when unset
    pub fn src_dir(&self) -> PathBuf {
        self.resolve("src_dir").unwrap_or_else(|| self.dir.clone())
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl Index<&str> for ResolvedConfig {
    type Output = Value;

    /// Missing keys index to `Null`, like `serde_yaml::Value`
    fn index(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&NULL)
    }
}

/// Values every config starts from
fn defaults() -> BTreeMap<String, Value> {
    let list = |items: &[&str]| {
        Value::Sequence(items.iter().map(|s| Value::String((*s).to_string())).collect())
    };

    BTreeMap::from([
        ("spec_files".to_string(), list(&["**/*[sS]pec.js"])),
        ("helpers".to_string(), list(&["helpers/**/*.js"])),
        ("spec_dir".to_string(), Value::String(DEFAULT_SPEC_DIR.to_string())),
        ("src_dir".to_string(), Value::Null),
        ("stylesheets".to_string(), list(&[])),
        ("src_files".to_string(), list(&[])),
    ])
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
