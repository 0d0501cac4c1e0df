//! Platform configuration paths

use std::path::{Path, PathBuf};

/// Name used for the configuration directory
const APP_NAME: &str = "jasmine-headless";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/jasmine-headless/`
/// - macOS: `~/Library/Application Support/jasmine-headless/`
/// - Windows: `%APPDATA%\jasmine-headless\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the settings file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Join `path` onto `base` unless it is already absolute
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Directory containing `file`, or the empty path for a bare file name
pub fn parent_dir(file: &Path) -> PathBuf {
    file.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_toml() {
        if let Some(path) = config_path() {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        }
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let resolved = resolve_against(Path::new("spec/support"), Path::new("helpers"));
        assert_eq!(resolved, PathBuf::from("spec/support/helpers"));
    }

    #[test]
    fn test_resolve_keeps_absolute() {
        let abs = std::env::temp_dir();
        assert_eq!(resolve_against(Path::new("ignored"), &abs), abs);
    }

    #[test]
    fn test_parent_dir_of_bare_name_is_empty() {
        assert_eq!(parent_dir(Path::new("test.yml")), PathBuf::new());
        assert_eq!(
            parent_dir(Path::new("spec/javascripts/support/jasmine.yml")),
            PathBuf::from("spec/javascripts/support")
        );
    }
}
