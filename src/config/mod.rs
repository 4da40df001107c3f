//! Configuration management for `roster`.
//!
//! Configuration is layered, highest precedence first:
//! - Command-line flags (`--as`, `--store`)
//! - Environment variables (`ROSTER_USER`, `ROSTER_STORE`), read by clap
//! - Workspace config (`.roster/config.yaml`)
//! - Built-in defaults

use roster_lib::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sync::HistoryConfig;

/// Workspace directory name.
pub const ROSTER_DIR: &str = ".roster";

/// Config file inside the workspace directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Default store document inside the workspace directory.
pub const STORE_FILE: &str = "roster.json";

/// Contents of `.roster/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store document, relative to the directory holding `.roster/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,
    /// Username acting when `--as` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Where `roster export` writes when `-o` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    pub history: HistoryConfig,
}

impl Config {
    /// Load a config file; a missing or empty file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file is not valid YAML for this shape.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text)
            .map_err(|e| RosterError::Config(format!("{}: {e}", path.display())))
    }

    /// Render as YAML for `roster init`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| RosterError::Config(e.to_string()))
    }
}

/// Values supplied on the command line (or through clap's env fallback).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub store: Option<PathBuf>,
    pub user: Option<String>,
}

/// Fully resolved settings for one command.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Workspace directory, when one was found.
    pub roster_dir: Option<PathBuf>,
    pub store_path: PathBuf,
    pub user: Option<String>,
    pub export_dir: PathBuf,
    pub history: HistoryConfig,
}

/// Find the nearest `.roster` directory at or above `start`.
#[must_use]
pub fn discover_roster_dir(start: &Path) -> Option<PathBuf> {
    let start = dunce::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    start
        .ancestors()
        .map(|dir| dir.join(ROSTER_DIR))
        .find(|candidate| candidate.is_dir())
}

/// Resolve settings for a command run from `cwd`.
///
/// # Errors
///
/// Returns `NotInitialized` when there is neither a workspace nor a
/// `--store` override, or `Config` if the config file is invalid.
pub fn resolve(cwd: &Path, overrides: &Overrides) -> Result<Settings> {
    let roster_dir = discover_roster_dir(cwd);
    let config = match &roster_dir {
        Some(dir) => Config::load(&dir.join(CONFIG_FILE))?,
        None => Config::default(),
    };
    let base = roster_dir
        .as_deref()
        .and_then(Path::parent)
        .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);

    let store_path = match (&overrides.store, &config.store, &roster_dir) {
        (Some(path), _, _) => cwd.join(path),
        (None, Some(path), _) => base.join(path),
        (None, None, Some(dir)) => dir.join(STORE_FILE),
        (None, None, None) => return Err(RosterError::NotInitialized),
    };

    let settings = Settings {
        store_path,
        user: overrides.user.clone().or(config.user),
        export_dir: config
            .export_dir
            .map_or_else(|| cwd.to_path_buf(), |dir| base.join(dir)),
        history: config.history,
        roster_dir,
    };
    tracing::debug!(store = %settings.store_path.display(), user = ?settings.user, "Resolved settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(ROSTER_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), config).unwrap();
        temp
    }

    #[test]
    fn test_defaults_inside_workspace() {
        let temp = workspace("");
        let settings = resolve(temp.path(), &Overrides::default()).unwrap();
        assert!(settings.store_path.ends_with(".roster/roster.json"));
        assert_eq!(settings.user, None);
        assert_eq!(settings.history, HistoryConfig::default());
    }

    #[test]
    fn test_config_file_values() {
        let temp = workspace(
            "store: data/game.json\nuser: gm\nexport_dir: out\nhistory:\n  max_count: 5\n",
        );
        let settings = resolve(temp.path(), &Overrides::default()).unwrap();
        assert!(settings.store_path.ends_with("data/game.json"));
        assert!(settings.export_dir.ends_with("out"));
        assert_eq!(settings.user.as_deref(), Some("gm"));
        assert_eq!(settings.history.max_count, 5);
        assert!(settings.history.enabled);
    }

    #[test]
    fn test_overrides_win() {
        let temp = workspace("user: gm\n");
        let overrides = Overrides {
            store: Some(PathBuf::from("elsewhere.json")),
            user: Some("alice".to_string()),
        };
        let settings = resolve(temp.path(), &overrides).unwrap();
        assert_eq!(settings.store_path, temp.path().join("elsewhere.json"));
        assert_eq!(settings.user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_discovered_from_subdirectory() {
        let temp = workspace("");
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert!(discover_roster_dir(&nested).is_some());
    }

    #[test]
    fn test_not_initialized() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            resolve(temp.path(), &Overrides::default()),
            Err(RosterError::NotInitialized)
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp = workspace("history: [not, a, map]\n");
        assert!(matches!(
            resolve(temp.path(), &Overrides::default()),
            Err(RosterError::Config(_))
        ));
    }
}
