//! Local history backup for the store document.
//!
//! This module handles:
//! - Creating a timestamped copy of the store before an import rewrites it
//! - Skipping the copy when it matches the latest backup
//! - Rotating backups based on count and age

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use roster_lib::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory, next to the store file, that holds backups.
pub const HISTORY_DIR: &str = ".history";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Configuration for history backups (`history:` in config.yaml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub max_count: usize,
    pub max_age_days: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_count: 100,
            max_age_days: 30,
        }
    }
}

/// Backup entry metadata.
#[derive(Debug, Clone)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub size: u64,
}

/// History directory used for `store_path`.
#[must_use]
pub fn history_dir(store_path: &Path) -> PathBuf {
    store_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(HISTORY_DIR)
}

/// Copy the store file into the history directory before it is rewritten.
///
/// Returns the backup path, or `None` when history is disabled, the store
/// does not exist yet, or it matches the latest backup.
///
/// # Errors
///
/// Returns an error if the backup cannot be written or old ones removed.
pub fn backup_before_import(store_path: &Path, config: &HistoryConfig) -> Result<Option<PathBuf>> {
    backup_at(store_path, config, Utc::now())
}

fn backup_at(
    store_path: &Path,
    config: &HistoryConfig,
    now: DateTime<Utc>,
) -> Result<Option<PathBuf>> {
    if !config.enabled || !store_path.is_file() {
        return Ok(None);
    }

    let dir = history_dir(store_path);
    fs::create_dir_all(&dir)?;

    let (stem, ext) = name_parts(store_path);
    if let Some(latest) = list_backups(&dir, store_path)?.into_iter().next() {
        if fs::read(store_path)? == fs::read(&latest.path)? {
            tracing::debug!(latest = %latest.path.display(), "Skipping backup: store unchanged");
            return Ok(None);
        }
    }

    let backup_path = dir.join(format!("{stem}.{}.{ext}", now.format(TIMESTAMP_FORMAT)));
    fs::copy(store_path, &backup_path)?;
    tracing::debug!(path = %backup_path.display(), "Created backup");

    rotate_history(&dir, store_path, config, now)?;
    Ok(Some(backup_path))
}

/// Remove backups past `max_count` (newest kept) or older than
/// `max_age_days`.
fn rotate_history(
    dir: &Path,
    store_path: &Path,
    config: &HistoryConfig,
    now: DateTime<Utc>,
) -> Result<usize> {
    let cutoff = now - chrono::Duration::days(i64::from(config.max_age_days));
    let mut removed = 0;

    for (idx, entry) in list_backups(dir, store_path)?.iter().enumerate() {
        if idx >= config.max_count || entry.timestamp < cutoff {
            fs::remove_file(&entry.path).map_err(RosterError::Io)?;
            removed += 1;
        }
    }

    if removed > 0 {
        tracing::debug!(removed, "Pruned old backups");
    }
    Ok(removed)
}

/// Backups of `store_path` found in `dir`, newest first.
///
/// Files whose name does not carry a valid timestamp are ignored.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_backups(dir: &Path, store_path: &Path) -> Result<Vec<BackupEntry>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let (stem, ext) = name_parts(store_path);
    let prefix = format!("{stem}.");
    let suffix = format!(".{ext}");
    let mut backups = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stamp) = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(&suffix))
        else {
            continue;
        };
        let Ok(parsed) = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT) else {
            continue;
        };
        let size = fs::metadata(&path)?.len();
        backups.push(BackupEntry {
            path,
            timestamp: Utc.from_utc_datetime(&parsed),
            size,
        });
    }

    backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(backups)
}

fn name_parts(store_path: &Path) -> (String, String) {
    let stem = store_path
        .file_stem()
        .map_or_else(|| "roster".to_string(), |s| s.to_string_lossy().into_owned());
    let ext = store_path
        .extension()
        .map_or_else(|| "json".to_string(), |s| s.to_string_lossy().into_owned());
    (stem, ext)
}
