//! Persistence for the committed attendance selection.
//!
//! The checked ids live in a JSON file under the platform data directory,
//! stamped with a save time; selections older than 90 days are discarded.
//! Loading is total: a missing file, unreadable JSON or an expired stamp
//! all come back as the empty set.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::attendance::CheckedSet;
use crate::models::SessionId;

/// Selections older than this are discarded on load.
pub const EXPIRY_DAYS: i64 = 90;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSelection {
    saved_at: DateTime<Utc>,
    session_ids: Vec<SessionId>,
}

/// File-backed store for the checked-session set.
#[derive(Debug, Clone)]
pub struct AttendanceStore {
    path: PathBuf,
}

impl AttendanceStore {
    /// Store at `<data dir>/schedtab/checked.json`.
    pub fn at_default_location() -> Result<Self> {
        let base = dirs::data_dir().context("Cannot determine platform data directory")?;
        Ok(Self {
            path: base.join("schedtab").join("checked.json"),
        })
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the persisted selection. Never fails: anything unusable is an
    /// empty set.
    pub fn load(&self) -> CheckedSet {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return CheckedSet::default();
        };
        let Ok(stored) = serde_json::from_str::<StoredSelection>(&contents) else {
            return CheckedSet::default();
        };
        if Utc::now() - stored.saved_at > Duration::days(EXPIRY_DAYS) {
            return CheckedSet::default();
        }
        CheckedSet::from_ids(stored.session_ids)
    }

    /// Write the selection with a fresh timestamp.
    pub fn save(&self, checked: &CheckedSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let stored = StoredSelection {
            saved_at: Utc::now(),
            session_ids: checked.ids().collect(),
        };
        let contents =
            serde_json::to_string_pretty(&stored).context("Failed to serialize selection")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> AttendanceStore {
        AttendanceStore::at_path(dir.path().join("nested").join("checked.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().is_empty());
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let checked = CheckedSet::from_ids([SessionId(3), SessionId(7), SessionId(12)]);
        store.save(&checked).unwrap();
        assert_eq!(store.load(), checked);
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json {{{").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn expired_selection_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        let stale = StoredSelection {
            saved_at: Utc::now() - Duration::days(EXPIRY_DAYS + 1),
            session_ids: vec![SessionId(1)],
        };
        fs::write(store.path(), serde_json::to_string(&stale).unwrap()).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn recent_selection_survives() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        let recent = StoredSelection {
            saved_at: Utc::now() - Duration::days(EXPIRY_DAYS - 1),
            session_ids: vec![SessionId(1)],
        };
        fs::write(store.path(), serde_json::to_string(&recent).unwrap()).unwrap();
        assert_eq!(store.load(), CheckedSet::from_ids([SessionId(1)]));
    }
}
