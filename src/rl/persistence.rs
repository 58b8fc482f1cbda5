//! Q-table persistence
//!
//! A snapshot is a single pretty-printed JSON document holding the action
//! count and every row keyed by its structured [`EncodedState`]. Values are
//! `f32` and serde_json writes the shortest representation that parses back
//! to the same bits, so a reload reproduces greedy behaviour exactly.
//!
//! Loading is all-or-nothing: any malformed entry fails the whole load.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::encoder::EncodedState;
use super::q_table::QTable;
use crate::error::PersistenceError;

/// Bumped whenever the snapshot layout changes
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub state: EncodedState,
    pub values: Vec<f32>,
}

/// Serialized form of a [`QTable`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTableSnapshot {
    /// Layout version for compatibility checking
    pub format_version: u32,

    /// Crate version that wrote the snapshot
    pub crate_version: String,

    /// Length of every value vector
    pub actions: usize,

    /// Rows sorted by state
    pub entries: Vec<SnapshotEntry>,
}

impl QTableSnapshot {
    /// Capture every row of a table
    pub fn from_table(table: &QTable) -> Self {
        let mut entries: Vec<SnapshotEntry> = table
            .iter()
            .map(|(state, values)| SnapshotEntry {
                state: *state,
                values: values.to_vec(),
            })
            .collect();
        entries.sort_by_key(|entry| entry.state);

        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            actions: table.action_count(),
            entries,
        }
    }

    /// Rebuild a table, validating every entry first
    pub fn into_table(self, seed: u64) -> Result<QTable, PersistenceError> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(PersistenceError::Version {
                found: self.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }
        if self.actions == 0 {
            return Err(PersistenceError::NoActions(self.actions));
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !entry.state.is_valid() {
                return Err(PersistenceError::InvalidState(entry.state.to_string()));
            }
            if entry.values.len() != self.actions {
                return Err(PersistenceError::ValueCount {
                    state: entry.state.to_string(),
                    found: entry.values.len(),
                    expected: self.actions,
                });
            }
            if !seen.insert(entry.state) {
                return Err(PersistenceError::DuplicateState(entry.state.to_string()));
            }
        }

        let mut table = QTable::new(self.actions, seed);
        for entry in self.entries {
            table.set_values(entry.state, &entry.values);
        }
        Ok(table)
    }
}

/// Save a Q-table to `path`
///
/// Creates parent directories if they don't exist.
pub fn save_q_table(table: &QTable, path: &Path) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PersistenceError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let snapshot = QTableSnapshot::from_table(table);
    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(path, &json).map_err(|e| PersistenceError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(
        path = %path.display(),
        bytes = json.len(),
        states = snapshot.entries.len(),
        "wrote Q-table checkpoint"
    );
    Ok(())
}

/// Load a Q-table from `path`
///
/// The restored table explores with a generator seeded from `seed`.
pub fn load_q_table(path: &Path, seed: u64) -> Result<QTable, PersistenceError> {
    let json = std::fs::read_to_string(path).map_err(|e| PersistenceError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let snapshot: QTableSnapshot =
        serde_json::from_str(&json).map_err(|e| PersistenceError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!(
        path = %path.display(),
        version = %snapshot.crate_version,
        states = snapshot.entries.len(),
        "loaded Q-table snapshot"
    );
    snapshot.into_table(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(packed: u16) -> EncodedState {
        EncodedState::unpack(packed).unwrap()
    }

    fn sample_table() -> QTable {
        let mut table = QTable::for_snake(1);
        table.set_values(key(0), &[1.0, 0.0, -1.0]);
        table.set_values(key(17), &[0.1, 0.2, 0.3]);
        table.set_values(key(287), &[-3.25e-7, 1.0e12, f32::MIN_POSITIVE]);
        table
    }

    #[test]
    fn test_save_and_load_preserves_values_exactly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/qtable.json");
        let table = sample_table();

        save_q_table(&table, &path).unwrap();
        let loaded = load_q_table(&path, 0).unwrap();

        assert_eq!(loaded.action_count(), 3);
        assert_eq!(loaded.len(), table.len());
        for (state, values) in table.iter() {
            let restored = loaded.values(*state).unwrap();
            let bits: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
            let restored_bits: Vec<u32> = restored.iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits, restored_bits);
        }
    }

    #[test]
    fn test_snapshot_entries_are_sorted() {
        let snapshot = QTableSnapshot::from_table(&sample_table());
        let states: Vec<u16> = snapshot.entries.iter().map(|e| e.state.pack()).collect();
        let mut sorted = states.clone();
        sorted.sort();
        assert_eq!(snapshot.entries.len(), 3);
        assert_eq!(snapshot.format_version, SNAPSHOT_FORMAT_VERSION);
        assert_eq!(states, sorted);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_q_table(Path::new("no/such/qtable.json"), 0).unwrap_err();
        assert!(matches!(err, PersistenceError::Read { .. }));
    }

    #[test]
    fn test_load_garbage_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("qtable.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_q_table(&path, 0).unwrap_err();
        assert!(matches!(err, PersistenceError::Parse { .. }));
    }

    #[test]
    fn test_wrong_value_count_rejected() {
        let mut snapshot = QTableSnapshot::from_table(&sample_table());
        snapshot.entries[1].values.pop();

        let err = snapshot.into_table(0).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::ValueCount {
                found: 2,
                expected: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_state_rejected() {
        let mut snapshot = QTableSnapshot::from_table(&sample_table());
        snapshot.entries[0].state.heading = 9;

        assert!(matches!(
            snapshot.into_table(0),
            Err(PersistenceError::InvalidState(_))
        ));
    }

    #[test]
    fn test_duplicate_state_rejected() {
        let mut snapshot = QTableSnapshot::from_table(&sample_table());
        let dup = snapshot.entries[0].clone();
        snapshot.entries.push(dup);

        assert!(matches!(
            snapshot.into_table(0),
            Err(PersistenceError::DuplicateState(_))
        ));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut snapshot = QTableSnapshot::from_table(&sample_table());
        snapshot.format_version = 99;

        assert!(matches!(
            snapshot.into_table(0),
            Err(PersistenceError::Version { found: 99, .. })
        ));
    }

    #[test]
    fn test_zero_actions_rejected() {
        let snapshot = QTableSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            crate_version: "0.0.0".to_string(),
            actions: 0,
            entries: Vec::new(),
        };
        assert!(matches!(
            snapshot.into_table(0),
            Err(PersistenceError::NoActions(0))
        ));
    }
}
