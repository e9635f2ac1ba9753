//! Checksummed JSON image of an [`InMemoryLedger`].
//!
//! Values are hex-encoded so arbitrary bytes survive the round trip. Each
//! entry carries a domain-separated BLAKE3 checksum over its key and value;
//! loading verifies every checksum before the ledger is rebuilt.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::memory::{Entry, InMemoryLedger, LedgerState};

/// Current snapshot format version.
pub const SNAPSHOT_FORMAT: u32 = 1;

const CHECKSUM_DOMAIN: &str = "obl-snapshot-entry-v1";

/// Serialized ledger image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Format version; must equal [`SNAPSHOT_FORMAT`].
    pub version: u32,
    /// Ledger height at the time of the snapshot.
    pub height: u64,
    pub entries: BTreeMap<String, SnapshotEntry>,
}

/// One key's value, version, and checksum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub version: u64,
    /// Hex-encoded value bytes.
    pub value: String,
    /// Hex-encoded BLAKE3 checksum of key and value.
    pub checksum: String,
}

fn entry_checksum(key: &str, value: &[u8]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(CHECKSUM_DOMAIN.as_bytes());
    hasher.update(b":");
    hasher.update(key.as_bytes());
    hasher.update(&[0]);
    hasher.update(value);
    hex::encode(hasher.finalize().as_bytes())
}

impl InMemoryLedger {
    /// Capture the current contents.
    pub fn snapshot(&self) -> StoreResult<LedgerSnapshot> {
        self.with_state(|state| LedgerSnapshot {
            version: SNAPSHOT_FORMAT,
            height: state.height,
            entries: state
                .entries
                .iter()
                .map(|(key, entry)| {
                    (
                        key.clone(),
                        SnapshotEntry {
                            version: entry.version,
                            value: hex::encode(&entry.value),
                            checksum: entry_checksum(key, &entry.value),
                        },
                    )
                })
                .collect(),
        })
    }

    /// Rebuild a ledger from a snapshot, verifying every entry.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> StoreResult<Self> {
        if snapshot.version != SNAPSHOT_FORMAT {
            return Err(StoreError::CorruptSnapshot(format!(
                "unsupported format version {} (expected {SNAPSHOT_FORMAT})",
                snapshot.version
            )));
        }

        let mut entries = HashMap::with_capacity(snapshot.entries.len());
        for (key, entry) in snapshot.entries {
            let value = hex::decode(&entry.value).map_err(|e| {
                StoreError::CorruptSnapshot(format!("value for '{key}' is not hex: {e}"))
            })?;
            if entry_checksum(&key, &value) != entry.checksum {
                return Err(StoreError::CorruptSnapshot(format!(
                    "checksum mismatch for '{key}'"
                )));
            }
            if entry.version > snapshot.height {
                return Err(StoreError::CorruptSnapshot(format!(
                    "'{key}' at version {} is above height {}",
                    entry.version, snapshot.height
                )));
            }
            entries.insert(
                key,
                Entry {
                    value,
                    version: entry.version,
                },
            );
        }

        Ok(Self::from_state(LedgerState {
            entries,
            height: snapshot.height,
        }))
    }

    /// Write a snapshot to `path`, replacing any existing file atomically.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let snapshot = self.snapshot()?;
        let json = serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Marshal {
            key: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::SnapshotIo(e.error))?;

        tracing::debug!(path = %path.display(), height = snapshot.height, "snapshot saved");
        Ok(())
    }

    /// Load a ledger from a snapshot file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let bytes = std::fs::read(path)?;
        let snapshot: LedgerSnapshot = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::CorruptSnapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    /// Load from `path` if it exists, otherwise start empty.
    pub fn load_or_default(path: &Path) -> StoreResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LedgerStore;

    fn populated() -> InMemoryLedger {
        let ledger = InMemoryLedger::new();
        ledger.put("issuer-list", br#"{"issuers":[]}"#).unwrap();
        ledger.put("badge:x", &[0, 159, 146, 150]).unwrap();
        ledger.put("empty", b"").unwrap();
        ledger
    }

    #[test]
    fn snapshot_roundtrip_preserves_versions() {
        let ledger = populated();
        let restored = InMemoryLedger::from_snapshot(ledger.snapshot().unwrap()).unwrap();
        assert_eq!(restored.height().unwrap(), 3);
        assert_eq!(restored.keys().unwrap(), ledger.keys().unwrap());
        for key in ledger.keys().unwrap() {
            assert_eq!(restored.entry(&key).unwrap(), ledger.entry(&key).unwrap());
        }
    }

    #[test]
    fn tampered_value_is_rejected() {
        let mut snapshot = populated().snapshot().unwrap();
        snapshot.entries.get_mut("issuer-list").unwrap().value = hex::encode(b"{}");
        let err = InMemoryLedger::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StoreError::CorruptSnapshot(ref m) if m.contains("issuer-list")));
    }

    #[test]
    fn swapped_values_are_rejected() {
        let mut snapshot = populated().snapshot().unwrap();
        let a = snapshot.entries["issuer-list"].clone();
        let b = snapshot.entries["badge:x"].clone();
        snapshot.entries.insert("issuer-list".into(), b);
        snapshot.entries.insert("badge:x".into(), a);
        assert!(InMemoryLedger::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let mut snapshot = populated().snapshot().unwrap();
        snapshot.version = 99;
        assert!(matches!(
            InMemoryLedger::from_snapshot(snapshot),
            Err(StoreError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let ledger = populated();
        ledger.save(&path).unwrap();

        let loaded = InMemoryLedger::load(&path).unwrap();
        assert_eq!(loaded.snapshot().unwrap(), ledger.snapshot().unwrap());
    }

    #[test]
    fn save_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let ledger = populated();
        ledger.save(&path).unwrap();
        ledger.put("later", b"1").unwrap();
        ledger.save(&path).unwrap();

        let loaded = InMemoryLedger::load(&path).unwrap();
        assert!(loaded.exists("later").unwrap());
    }

    #[test]
    fn load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = InMemoryLedger::load_or_default(&dir.path().join("none.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn load_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"not a snapshot").unwrap();
        assert!(matches!(
            InMemoryLedger::load(&path),
            Err(StoreError::CorruptSnapshot(_))
        ));
    }
}
