use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// Raw key-value ledger boundary.
///
/// All implementations must satisfy these invariants:
/// - `get` returns `Ok(None)` for an absent key and errors only on I/O
///   failure.
/// - `put` performs no existence check; it overwrites unconditionally.
/// - The store never interprets values.
pub trait LedgerStore: Send + Sync {
    /// Read the bytes stored at `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` at `key`.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Check whether any value is stored at `key`.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Typed record access over any [`LedgerStore`].
///
/// Records are JSON-encoded. Field order follows the struct definition, so
/// the same record always encodes to the same bytes.
pub trait RecordAccess: LedgerStore {
    /// Decode the record at `key` into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent. A present record is always
    /// `Some`, however empty its fields are.
    fn get_record<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(bytes) = self.get(key)? else {
            tracing::debug!(key, "record absent");
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Decode {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Encode `record` and store it at `key`.
    fn put_record<T: Serialize + ?Sized>(&self, key: &str, record: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Marshal {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.put(key, &bytes)?;
        tracing::debug!(key, bytes = bytes.len(), "record written");
        Ok(())
    }
}

impl<S: LedgerStore + ?Sized> RecordAccess for S {}
