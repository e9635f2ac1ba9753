use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::LedgerStore;
use crate::txn::LedgerTxn;

/// A stored value and the commit height that last wrote it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub value: Vec<u8>,
    pub version: u64,
}

/// Outcome of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Ledger height after the commit. Unchanged for read-only commits.
    pub height: u64,
    /// Keys written by the commit, in key order.
    pub written: Vec<String>,
}

/// In-memory versioned ledger for tests, local tooling, and embedding.
///
/// Every commit advances a global height; each key's version is the height
/// of the commit that last wrote it. Direct [`LedgerStore::put`] calls are
/// single-write commits. Invocations that must be atomic go through
/// [`InMemoryLedger::begin`].
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
pub(crate) struct LedgerState {
    pub(crate) entries: HashMap<String, Entry>,
    pub(crate) height: u64,
}

impl InMemoryLedger {
    /// Create a new empty ledger at height 0.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
        }
    }

    pub(crate) fn from_state(state: LedgerState) -> Self {
        Self {
            inner: RwLock::new(state),
        }
    }

    /// Open a transaction against this ledger.
    pub fn begin(&self) -> LedgerTxn<'_> {
        LedgerTxn::new(self)
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.entries.len()).unwrap_or(0)
    }

    /// Returns `true` if the ledger holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current commit height.
    pub fn height(&self) -> StoreResult<u64> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("<height>"))?;
        Ok(state.height)
    }

    /// Version of `key`, or `None` if absent.
    pub fn version(&self, key: &str) -> StoreResult<Option<u64>> {
        Ok(self.entry(key)?.map(|e| e.version))
    }

    /// Read a key together with its version.
    pub fn entry(&self, key: &str) -> StoreResult<Option<Entry>> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned(key))?;
        Ok(state.entries.get(key).cloned())
    }

    /// All keys, sorted.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let state = self.inner.read().map_err(|_| StoreError::poisoned("<keys>"))?;
        let mut keys: Vec<String> = state.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Validate a read set and apply a write set as one commit.
    ///
    /// Every key in `reads` must still be at the recorded version (`None`
    /// meaning "was absent"). On any mismatch nothing is written.
    pub(crate) fn apply(
        &self,
        reads: &BTreeMap<String, Option<u64>>,
        writes: BTreeMap<String, Vec<u8>>,
    ) -> StoreResult<CommitReceipt> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| StoreError::poisoned("<commit>"))?;

        for (key, read) in reads {
            let current = state.entries.get(key).map(|e| e.version);
            if current != *read {
                tracing::warn!(key = %key, ?read, ?current, "commit rejected: read set is stale");
                return Err(StoreError::Conflict {
                    key: key.clone(),
                    read: *read,
                    current,
                });
            }
        }

        if writes.is_empty() {
            return Ok(CommitReceipt {
                height: state.height,
                written: Vec::new(),
            });
        }

        state.height += 1;
        let height = state.height;
        let mut written = Vec::with_capacity(writes.len());
        for (key, value) in writes {
            state.entries.insert(
                key.clone(),
                Entry {
                    value,
                    version: height,
                },
            );
            written.push(key);
        }

        tracing::debug!(height, keys = written.len(), "commit applied");
        Ok(CommitReceipt { height, written })
    }

    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> StoreResult<T> {
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::poisoned("<snapshot>"))?;
        Ok(f(&state))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entry(key)?.map(|e| e.value))
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut writes = BTreeMap::new();
        writes.insert(key.to_string(), value.to_vec());
        self.apply(&BTreeMap::new(), writes)?;
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let height = self.height().unwrap_or(0);
        f.debug_struct("InMemoryLedger")
            .field("key_count", &self.len())
            .field("height", &height)
            .finish()
    }
}
