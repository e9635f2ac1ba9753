use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::memory::{CommitReceipt, InMemoryLedger};
use crate::traits::LedgerStore;

/// A single invocation's view of an [`InMemoryLedger`].
///
/// Reads record the version they observed; writes are buffered. Nothing
/// reaches the ledger until [`LedgerTxn::commit`], which applies the whole
/// write set only if every key read is still at its recorded version.
/// Dropping the transaction discards its writes.
///
/// Reads see the transaction's own buffered writes.
pub struct LedgerTxn<'a> {
    ledger: &'a InMemoryLedger,
    state: Mutex<TxnState>,
}

#[derive(Default)]
struct TxnState {
    reads: BTreeMap<String, Option<u64>>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl<'a> LedgerTxn<'a> {
    pub(crate) fn new(ledger: &'a InMemoryLedger) -> Self {
        Self {
            ledger,
            state: Mutex::new(TxnState::default()),
        }
    }

    /// Keys read from the ledger so far, with the versions observed.
    pub fn read_set(&self) -> StoreResult<BTreeMap<String, Option<u64>>> {
        Ok(self.lock("<read-set>")?.reads.clone())
    }

    /// Validate the read set and apply the write set atomically.
    pub fn commit(self) -> StoreResult<CommitReceipt> {
        let state = self
            .state
            .into_inner()
            .map_err(|_| StoreError::poisoned("<commit>"))?;
        self.ledger.apply(&state.reads, state.writes)
    }

    /// Discard the transaction. Equivalent to dropping it.
    pub fn rollback(self) {
        if let Ok(state) = self.state.lock() {
            tracing::debug!(writes = state.writes.len(), "transaction rolled back");
        }
    }

    fn lock(&self, key: &str) -> StoreResult<std::sync::MutexGuard<'_, TxnState>> {
        self.state.lock().map_err(|_| StoreError::poisoned(key))
    }
}

impl LedgerStore for LedgerTxn<'_> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let mut state = self.lock(key)?;
        if let Some(pending) = state.writes.get(key) {
            return Ok(Some(pending.clone()));
        }
        let entry = self.ledger.entry(key)?;
        state
            .reads
            .entry(key.to_string())
            .or_insert_with(|| entry.as_ref().map(|e| e.version));
        Ok(entry.map(|e| e.value))
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut state = self.lock(key)?;
        state.writes.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl std::fmt::Debug for LedgerTxn<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (reads, writes) = self
            .state
            .lock()
            .map(|s| (s.reads.len(), s.writes.len()))
            .unwrap_or((0, 0));
        f.debug_struct("LedgerTxn")
            .field("reads", &reads)
            .field("writes", &writes)
            .finish()
    }
}
