/// Errors from ledger store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store failed to read or write a key.
    #[error("ledger I/O error on '{key}': {reason}")]
    Io { key: String, reason: String },

    /// A record could not be encoded for storage.
    #[error("cannot encode record for '{key}': {reason}")]
    Marshal { key: String, reason: String },

    /// Stored bytes do not decode into the requested record shape.
    #[error("cannot decode record at '{key}': {reason}")]
    Decode { key: String, reason: String },

    /// A key in the transaction's read set changed before commit.
    #[error("transaction conflict on '{key}': read at {read:?}, now at {current:?}")]
    Conflict {
        key: String,
        read: Option<u64>,
        current: Option<u64>,
    },

    /// Snapshot contents failed verification.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Snapshot file could not be read or written.
    #[error("snapshot I/O error: {0}")]
    SnapshotIo(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn poisoned(key: impl Into<String>) -> Self {
        Self::Io {
            key: key.into(),
            reason: "lock poisoned".into(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
