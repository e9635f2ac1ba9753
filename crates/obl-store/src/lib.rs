//! Versioned key-value ledger access for the Open Badges Ledger.
//!
//! The production ledger is an external, shared store. This crate defines
//! the boundary the issuance core talks to and ships an in-memory reference
//! ledger with the same commit semantics.
//!
//! # Boundary
//!
//! - [`LedgerStore`] -- raw `get`/`put` over byte values
//! - [`RecordAccess`] -- typed decode/encode on top of any [`LedgerStore`]
//!
//! # Reference Ledger
//!
//! - [`InMemoryLedger`] -- per-key versions under a global commit height
//! - [`LedgerTxn`] -- one invocation's read set and buffered write set,
//!   validated and applied atomically on commit
//! - [`LedgerSnapshot`] -- checksummed JSON image for local persistence
//!
//! # Design Rules
//!
//! 1. Absence is `Ok(None)`, never an error and never a default value.
//! 2. `put` never checks existence; idempotency belongs to the caller.
//! 3. A transaction either applies its whole write set or nothing.
//! 4. A commit fails if any key it read has moved since it was read.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod traits;
pub mod txn;

pub use error::{StoreError, StoreResult};
pub use memory::{CommitReceipt, Entry, InMemoryLedger};
pub use snapshot::{LedgerSnapshot, SnapshotEntry, SNAPSHOT_FORMAT};
pub use traits::{LedgerStore, RecordAccess};
pub use txn::LedgerTxn;
