use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("issuer summary index {index} out of range (list has {len} entries)")]
    SummaryIndexOutOfRange { index: usize, len: usize },
}
