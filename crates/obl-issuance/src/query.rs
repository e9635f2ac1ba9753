use obl_store::LedgerStore;

use crate::error::{ContractError, ContractResult};

/// Point lookups by raw key. Works for any record type.
#[derive(Debug)]
pub struct QueryService {
    span: tracing::Span,
}

impl Default for QueryService {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryService {
    pub fn new() -> Self {
        Self {
            span: tracing::info_span!("query_service"),
        }
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Return the bytes stored at `key`, unchanged.
    pub fn get(&self, store: &dyn LedgerStore, key: &str) -> ContractResult<Vec<u8>> {
        match store.get(key)? {
            Some(bytes) => {
                tracing::debug!(parent: &self.span, key, bytes = bytes.len(), "record read");
                Ok(bytes)
            }
            None => Err(ContractError::not_found("record", key)),
        }
    }
}
