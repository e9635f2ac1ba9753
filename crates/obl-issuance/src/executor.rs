use std::sync::Arc;

use obl_gate::AttributeSource;
use obl_store::{CommitReceipt, InMemoryLedger};

use crate::error::ContractResult;
use crate::invocation::Response;
use crate::router::Router;

/// A committed invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Executed {
    pub response: Response,
    pub receipt: CommitReceipt,
}

impl Executed {
    /// Whether the invocation wrote anything.
    pub fn changed(&self) -> bool {
        !self.receipt.written.is_empty()
    }
}

/// Runs each invocation inside its own ledger transaction.
///
/// The transaction commits only if the router succeeds; on any error the
/// write set is discarded and the ledger is left untouched. A commit whose
/// read set went stale fails with a conflict and is not retried.
#[derive(Debug)]
pub struct Executor {
    ledger: Arc<InMemoryLedger>,
    router: Router,
    span: tracing::Span,
}

impl Executor {
    pub fn new(ledger: Arc<InMemoryLedger>, router: Router) -> Self {
        Self {
            ledger,
            router,
            span: tracing::info_span!("executor"),
        }
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.router = self.router.with_span(span.clone());
        self.span = span;
        self
    }

    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    pub fn invoke(
        &self,
        attributes: &dyn AttributeSource,
        function: &str,
        args: &[String],
    ) -> ContractResult<Executed> {
        let txn = self.ledger.begin();
        match self.router.invoke(&txn, attributes, function, args) {
            Ok(response) => {
                let receipt = txn.commit()?;
                tracing::info!(
                    parent: &self.span,
                    function,
                    height = receipt.height,
                    writes = receipt.written.len(),
                    "invocation committed"
                );
                Ok(Executed { response, receipt })
            }
            Err(err) => {
                txn.rollback();
                tracing::info!(
                    parent: &self.span,
                    function,
                    code = err.code(),
                    %err,
                    "invocation failed"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obl_gate::AttributeMap;
    use obl_store::LedgerStore;

    fn executor() -> Executor {
        Executor::new(Arc::new(InMemoryLedger::new()), Router::default())
    }

    #[test]
    fn success_commits() {
        let exec = executor();
        let out = exec
            .invoke(&AttributeMap::university("jane@acme.edu"), "initLedger", &[])
            .unwrap();
        assert!(out.changed());
        assert_eq!(out.receipt.height, 1);
        assert_eq!(exec.ledger().height().unwrap(), 1);
    }

    #[test]
    fn failure_writes_nothing() {
        let exec = executor();
        let jane = AttributeMap::university("jane@acme.edu");
        let args: Vec<String> = [
            "Acme Univ",
            "https://acme.edu",
            "Intro Course",
            "desc",
            "criteria",
            "Dean",
            "Jane Doe",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        exec.invoke(&jane, "issueBadge", &args).unwrap();
        let snapshot = exec.ledger().snapshot().unwrap();

        // New issuer, existing badge slug: the issuer write must not survive.
        let bob = AttributeMap::university("bob@other.edu");
        let err = exec.invoke(&bob, "issueBadge", &args).unwrap_err();
        assert_eq!(err.code(), "ALREADY_EXISTS");
        assert!(!exec.ledger().exists("bob@other.edu").unwrap());
        assert_eq!(exec.ledger().snapshot().unwrap(), snapshot);
    }

    #[test]
    fn read_only_invocation_does_not_advance_height() {
        let exec = executor();
        let jane = AttributeMap::university("jane@acme.edu");
        exec.invoke(&jane, "initLedger", &[]).unwrap();
        let out = exec
            .invoke(&jane, "getCertificate", &["issuer-list".to_string()])
            .unwrap();
        assert!(!out.changed());
        assert_eq!(exec.ledger().height().unwrap(), 1);
    }
}
