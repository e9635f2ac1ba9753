use obl_store::{LedgerStore, RecordAccess};
use obl_types::{is_reserved_key, Issuer, IssuerList, IssuerSummary, ISSUER_LIST_KEY};

use crate::error::{ContractError, ContractResult};

/// An issuer resolved (or created) against the issuer list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The in-memory list, including any summary appended for a new issuer.
    pub list: IssuerList,
    pub issuer: Issuer,
    /// Position of the issuer's summary in `list`.
    pub index: usize,
    /// Whether the issuer record was written by this resolution.
    pub created: bool,
}

/// Resolves issuers and keeps the issuer list.
///
/// The list is only read and written through the store handed to each call,
/// so every change lands in the caller's transaction.
#[derive(Debug)]
pub struct IssuerRegistry {
    span: tracing::Span,
}

impl Default for IssuerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IssuerRegistry {
    pub fn new() -> Self {
        Self {
            span: tracing::info_span!("issuer_registry"),
        }
    }

    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Load the issuer list. An absent list reads as empty; the first
    /// persisted write creates it.
    pub fn load_list(&self, store: &dyn LedgerStore) -> ContractResult<IssuerList> {
        match store.get_record::<IssuerList>(ISSUER_LIST_KEY)? {
            Some(list) => Ok(list),
            None => {
                tracing::debug!(parent: &self.span, "issuer list absent, starting empty");
                Ok(IssuerList::new())
            }
        }
    }

    /// Create the empty issuer list. Fails if a list is already present.
    pub fn init_list(&self, store: &dyn LedgerStore) -> ContractResult<()> {
        if store.exists(ISSUER_LIST_KEY)? {
            tracing::warn!(parent: &self.span, "issuer list exists, aborting");
            return Err(ContractError::already_exists("issuer list", ISSUER_LIST_KEY));
        }
        self.persist_list(store, &IssuerList::new())?;
        tracing::info!(parent: &self.span, "issuer list initialized");
        Ok(())
    }

    /// Write `list` back under the issuer-list key.
    pub fn persist_list(&self, store: &dyn LedgerStore, list: &IssuerList) -> ContractResult<()> {
        store.put_record(ISSUER_LIST_KEY, list)?;
        Ok(())
    }

    /// Find the issuer registered under `email`, or register a new one.
    ///
    /// Lookup uses the first summary whose email matches. A new issuer's
    /// record is written immediately but the updated list is NOT persisted;
    /// the caller appends its IDs and calls [`Self::persist_list`].
    ///
    /// An email that collides with the list key or the badge/certificate
    /// prefixes is refused before anything is read or written.
    pub fn ensure_issuer(
        &self,
        store: &dyn LedgerStore,
        email: &str,
        url: &str,
        name: &str,
    ) -> ContractResult<Resolution> {
        if is_reserved_key(email) {
            tracing::warn!(parent: &self.span, issuer = email, "reserved key as issuer email");
            return Err(ContractError::ReservedKey(email.to_string()));
        }

        let mut list = self.load_list(store)?;

        if let Some(index) = list.position(email) {
            let issuer = store.get_record::<Issuer>(email)?.ok_or_else(|| {
                ContractError::InconsistentState(format!(
                    "issuer summary for '{email}' has no issuer record"
                ))
            })?;
            tracing::debug!(parent: &self.span, issuer = email, index, "issuer resolved");
            return Ok(Resolution {
                list,
                issuer,
                index,
                created: false,
            });
        }

        let issuer = Issuer::new(email, url, name);
        store.put_record(email, &issuer)?;
        let index = list.push(IssuerSummary::for_issuer(&issuer));
        tracing::info!(parent: &self.span, issuer = email, index, "issuer created");

        Ok(Resolution {
            list,
            issuer,
            index,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obl_store::InMemoryLedger;

    #[test]
    fn absent_list_reads_empty() {
        let ledger = InMemoryLedger::new();
        let list = IssuerRegistry::new().load_list(&ledger).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn init_list_once() {
        let ledger = InMemoryLedger::new();
        let registry = IssuerRegistry::new();
        registry.init_list(&ledger).unwrap();
        let bytes = ledger.get(ISSUER_LIST_KEY).unwrap();

        let err = registry.init_list(&ledger).unwrap_err();
        assert_eq!(err.code(), "ALREADY_EXISTS");
        assert_eq!(ledger.get(ISSUER_LIST_KEY).unwrap(), bytes);
    }

    #[test]
    fn new_issuer_is_written_but_list_is_not() {
        let ledger = InMemoryLedger::new();
        let registry = IssuerRegistry::new();
        let res = registry
            .ensure_issuer(&ledger, "jane@acme.edu", "https://acme.edu", "Acme Univ")
            .unwrap();

        assert!(res.created);
        assert_eq!(res.index, 0);
        assert_eq!(res.issuer.id, "jane@acme.edu");
        assert_eq!(res.issuer.name, "Acme Univ");
        assert_eq!(res.list.len(), 1);

        assert!(ledger.exists("jane@acme.edu").unwrap());
        assert!(!ledger.exists(ISSUER_LIST_KEY).unwrap());
    }

    #[test]
    fn ensure_twice_is_stable() {
        let ledger = InMemoryLedger::new();
        let registry = IssuerRegistry::new();

        let first = registry
            .ensure_issuer(&ledger, "jane@acme.edu", "https://acme.edu", "Acme Univ")
            .unwrap();
        registry.persist_list(&ledger, &first.list).unwrap();
        let bytes_before = ledger.get("jane@acme.edu").unwrap();

        let second = registry
            .ensure_issuer(&ledger, "jane@acme.edu", "https://other.edu", "Renamed")
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.index, first.index);
        assert_eq!(second.issuer, first.issuer);
        assert_eq!(ledger.get("jane@acme.edu").unwrap(), bytes_before);
    }

    #[test]
    fn second_issuer_gets_next_index() {
        let ledger = InMemoryLedger::new();
        let registry = IssuerRegistry::new();
        let a = registry.ensure_issuer(&ledger, "a@u.edu", "", "A").unwrap();
        registry.persist_list(&ledger, &a.list).unwrap();
        let b = registry.ensure_issuer(&ledger, "b@u.edu", "", "B").unwrap();
        assert_eq!(b.index, 1);
        assert_eq!(b.list.len(), 2);
    }

    #[test]
    fn summary_without_record_is_inconsistent() {
        let ledger = InMemoryLedger::new();
        let registry = IssuerRegistry::new();
        let mut list = IssuerList::new();
        list.push(IssuerSummary {
            email: "ghost@u.edu".into(),
            ..Default::default()
        });
        registry.persist_list(&ledger, &list).unwrap();

        let err = registry
            .ensure_issuer(&ledger, "ghost@u.edu", "", "Ghost")
            .unwrap_err();
        assert_eq!(err.code(), "INCONSISTENT_STATE");
    }

    #[test]
    fn first_match_wins() {
        let ledger = InMemoryLedger::new();
        let registry = IssuerRegistry::new();
        let mut list = IssuerList::new();
        for ids in [vec!["badge:first".to_string()], vec!["badge:second".to_string()]] {
            list.push(IssuerSummary {
                email: "dup@u.edu".into(),
                badge_ids: ids,
                ..Default::default()
            });
        }
        registry.persist_list(&ledger, &list).unwrap();
        ledger
            .put_record("dup@u.edu", &Issuer::new("dup@u.edu", "", "Dup"))
            .unwrap();

        let res = registry.ensure_issuer(&ledger, "dup@u.edu", "", "Dup").unwrap();
        assert_eq!(res.index, 0);
    }

    #[test]
    fn reserved_emails_are_refused() {
        let ledger = InMemoryLedger::new();
        let registry = IssuerRegistry::new();
        registry.init_list(&ledger).unwrap();
        let list_bytes = ledger.get(ISSUER_LIST_KEY).unwrap();

        for email in [ISSUER_LIST_KEY, "badge:introcourse", "cert:bob@example.com-x"] {
            let err = registry.ensure_issuer(&ledger, email, "", "Evil").unwrap_err();
            assert_eq!(err, ContractError::ReservedKey(email.to_string()));
        }
        assert_eq!(ledger.get(ISSUER_LIST_KEY).unwrap(), list_bytes);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn undecodable_list_is_marshal_error() {
        let ledger = InMemoryLedger::new();
        ledger.put(ISSUER_LIST_KEY, b"not json").unwrap();
        let err = IssuerRegistry::new().load_list(&ledger).unwrap_err();
        assert_eq!(err.code(), "MARSHAL");
    }
}
