use obl_store::{LedgerStore, RecordAccess};
use obl_types::{badge_key, badge_slug, Badge, SignatureLine};

use crate::error::{ContractError, ContractResult};
use crate::registry::IssuerRegistry;

/// Status message returned by a successful badge issuance.
pub const BADGE_ISSUED: &str =
    "Successfully updated blockchain: CREATED Badge and UPDATED issuerList";

/// Arguments of `issueBadge`, with the authenticated issuer email in front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueBadge {
    pub issuer_email: String,
    pub issuer_name: String,
    pub issuer_url: String,
    pub badge_name: String,
    pub badge_description: String,
    pub criteria: String,
    pub job_title: String,
    pub signature_name: String,
}

/// Creates badge classes.
#[derive(Debug)]
pub struct BadgeService {
    registry: IssuerRegistry,
    span: tracing::Span,
}

impl Default for BadgeService {
    fn default() -> Self {
        Self::new()
    }
}

impl BadgeService {
    pub fn new() -> Self {
        let span = tracing::info_span!("badge_service");
        Self {
            registry: IssuerRegistry::new().with_span(span.clone()),
            span,
        }
    }

    pub fn with_span(self, span: tracing::Span) -> Self {
        Self {
            registry: self.registry.with_span(span.clone()),
            span,
        }
    }

    /// Issue a badge owned by `request.issuer_email`, registering the issuer
    /// on first use.
    pub fn issue(&self, store: &dyn LedgerStore, request: &IssueBadge) -> ContractResult<Badge> {
        let mut resolution = self.registry.ensure_issuer(
            store,
            &request.issuer_email,
            &request.issuer_url,
            &request.issuer_name,
        )?;

        let badge_id = badge_key(&badge_slug(&request.badge_name));
        if store.get_record::<Badge>(&badge_id)?.is_some() {
            tracing::warn!(parent: &self.span, badge = %badge_id, "badge exists, aborting");
            return Err(ContractError::already_exists("badge", badge_id));
        }

        let badge = Badge::new(
            &badge_id,
            &request.badge_name,
            &request.badge_description,
            &resolution.issuer,
            &request.criteria,
            SignatureLine::new(&request.job_title, &request.signature_name),
        );
        store.put_record(&badge_id, &badge)?;

        resolution
            .list
            .append_badge_id(resolution.index, badge_id.as_str())?;
        self.registry.persist_list(store, &resolution.list)?;

        tracing::info!(
            parent: &self.span,
            badge = %badge_id,
            issuer = %request.issuer_email,
            issuer_created = resolution.created,
            "badge issued"
        );
        Ok(badge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obl_store::InMemoryLedger;
    use obl_types::{IssuerList, ISSUER_LIST_KEY};

    fn intro_course() -> IssueBadge {
        IssueBadge {
            issuer_email: "jane@acme.edu".into(),
            issuer_name: "Acme Univ".into(),
            issuer_url: "https://acme.edu".into(),
            badge_name: "Intro Course".into(),
            badge_description: "desc".into(),
            criteria: "criteria".into(),
            job_title: "Dean".into(),
            signature_name: "Jane Doe".into(),
        }
    }

    #[test]
    fn issue_creates_badge_issuer_and_summary() {
        let ledger = InMemoryLedger::new();
        let badge = BadgeService::new().issue(&ledger, &intro_course()).unwrap();

        assert_eq!(badge.id, "badge:introcourse");
        assert_eq!(badge.kind, "BadgeClass");
        assert_eq!(badge.issuer.id, "jane@acme.edu");
        assert_eq!(badge.criteria.narrative, "criteria");
        assert_eq!(badge.signature_lines.len(), 1);
        assert_eq!(badge.signature_lines[0].job_title, "Dean");
        assert_eq!(badge.signature_lines[0].name, "Jane Doe");

        let stored: Badge = ledger.get_record("badge:introcourse").unwrap().unwrap();
        assert_eq!(stored, badge);

        let list: IssuerList = ledger.get_record(ISSUER_LIST_KEY).unwrap().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.summaries[0].badge_ids, vec!["badge:introcourse"]);
    }

    #[test]
    fn same_slug_is_rejected() {
        let ledger = InMemoryLedger::new();
        let service = BadgeService::new();
        service.issue(&ledger, &intro_course()).unwrap();

        let mut again = intro_course();
        again.badge_name = "intro course".into();
        let err = service.issue(&ledger, &again).unwrap_err();
        assert_eq!(err, ContractError::already_exists("badge", "badge:introcourse"));
    }

    #[test]
    fn second_badge_appends_to_same_summary() {
        let ledger = InMemoryLedger::new();
        let service = BadgeService::new();
        service.issue(&ledger, &intro_course()).unwrap();

        let mut advanced = intro_course();
        advanced.badge_name = "Advanced Course".into();
        service.issue(&ledger, &advanced).unwrap();

        let list: IssuerList = ledger.get_record(ISSUER_LIST_KEY).unwrap().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.summaries[0].badge_ids,
            vec!["badge:introcourse", "badge:advancedcourse"]
        );
    }
}
