use obl_store::{LedgerStore, RecordAccess};
use obl_types::{
    badge_key, certificate_key, Badge, Certificate, Recipient, RecipientProfile, Verification,
};

use crate::error::{ContractError, ContractResult};
use crate::registry::IssuerRegistry;

/// Status message returned by a successful certificate issuance.
pub const CERTIFICATE_ISSUED: &str =
    "Successfully updated blockchain: CREATED Certificate and UPDATED issuerList";

/// Arguments of `issueCertificate`, with the authenticated issuer email in
/// front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssueCertificate {
    pub issuer_email: String,
    pub issued_on: String,
    pub recipient_email: String,
    pub recipient_name: String,
    pub recipient_public_key: String,
    pub location: String,
    /// Badge slug, without the `badge:` prefix.
    pub badge_key: String,
}

/// Issues certificates against existing badges.
#[derive(Debug)]
pub struct CertificateService {
    registry: IssuerRegistry,
    span: tracing::Span,
}

impl Default for CertificateService {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateService {
    pub fn new() -> Self {
        let span = tracing::info_span!("certificate_service");
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

    /// Issue a certificate for a badge owned by `request.issuer_email`.
    pub fn issue(
        &self,
        store: &dyn LedgerStore,
        request: &IssueCertificate,
    ) -> ContractResult<Certificate> {
        let badge_id = badge_key(&request.badge_key);
        let Some(badge) = store.get_record::<Badge>(&badge_id)? else {
            tracing::warn!(parent: &self.span, badge = %badge_id, "badge doesn't exist, aborting");
            return Err(ContractError::not_found("badge", badge_id));
        };

        if !badge.is_owned_by(&request.issuer_email) {
            tracing::warn!(
                parent: &self.span,
                badge = %badge_id,
                issuer = %request.issuer_email,
                "badge not owned by caller"
            );
            return Err(ContractError::Ownership {
                badge: badge_id,
                issuer: request.issuer_email.clone(),
            });
        }

        let cert_id = certificate_key(&request.recipient_email, &request.badge_key);
        if store.get_record::<Certificate>(&cert_id)?.is_some() {
            tracing::warn!(
                parent: &self.span,
                certificate = %cert_id,
                "certificate exists, aborting"
            );
            return Err(ContractError::already_exists("certificate", cert_id));
        }

        let certificate = Certificate::new(
            &cert_id,
            &request.issued_on,
            Recipient::email(&request.recipient_email),
            RecipientProfile::new(&request.recipient_public_key, &request.recipient_name),
            Verification::merkle_proof(&request.location),
            badge,
        );
        store.put_record(&cert_id, &certificate)?;

        // The badge snapshot already names the owner; the list is checked again.
        let mut list = self.registry.load_list(store)?;
        let Some(index) = list.position(&request.issuer_email) else {
            tracing::warn!(
                parent: &self.span,
                issuer = %request.issuer_email,
                "issuer doesn't exist"
            );
            return Err(ContractError::not_found("issuer", request.issuer_email.clone()));
        };
        list.append_cert_id(index, cert_id.as_str())?;
        self.registry.persist_list(store, &list)?;

        tracing::info!(
            parent: &self.span,
            certificate = %cert_id,
            issuer = %request.issuer_email,
            "certificate issued"
        );
        Ok(certificate)
    }
}
