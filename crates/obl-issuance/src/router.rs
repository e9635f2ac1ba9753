use obl_gate::{AccessGate, AttributeSource, GateConfig};
use obl_store::LedgerStore;

use crate::badge::{BadgeService, BADGE_ISSUED};
use crate::certificate::{CertificateService, CERTIFICATE_ISSUED};
use crate::error::ContractResult;
use crate::invocation::{Invocation, Response};
use crate::query::QueryService;
use crate::registry::IssuerRegistry;

/// Contract entry point: gate, parse, dispatch.
///
/// The router holds no ledger state. Every call reads and writes through the
/// store it is handed, normally a transaction opened by the
/// [`Executor`](crate::Executor).
#[derive(Debug)]
pub struct Router {
    gate: AccessGate,
    registry: IssuerRegistry,
    badges: BadgeService,
    certificates: CertificateService,
    query: QueryService,
    span: tracing::Span,
}

impl Router {
    pub fn new(config: GateConfig) -> Self {
        Self::with_gate(AccessGate::with_default_stages(config))
    }

    /// Use a custom gate pipeline.
    pub fn with_gate(gate: AccessGate) -> Self {
        Self {
            gate,
            registry: IssuerRegistry::new(),
            badges: BadgeService::new(),
            certificates: CertificateService::new(),
            query: QueryService::new(),
            span: tracing::info_span!("router"),
        }
    }

    /// Route every component's events under `span`.
    pub fn with_span(self, span: tracing::Span) -> Self {
        Self {
            gate: self.gate.with_span(span.clone()),
            registry: self.registry.with_span(span.clone()),
            badges: self.badges.with_span(span.clone()),
            certificates: self.certificates.with_span(span.clone()),
            query: self.query.with_span(span.clone()),
            span,
        }
    }

    /// Run one invocation against `store`.
    ///
    /// The gate runs before anything else, for every function name.
    pub fn invoke(
        &self,
        store: &dyn LedgerStore,
        attributes: &dyn AttributeSource,
        function: &str,
        args: &[String],
    ) -> ContractResult<Response> {
        let issuer = self.gate.admit(attributes)?;
        let invocation = Invocation::parse(function, args, &issuer)?;
        tracing::debug!(parent: &self.span, function, issuer = issuer.email(), "dispatching");
        self.dispatch(store, invocation)
    }

    /// Run an already-parsed invocation. The gate is NOT consulted.
    pub fn dispatch(
        &self,
        store: &dyn LedgerStore,
        invocation: Invocation,
    ) -> ContractResult<Response> {
        match invocation {
            Invocation::InitLedger => {
                self.registry.init_list(store)?;
                Ok(Response::Empty)
            }
            Invocation::IssueBadge(request) => {
                self.badges.issue(store, &request)?;
                Ok(Response::Message(BADGE_ISSUED.to_string()))
            }
            Invocation::IssueCertificate(request) => {
                self.certificates.issue(store, &request)?;
                Ok(Response::Message(CERTIFICATE_ISSUED.to_string()))
            }
            Invocation::GetCertificate { key } => {
                Ok(Response::Record(self.query.get(store, &key)?))
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}
