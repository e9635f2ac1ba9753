use std::time::{Duration, Instant};

use crate::attributes::AttributeSource;
use crate::config::GateConfig;
use crate::error::GateError;
use crate::stage::{DenialKind, GateContext, GateStage, StageDecision, StageResult};
use crate::stages::{EmailStage, RoleStage};

// ---------------------------------------------------------------------------
// AuthenticatedIssuer
// ---------------------------------------------------------------------------

/// A caller that passed the gate. Its email is the issuer identity used by
/// every write the invocation performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedIssuer {
    email: String,
}

impl AuthenticatedIssuer {
    pub fn email(&self) -> &str {
        &self.email
    }
}

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

/// Final verdict of the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Admitted(AuthenticatedIssuer),
    Denied { kind: DenialKind, reason: String },
}

/// Verdict plus the audit trail of the stages that ran.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub decision: GateDecision,
    pub stage_results: Vec<StageResult>,
    pub elapsed: Duration,
}

impl GateResult {
    pub fn is_admitted(&self) -> bool {
        matches!(self.decision, GateDecision::Admitted(_))
    }

    /// Convert the verdict into the admitted issuer or the matching error.
    pub fn into_issuer(self) -> Result<AuthenticatedIssuer, GateError> {
        match self.decision {
            GateDecision::Admitted(issuer) => Ok(issuer),
            GateDecision::Denied {
                kind: DenialKind::Authorization,
                reason,
            } => Err(GateError::Authorization(reason)),
            GateDecision::Denied {
                kind: DenialKind::AttributeMissing,
                reason,
            } => Err(GateError::AttributeMissing(reason)),
        }
    }
}

// ---------------------------------------------------------------------------
// AccessGate
// ---------------------------------------------------------------------------

/// The access gate: a pipeline of stages every invocation passes through
/// before any ledger read or write.
pub struct AccessGate {
    stages: Vec<Box<dyn GateStage>>,
    config: GateConfig,
    span: tracing::Span,
}

impl AccessGate {
    /// A gate with no stages. Use [`AccessGate::with_default_stages`] for the
    /// role and email checks.
    pub fn new(config: GateConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
            span: tracing::info_span!("access_gate"),
        }
    }

    /// Emit this gate's events under `span` instead of the default.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Role check first, then the issuer email.
    pub fn with_default_stages(config: GateConfig) -> Self {
        let mut gate = Self::new(config);
        let role = RoleStage::new(&gate.config.role_attribute, &gate.config.required_role);
        let email = EmailStage::new(&gate.config.email_attribute);
        gate.add_stage(Box::new(role));
        gate.add_stage(Box::new(email));
        gate
    }

    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Run the caller's attributes through every stage in order.
    ///
    /// Stops at the first denial. Admission also requires that some stage
    /// recorded the issuer email in the context.
    pub fn evaluate(&self, attributes: &dyn AttributeSource) -> Result<GateResult, GateError> {
        let started = Instant::now();
        let mut context = GateContext::default();
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let t0 = Instant::now();
            let decision = stage.evaluate(attributes, &mut context)?;

            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: decision.is_pass(),
                reason: match &decision {
                    StageDecision::Pass => None,
                    StageDecision::Deny { reason, .. } => Some(reason.clone()),
                },
                elapsed: t0.elapsed(),
            };
            stage_results.push(result.clone());
            context.previous_stages.push(result);

            if let StageDecision::Deny { kind, reason } = decision {
                tracing::info!(
                    parent: &self.span,
                    stage = stage.name(),
                    ?kind,
                    %reason,
                    "caller denied"
                );
                return Ok(GateResult {
                    decision: GateDecision::Denied { kind, reason },
                    stage_results,
                    elapsed: started.elapsed(),
                });
            }
        }

        let decision = match context.issuer_email {
            Some(email) => {
                tracing::debug!(parent: &self.span, issuer = %email, "caller admitted");
                GateDecision::Admitted(AuthenticatedIssuer { email })
            }
            None => GateDecision::Denied {
                kind: DenialKind::AttributeMissing,
                reason: format!(
                    "caller does not have '{}' attribute",
                    self.config.email_attribute
                ),
            },
        };

        Ok(GateResult {
            decision,
            stage_results,
            elapsed: started.elapsed(),
        })
    }

    /// Evaluate and return the admitted issuer, or the denial as an error.
    pub fn admit(
        &self,
        attributes: &dyn AttributeSource,
    ) -> Result<AuthenticatedIssuer, GateError> {
        self.evaluate(attributes)?.into_issuer()
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field(
                "stages",
                &self.stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}
