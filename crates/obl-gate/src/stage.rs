use std::time::Duration;

use crate::attributes::AttributeSource;
use crate::error::GateError;

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// Why a stage turned the caller away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenialKind {
    /// The caller's role does not permit the invocation.
    Authorization,
    /// A required attribute is absent or empty.
    AttributeMissing,
}

/// What one stage concluded about the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    Pass,
    Deny { kind: DenialKind, reason: String },
}

impl StageDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Deny {
            kind: DenialKind::Authorization,
            reason: reason.into(),
        }
    }

    pub fn missing(reason: impl Into<String>) -> Self {
        Self::Deny {
            kind: DenialKind::AttributeMissing,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Audit record for one stage of an evaluation.
#[derive(Clone, Debug)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    /// Denial reason; `None` when the stage passed.
    pub reason: Option<String>,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// State shared by the stages of one evaluation.
#[derive(Debug, Default)]
pub struct GateContext {
    /// Caller email, once a stage has established it.
    pub issuer_email: Option<String>,
    /// Stages evaluated so far, in order.
    pub previous_stages: Vec<StageResult>,
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// One check in the access gate.
///
/// Stages run in pipeline order. A stage reads the caller's attributes, may
/// record what it established in the shared context, and passes or denies.
/// An `Err` means the stage could not decide (e.g. the provider failed).
pub trait GateStage: Send + Sync {
    /// Short stage name used in results and logs.
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        attributes: &dyn AttributeSource,
        context: &mut GateContext,
    ) -> Result<StageDecision, GateError>;
}
