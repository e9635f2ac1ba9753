use crate::attributes::AttributeSource;
use crate::error::GateError;
use crate::stage::{GateContext, GateStage, StageDecision};

/// Email stage.
///
/// Reads the caller's email and records it as the authenticated issuer
/// identity. The email must be present and non-empty.
pub struct EmailStage {
    attribute: String,
}

impl EmailStage {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }
}

impl GateStage for EmailStage {
    fn name(&self) -> &str {
        "email"
    }

    fn evaluate(
        &self,
        attributes: &dyn AttributeSource,
        context: &mut GateContext,
    ) -> Result<StageDecision, GateError> {
        match attributes.attribute(&self.attribute)? {
            None => Ok(StageDecision::missing(format!(
                "caller does not have '{}' attribute",
                self.attribute
            ))),
            Some(email) if email.is_empty() => Ok(StageDecision::missing(format!(
                "caller '{}' attribute is empty",
                self.attribute
            ))),
            Some(email) => {
                context.issuer_email = Some(email);
                Ok(StageDecision::Pass)
            }
        }
    }
}
