use crate::attributes::AttributeSource;
use crate::error::GateError;
use crate::stage::{GateContext, GateStage, StageDecision};

/// Role check stage.
///
/// The caller must carry the role attribute with exactly the required
/// value. Comparison is case-sensitive.
pub struct RoleStage {
    attribute: String,
    required: String,
}

impl RoleStage {
    pub fn new(attribute: impl Into<String>, required: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            required: required.into(),
        }
    }
}

impl GateStage for RoleStage {
    fn name(&self) -> &str {
        "role"
    }

    fn evaluate(
        &self,
        attributes: &dyn AttributeSource,
        _context: &mut GateContext,
    ) -> Result<StageDecision, GateError> {
        let Some(role) = attributes.attribute(&self.attribute)? else {
            return Ok(StageDecision::unauthorized(format!(
                "caller does not have '{}' attribute",
                self.attribute
            )));
        };

        if role != self.required {
            return Ok(StageDecision::unauthorized(format!(
                "caller '{}' is not equal to '{}'",
                self.attribute, self.required
            )));
        }

        Ok(StageDecision::Pass)
    }
}
