/// Errors raised while admitting a caller.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The caller's role does not permit the invocation.
    #[error("authorization denied: {0}")]
    Authorization(String),

    /// A required identity attribute is absent or empty.
    #[error("attribute missing: {0}")]
    AttributeMissing(String),

    /// The identity provider failed to answer.
    #[error("attribute provider failed reading '{attribute}': {reason}")]
    Provider { attribute: String, reason: String },

    #[error("invalid gate configuration: {0}")]
    Config(String),
}

impl GateError {
    /// Create a provider error for `attribute`.
    pub fn provider(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Provider {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}

impl PartialEq for GateError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for GateError {}
