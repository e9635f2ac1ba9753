use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// Configuration for the access gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Attribute holding the caller's role.
    pub role_attribute: String,
    /// Role value required for every invocation (compared case-sensitively).
    pub required_role: String,
    /// Attribute holding the caller's email, used as the issuer identity.
    pub email_attribute: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            role_attribute: "role".into(),
            required_role: "university".into(),
            email_attribute: "email".into(),
        }
    }
}

impl GateConfig {
    /// Reject configurations with blank attribute names or role.
    pub fn validate(&self) -> Result<(), GateError> {
        for (field, value) in [
            ("role_attribute", &self.role_attribute),
            ("required_role", &self.required_role),
            ("email_attribute", &self.email_attribute),
        ] {
            if value.trim().is_empty() {
                return Err(GateError::Config(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = GateConfig::default();
        assert_eq!(c.role_attribute, "role");
        assert_eq!(c.required_role, "university");
        assert_eq!(c.email_attribute, "email");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn blank_field_is_invalid() {
        let c = GateConfig {
            required_role: " ".into(),
            ..Default::default()
        };
        assert_eq!(
            c.validate().unwrap_err(),
            GateError::Config("required_role must not be empty".into())
        );
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c: GateConfig = toml::from_str(r#"required_role = "registrar""#).unwrap();
        assert_eq!(c.required_role, "registrar");
        assert_eq!(c.email_attribute, "email");
    }
}
