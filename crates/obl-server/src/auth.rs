use async_trait::async_trait;
use axum::http::HeaderMap;
use obl_gate::{AttributeMap, GateConfig, GateError};

/// Turns an HTTP request's headers into the caller's attribute set.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn attributes(&self, headers: &HeaderMap) -> Result<AttributeMap, GateError>;
}

/// Reads role and email from headers set by an authenticating proxy.
///
/// The proxy must strip these headers from client requests; this provider
/// trusts whatever it receives.
#[derive(Clone, Debug)]
pub struct TrustedHeaderProvider {
    role_header: String,
    email_header: String,
    role_attribute: String,
    email_attribute: String,
}

impl TrustedHeaderProvider {
    pub fn new(
        role_header: impl Into<String>,
        email_header: impl Into<String>,
        gate: &GateConfig,
    ) -> Self {
        Self {
            role_header: role_header.into(),
            email_header: email_header.into(),
            role_attribute: gate.role_attribute.clone(),
            email_attribute: gate.email_attribute.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for TrustedHeaderProvider {
    async fn attributes(&self, headers: &HeaderMap) -> Result<AttributeMap, GateError> {
        let mut attrs = AttributeMap::new();
        for (header, attribute) in [
            (&self.role_header, &self.role_attribute),
            (&self.email_header, &self.email_attribute),
        ] {
            if let Some(value) = headers.get(header.as_str()) {
                let value = value
                    .to_str()
                    .map_err(|_| GateError::provider(attribute, "header is not valid UTF-8"))?;
                attrs.insert(attribute, value);
            }
        }
        Ok(attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn provider() -> TrustedHeaderProvider {
        TrustedHeaderProvider::new("x-obl-role", "x-obl-email", &GateConfig::default())
    }

    #[tokio::test]
    async fn headers_become_attributes() {
        let mut headers = HeaderMap::new();
        headers.insert("x-obl-role", HeaderValue::from_static("university"));
        headers.insert("x-obl-email", HeaderValue::from_static("jane@acme.edu"));
        let attrs = provider().attributes(&headers).await.unwrap();
        assert_eq!(attrs, AttributeMap::university("jane@acme.edu"));
    }

    #[tokio::test]
    async fn absent_headers_are_absent_attributes() {
        let attrs = provider().attributes(&HeaderMap::new()).await.unwrap();
        assert!(attrs.is_empty());
    }

    #[tokio::test]
    async fn non_utf8_header_is_provider_error() {
        let mut headers = HeaderMap::new();
        headers.insert("x-obl-email", HeaderValue::from_bytes(b"\xffjane").unwrap());
        let err = provider().attributes(&headers).await.unwrap_err();
        assert!(matches!(err, GateError::Provider { .. }));
    }
}
