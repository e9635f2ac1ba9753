use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// The caller's verified attribute set, as supplied by the identity
/// provider.
pub trait AttributeSource: Send + Sync {
    /// Look up one attribute.
    ///
    /// Returns `Ok(None)` when the caller does not possess the attribute and
    /// `Err` only when the provider itself fails.
    fn attribute(&self, name: &str) -> Result<Option<String>, GateError>;
}

/// A fixed attribute set, for tests and local tooling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMap(BTreeMap<String, String>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes of a university caller with the given email.
    pub fn university(email: impl Into<String>) -> Self {
        Self::new().with("role", "university").with("email", email)
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl AttributeSource for AttributeMap {
    fn attribute(&self, name: &str) -> Result<Option<String>, GateError> {
        Ok(self.0.get(name).cloned())
    }
}
