use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::records::Issuer;
use crate::serde_util::null_as_default;

/// One issuer's entry in the [`IssuerList`].
///
/// Summaries only ever grow: IDs are appended, never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerSummary {
    #[serde(rename = "issuerEmail")]
    pub email: String,
    #[serde(rename = "badgeIDs", default, deserialize_with = "null_as_default")]
    pub badge_ids: Vec<String>,
    #[serde(rename = "certIDs", default, deserialize_with = "null_as_default")]
    pub cert_ids: Vec<String>,
}

impl IssuerSummary {
    /// An empty summary for a newly created issuer.
    pub fn for_issuer(issuer: &Issuer) -> Self {
        Self {
            email: issuer.email.clone(),
            badge_ids: Vec::new(),
            cert_ids: Vec::new(),
        }
    }
}

/// Singleton index of every issuer, in creation order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerList {
    #[serde(rename = "issuers", default, deserialize_with = "null_as_default")]
    pub summaries: Vec<IssuerSummary>,
}

impl IssuerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Index of the summary for `email`.
    ///
    /// Emails are expected to be unique. Should duplicates ever appear, the
    /// earliest entry wins, so lookups stay stable as the list grows.
    pub fn position(&self, email: &str) -> Option<usize> {
        self.summaries.iter().position(|s| s.email == email)
    }

    pub fn get(&self, index: usize) -> Option<&IssuerSummary> {
        self.summaries.get(index)
    }

    /// Append a summary and return its index.
    pub fn push(&mut self, summary: IssuerSummary) -> usize {
        self.summaries.push(summary);
        self.summaries.len() - 1
    }

    /// Append a badge ID to the summary at `index`.
    pub fn append_badge_id(
        &mut self,
        index: usize,
        id: impl Into<String>,
    ) -> Result<(), TypeError> {
        self.summary_mut(index)?.badge_ids.push(id.into());
        Ok(())
    }

    /// Append a certificate ID to the summary at `index`.
    pub fn append_cert_id(&mut self, index: usize, id: impl Into<String>) -> Result<(), TypeError> {
        self.summary_mut(index)?.cert_ids.push(id.into());
        Ok(())
    }

    fn summary_mut(&mut self, index: usize) -> Result<&mut IssuerSummary, TypeError> {
        let len = self.summaries.len();
        self.summaries
            .get_mut(index)
            .ok_or(TypeError::SummaryIndexOutOfRange { index, len })
    }
}
