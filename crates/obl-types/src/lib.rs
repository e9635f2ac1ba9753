//! Foundation types for the Open Badges Ledger (OBL).
//!
//! This crate provides the record shapes stored on the ledger and the key
//! scheme that places them in a single flat keyspace. Every other OBL crate
//! depends on `obl-types`.
//!
//! # Key Types
//!
//! - [`IssuerList`]: Singleton index of every issuer and the IDs it owns
//! - [`IssuerSummary`]: One issuer's entry in the list
//! - [`Issuer`]: Full issuer profile (Open Badges `Profile`)
//! - [`Badge`]: Credential template (Open Badges `BadgeClass`)
//! - [`Certificate`]: Issued credential (Open Badges `Assertion`)
//!
//! # Key Scheme
//!
//! | Record | Key |
//! |---|---|
//! | issuer list | `issuer-list` |
//! | issuer | `<email>` |
//! | badge | `badge:<slug>` |
//! | certificate | `cert:<recipient email>-<slug>` |

pub mod error;
pub mod issuer_list;
pub mod keys;
pub mod records;
mod serde_util;

pub use error::TypeError;
pub use issuer_list::{IssuerList, IssuerSummary};
pub use keys::{
    badge_key, badge_slug, certificate_key, is_reserved_key, BADGE_PREFIX, CERT_PREFIX,
    ISSUER_LIST_KEY,
};
pub use records::{
    Badge, Certificate, Criteria, Issuer, Recipient, RecipientProfile, SignatureLine, Verification,
    OPEN_BADGES_CONTEXT,
};
