//! Badge and certificate issuance contract for the Open Badges Ledger.
//!
//! This crate is the contract itself. It provides:
//! - `IssuerRegistry`: issuer resolution and the issuer list
//! - `BadgeService` / `CertificateService`: create-once issuance with
//!   ownership and uniqueness checks
//! - `QueryService`: raw point lookups
//! - `Router`: access gate, argument parsing, dispatch
//! - `Executor`: one ledger transaction per invocation
//! - `ContractError`: the flat error taxonomy and its wire payload
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use obl_gate::AttributeMap;
//! use obl_issuance::{Executor, Router};
//! use obl_store::InMemoryLedger;
//!
//! let exec = Executor::new(Arc::new(InMemoryLedger::new()), Router::default());
//! let jane = AttributeMap::university("jane@acme.edu");
//! exec.invoke(&jane, "initLedger", &[]).unwrap();
//! ```

pub mod badge;
pub mod certificate;
pub mod error;
pub mod executor;
pub mod invocation;
pub mod query;
pub mod registry;
pub mod router;

pub use badge::{BadgeService, IssueBadge, BADGE_ISSUED};
pub use certificate::{CertificateService, IssueCertificate, CERTIFICATE_ISSUED};
pub use error::{ContractError, ContractResult, ErrorPayload};
pub use executor::{Executed, Executor};
pub use invocation::{
    Invocation, Response, FUNCTIONS, GET_CERTIFICATE, INIT_LEDGER, ISSUE_BADGE, ISSUE_CERTIFICATE,
};
pub use query::QueryService;
pub use registry::{IssuerRegistry, Resolution};
pub use router::Router;
