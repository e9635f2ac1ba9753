//! Access gate for the Open Badges Ledger.
//!
//! Every contract invocation passes through the gate before it touches the
//! ledger. The gate runs a pipeline of stages over the caller's verified
//! attributes (role check, then email extraction) and either admits the
//! caller as an [`AuthenticatedIssuer`] or denies with a reason.
//!
//! # Quick Start
//!
//! ```rust
//! use obl_gate::{AccessGate, AttributeMap, GateConfig};
//!
//! let gate = AccessGate::with_default_stages(GateConfig::default());
//! let issuer = gate.admit(&AttributeMap::university("dean@acme.edu")).unwrap();
//! assert_eq!(issuer.email(), "dean@acme.edu");
//! ```

pub mod attributes;
pub mod config;
pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

pub use attributes::{AttributeMap, AttributeSource};
pub use config::GateConfig;
pub use error::GateError;
pub use gate::{AccessGate, AuthenticatedIssuer, GateDecision, GateResult};
pub use stage::{DenialKind, GateContext, GateStage, StageDecision, StageResult};
pub use stages::{EmailStage, RoleStage};
