//! HTTP server for the Open Badges Ledger.
//!
//! Exposes the issuance contract as a JSON API. Caller identity comes from
//! headers set by an authenticating proxy; every invocation runs in its own
//! ledger transaction and the ledger snapshot is re-saved after each write.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{IdentityProvider, TrustedHeaderProvider};
pub use config::ServerConfig;
pub use error::{status_for, ApiError, ServerError, ServerResult};
pub use handler::InvokeRequest;
pub use router::build_router;
pub use server::OblServer;
pub use state::AppState;
