use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use obl_gate::GateConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Ledger snapshot, loaded at start and re-saved after each write.
    pub state_file: Option<PathBuf>,
    /// Header carrying the caller's role, set by the authenticating proxy.
    pub role_header: String,
    /// Header carrying the caller's email, set by the authenticating proxy.
    pub email_header: String,
    pub gate: GateConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 7054)),
            state_file: None,
            role_header: "x-obl-role".into(),
            email_header: "x-obl-email".into(),
            gate: GateConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ServerResult<()> {
        self.gate
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        for (field, value) in [
            ("role_header", &self.role_header),
            ("email_header", &self.email_header),
        ] {
            if axum::http::HeaderName::from_bytes(value.as_bytes()).is_err() {
                return Err(ServerError::Config(format!(
                    "{field} '{value}' is not a valid header name"
                )));
            }
        }
        Ok(())
    }
}
