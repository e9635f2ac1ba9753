use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use obl_gate::AttributeSource;
use obl_issuance::{ContractError, Executed, Executor, Router};
use obl_store::{InMemoryLedger, StoreError};

use crate::auth::{IdentityProvider, TrustedHeaderProvider};
use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<Executor>,
    pub identity: Arc<dyn IdentityProvider>,
    state_file: Option<PathBuf>,
    save_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(executor: Executor, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            executor: Arc::new(executor),
            identity,
            state_file: None,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Persist the ledger to `path` after every write.
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = Some(path.into());
        self
    }

    /// Build the state described by `config`, loading the snapshot if one
    /// is configured and present.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        config.validate()?;
        let ledger = match &config.state_file {
            Some(path) => InMemoryLedger::load_or_default(path)?,
            None => InMemoryLedger::new(),
        };
        tracing::info!(height = ledger.height()?, keys = ledger.len(), "ledger loaded");

        let executor = Executor::new(Arc::new(ledger), Router::new(config.gate.clone()));
        let identity = TrustedHeaderProvider::new(
            &config.role_header,
            &config.email_header,
            &config.gate,
        );
        let state = Self::new(executor, Arc::new(identity));
        Ok(match &config.state_file {
            Some(path) => state.with_state_file(path),
            None => state,
        })
    }

    pub fn state_file(&self) -> Option<&PathBuf> {
        self.state_file.as_ref()
    }

    /// Run one invocation and save the ledger if it wrote anything.
    ///
    /// Blocks on the ledger and the file system; call it off the async
    /// workers. The commit is final once it succeeds, so a failed save is
    /// logged and the invocation still reports success. The next successful
    /// save writes the full image again.
    pub fn invoke(
        &self,
        attributes: &dyn AttributeSource,
        function: &str,
        args: &[String],
    ) -> Result<Executed, ContractError> {
        let executed = self.executor.invoke(attributes, function, args)?;
        if executed.changed() {
            if let Err(err) = self.persist() {
                tracing::error!(
                    function,
                    height = executed.receipt.height,
                    %err,
                    "committed invocation not saved to state file"
                );
            }
        }
        Ok(executed)
    }

    /// Write the current ledger image to the state file, if any.
    ///
    /// Saves are serialized so a newer image is never overwritten by an
    /// older one.
    pub fn persist(&self) -> Result<(), ContractError> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        let _guard = self
            .save_lock
            .lock()
            .map_err(|_| StoreError::Io {
                key: path.display().to_string(),
                reason: "save lock poisoned".into(),
            })?;
        self.executor.ledger().save(path)?;
        Ok(())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("executor", &self.executor)
            .field("state_file", &self.state_file)
            .finish()
    }
}
