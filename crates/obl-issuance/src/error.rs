use obl_gate::GateError;
use obl_store::StoreError;
use obl_types::TypeError;
use serde::{Deserialize, Serialize};

/// Errors produced by contract invocations.
///
/// Every variant is surfaced verbatim to the caller and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("authorization denied: {0}")]
    Authorization(String),

    #[error("attribute missing: {0}")]
    AttributeMissing(String),

    #[error("attribute provider failed: {0}")]
    AttributeProvider(String),

    #[error("incorrect number of arguments for '{function}': expecting {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("unknown action '{0}', must be one of 'initLedger', 'issueBadge', 'issueCertificate' or 'getCertificate'")]
    UnknownAction(String),

    #[error("{record} '{key}' does not exist")]
    NotFound { record: &'static str, key: String },

    #[error("{record} '{key}' already exists")]
    AlreadyExists { record: &'static str, key: String },

    #[error("'{0}' is a reserved ledger key and cannot identify an issuer")]
    ReservedKey(String),

    #[error("badge '{badge}' is not owned by '{issuer}'")]
    Ownership { badge: String, issuer: String },

    #[error("inconsistent ledger state: {0}")]
    InconsistentState(String),

    #[error("marshal error: {0}")]
    Marshal(String),

    #[error("ledger I/O error: {0}")]
    LedgerIo(String),

    #[error("transaction conflict: {0}")]
    Conflict(String),
}

impl ContractError {
    pub fn not_found(record: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            record,
            key: key.into(),
        }
    }

    pub(crate) fn already_exists(record: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            record,
            key: key.into(),
        }
    }

    /// Stable machine-readable code for this error class.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authorization(_) => "AUTHORIZATION",
            Self::AttributeMissing(_) => "ATTRIBUTE_MISSING",
            Self::AttributeProvider(_) => "ATTRIBUTE_PROVIDER",
            Self::ArgumentCount { .. } => "ARGUMENT_COUNT",
            Self::UnknownAction(_) => "UNKNOWN_ACTION",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::ReservedKey(_) => "RESERVED_KEY",
            Self::Ownership { .. } => "OWNERSHIP",
            Self::InconsistentState(_) => "INCONSISTENT_STATE",
            Self::Marshal(_) => "MARSHAL",
            Self::LedgerIo(_) => "LEDGER_IO",
            Self::Conflict(_) => "CONFLICT",
        }
    }

    /// The unified failure payload for this error.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<StoreError> for ContractError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Marshal { .. } | StoreError::Decode { .. } => {
                Self::Marshal(err.to_string())
            }
            StoreError::Conflict { .. } => Self::Conflict(err.to_string()),
            StoreError::Io { .. } | StoreError::CorruptSnapshot(_) | StoreError::SnapshotIo(_) => {
                Self::LedgerIo(err.to_string())
            }
        }
    }
}

impl From<GateError> for ContractError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Authorization(reason) => Self::Authorization(reason),
            GateError::AttributeMissing(reason) => Self::AttributeMissing(reason),
            GateError::Provider { .. } | GateError::Config(_) => {
                Self::AttributeProvider(err.to_string())
            }
        }
    }
}

impl From<TypeError> for ContractError {
    fn from(err: TypeError) -> Self {
        Self::InconsistentState(err.to_string())
    }
}

/// Result alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

/// The single failure shape reported by every surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

impl ErrorPayload {
    pub fn to_json(&self) -> String {
        serde_json::json!({ "code": self.code, "message": self.message }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_contract_classes() {
        let decode = StoreError::Decode {
            key: "badge:x".into(),
            reason: "eof".into(),
        };
        assert_eq!(ContractError::from(decode).code(), "MARSHAL");

        let conflict = StoreError::Conflict {
            key: "issuer-list".into(),
            read: Some(1),
            current: Some(2),
        };
        assert_eq!(ContractError::from(conflict).code(), "CONFLICT");

        let io = StoreError::Io {
            key: "k".into(),
            reason: "disk".into(),
        };
        assert_eq!(ContractError::from(io).code(), "LEDGER_IO");
    }

    #[test]
    fn gate_errors_keep_their_reason() {
        let err = ContractError::from(GateError::Authorization("no role".into()));
        assert_eq!(err, ContractError::Authorization("no role".into()));

        let err = ContractError::from(GateError::provider("email", "timeout"));
        assert_eq!(err.code(), "ATTRIBUTE_PROVIDER");
    }

    #[test]
    fn type_errors_are_inconsistent_state() {
        let err = ContractError::from(TypeError::SummaryIndexOutOfRange { index: 3, len: 1 });
        assert_eq!(err.code(), "INCONSISTENT_STATE");
    }

    #[test]
    fn payload_json_shape() {
        let err = ContractError::not_found("record", "doesnotexist");
        let json: serde_json::Value = serde_json::from_str(&err.to_payload().to_json()).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "record 'doesnotexist' does not exist");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
