use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use obl_issuance::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] obl_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A contract failure rendered as the unified error payload.
#[derive(Debug)]
pub struct ApiError(pub ContractError);

impl From<ContractError> for ApiError {
    fn from(err: ContractError) -> Self {
        Self(err)
    }
}

/// HTTP status for each error class.
pub fn status_for(err: &ContractError) -> StatusCode {
    match err {
        ContractError::Authorization(_)
        | ContractError::Ownership { .. }
        | ContractError::ReservedKey(_) => StatusCode::FORBIDDEN,
        ContractError::AttributeMissing(_) => StatusCode::UNAUTHORIZED,
        ContractError::ArgumentCount { .. } | ContractError::UnknownAction(_) => {
            StatusCode::BAD_REQUEST
        }
        ContractError::NotFound { .. } => StatusCode::NOT_FOUND,
        ContractError::AlreadyExists { .. } | ContractError::Conflict(_) => StatusCode::CONFLICT,
        ContractError::AttributeProvider(_)
        | ContractError::InconsistentState(_)
        | ContractError::Marshal(_)
        | ContractError::LedgerIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (status_for(&self.0), axum::Json(self.0.to_payload())).into_response()
    }
}
