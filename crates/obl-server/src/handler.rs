use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use obl_issuance::{ContractError, Response as ContractResponse, FUNCTIONS};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `POST /v1/invoke`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "obl-server",
        "version": env!("CARGO_PKG_VERSION"),
        "functions": FUNCTIONS,
    }))
}

/// Run one contract invocation for the caller named by the request headers.
pub async fn invoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<InvokeRequest>,
) -> Result<Response, ApiError> {
    let attributes = state
        .identity
        .attributes(&headers)
        .await
        .map_err(ContractError::from)?;

    let executed = tokio::task::spawn_blocking(move || {
        state.invoke(&attributes, &request.function, &request.args)
    })
    .await
    .map_err(|err| ContractError::LedgerIo(format!("invocation task failed: {err}")))??;

    Ok(render(executed.response))
}

fn render(response: ContractResponse) -> Response {
    match response {
        ContractResponse::Empty => StatusCode::OK.into_response(),
        ContractResponse::Message(msg) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            msg,
        )
            .into_response(),
        ContractResponse::Record(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
    }
}
