//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use common::{
    protocol::{AccountResponse, ErrorResponse, HealthResponse},
    ServiceError,
};
use serde_json::Value;
use tracing::{debug, info};

use super::{error::ApiError, state::AppState};
use crate::accounts::{validate::INVALID_SCHEMA, AccountInput};

type AccountResult = Result<(StatusCode, Json<AccountResponse>), ApiError>;

/// `GET {base}`: every account, passwords stripped.
pub async fn list_accounts(State(state): State<AppState>) -> AccountResult {
    respond(state.accounts.list().await?)
}

/// `GET {base}/:account_id`: one account, password stripped.
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> AccountResult {
    respond(state.accounts.get(&account_id).await?)
}

/// `POST {base}/:account_id`: create an account.
pub async fn create_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AccountResult {
    let input = parse_body(body)?;
    respond(state.accounts.create(&account_id, input).await?)
}

/// `PUT {base}/:account_id`: replace an existing account.
pub async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AccountResult {
    let input = parse_body(body)?;
    respond(state.accounts.update(&account_id, input).await?)
}

/// `DELETE {base}/:account_id`: remove an account.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> AccountResult {
    respond(state.accounts.delete(&account_id).await?)
}

/// `GET /health`: liveness check.
///
/// Always `200 OK` while the process serves requests; the body reports
/// whether create/update can encrypt and whether the API document loaded.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        data_key_configured: state.accounts.encryption_ready(),
        api_docs_loaded: state.api_docs.is_some(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(404, "Invalid Request")),
    )
}

fn parse_body(body: Result<Json<Value>, JsonRejection>) -> Result<AccountInput, ServiceError> {
    let Json(value) = body.map_err(|rejection| {
        debug!(error = %rejection, "unreadable request body");
        ServiceError::bad_request(INVALID_SCHEMA)
    })?;
    AccountInput::from_json(&value)
}

fn respond(resp: AccountResponse) -> AccountResult {
    let status = StatusCode::from_u16(resp.status_code).unwrap_or(StatusCode::OK);
    info!(
        status = resp.status_code,
        message = resp.message.as_deref().unwrap_or_default(),
        "request completed"
    );
    Ok((status, Json(resp)))
}
