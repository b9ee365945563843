use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::AccountService,
    types::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest},
};
use crate::credentials::{require_subject, SessionClaims};
use crate::shared::{AppError, AppState};

fn account_service(state: &AppState) -> AccountService {
    AccountService::new(
        Arc::clone(&state.account_repository),
        Arc::clone(&state.notifier),
        Arc::clone(&state.token_issuer),
    )
}

/// HTTP handler for registering a new account
///
/// POST /api/users/register
/// Returns the created account without its credential
#[instrument(name = "register", skip(state, request), fields(phone_number = %request.phone_number))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    info!("Registering new account");

    let account = account_service(&state).register(request).await?;

    Ok(Json(account.into()))
}

/// HTTP handler for password login
///
/// POST /api/users/login
/// Returns a bearer token valid for the configured session lifetime
#[instrument(name = "login", skip(state, request), fields(phone_number = %request.phone_number))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = account_service(&state)
        .login(&request.phone_number, &request.password)
        .await?;

    info!(token_length = token.len(), "Issued session token");
    Ok(Json(LoginResponse { token }))
}

/// GET /api/users/:phone_number
#[instrument(name = "get_account", skip(state, claims))]
pub async fn get_account(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Path(phone_number): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    require_subject(&claims, &phone_number)?;

    let account = account_service(&state).get_account(&phone_number).await?;

    Ok(Json(account.into()))
}
