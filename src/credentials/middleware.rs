use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use super::types::SessionClaims;
use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates Authorization Bearer header and adds SessionClaims to request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), credentials::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<SessionClaims>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    info!("JWT authentication middleware triggered for request {}", req.uri());

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let claims = match state.token_issuer.validate(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(AppError::Unauthorized(
                "Invalid or expired token".to_string(),
            ));
        }
    };

    info!(
        phone_number = %claims.subject(),
        "Authentication successful, adding claims to request"
    );

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Rejects requests whose token was issued to a different account than the one addressed
pub fn require_subject(claims: &SessionClaims, phone_number: &str) -> Result<(), AppError> {
    if claims.subject() == phone_number {
        return Ok(());
    }

    warn!(
        token_subject = %claims.subject(),
        requested = %phone_number,
        "Token subject does not match requested account"
    );
    Err(AppError::Forbidden(
        "Token does not grant access to this account".to_string(),
    ))
}
