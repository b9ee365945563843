use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::account::repository::AccountRepository;
use crate::car::repository::CarRepository;
use crate::credentials::{CredentialError, SessionTokenIssuer};
use crate::favorite::repository::FavoriteRepository;
use crate::notify::RegistrationNotifier;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub account_repository: Arc<dyn AccountRepository + Send + Sync>,
    pub car_repository: Arc<dyn CarRepository + Send + Sync>,
    pub favorite_repository: Arc<dyn FavoriteRepository + Send + Sync>,
    pub notifier: Arc<dyn RegistrationNotifier>,
    pub token_issuer: Arc<SessionTokenIssuer>,
}

impl AppState {
    pub fn new(
        account_repository: Arc<dyn AccountRepository + Send + Sync>,
        car_repository: Arc<dyn CarRepository + Send + Sync>,
        favorite_repository: Arc<dyn FavoriteRepository + Send + Sync>,
        notifier: Arc<dyn RegistrationNotifier>,
        token_issuer: Arc<SessionTokenIssuer>,
    ) -> Self {
        Self {
            account_repository,
            car_repository,
            favorite_repository,
            notifier,
            token_issuer,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Car not found")]
    CarNotFound,

    #[error("Car not found in favorites")]
    FavoriteNotFound,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Corrupt credential: {0}")]
    CorruptCredential(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Outcomes a caller is expected to handle, as opposed to internal failures
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AppError::AccountAlreadyExists(_)
                | AppError::UserNotFound
                | AppError::WrongPassword
                | AppError::CarNotFound
                | AppError::FavoriteNotFound
                | AppError::Unauthorized(_)
                | AppError::Forbidden(_)
        )
    }
}

impl From<CredentialError> for AppError {
    fn from(error: CredentialError) -> Self {
        AppError::CorruptCredential(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if !self.is_expected() {
            error!(error = %self, "Request failed with internal error");
        }

        let (status, error_message) = match self {
            AppError::AccountAlreadyExists(_) => {
                (StatusCode::CONFLICT, "User already exists".to_string())
            }
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AppError::WrongPassword => (StatusCode::UNAUTHORIZED, "Wrong password".to_string()),
            AppError::CarNotFound => (StatusCode::NOT_FOUND, "Car not found".to_string()),
            AppError::FavoriteNotFound => (
                StatusCode::NOT_FOUND,
                "Car not found in favorites".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::TokenError(_)
            | AppError::CorruptCredential(_)
            | AppError::DatabaseError(_)
            | AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_expected_errors_keep_their_reason() {
        let (status, body) = render(AppError::AccountAlreadyExists("+1555".to_string())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "User already exists");

        let (status, body) = render(AppError::FavoriteNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Car not found in favorites");

        let (status, _) = render(AppError::WrongPassword).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_internal_errors_are_opaque() {
        for error in [
            AppError::DatabaseError("connection refused at 10.0.0.3:5432".to_string()),
            AppError::CorruptCredential("stored password salt is 3 bytes".to_string()),
            AppError::TokenError("InvalidKeyFormat".to_string()),
            AppError::Internal,
        ] {
            let (status, body) = render(error).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({ "error": "Internal server error" }));
        }
    }

    #[test]
    fn test_expected_classification() {
        assert!(AppError::UserNotFound.is_expected());
        assert!(AppError::WrongPassword.is_expected());
        assert!(!AppError::DatabaseError("boom".to_string()).is_expected());
        assert!(!AppError::TokenError("boom".to_string()).is_expected());
        assert!(!AppError::Internal.is_expected());
    }
}
