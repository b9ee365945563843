use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::{models::AccountModel, repository::AccountRepository, types::RegisterRequest};
use crate::credentials::{CredentialHasher, SessionTokenIssuer};
use crate::notify::{dispatch_registration_notice, RegistrationNotice, RegistrationNotifier};
use crate::shared::AppError;

/// Service for registration, login and account lookup
pub struct AccountService {
    repository: Arc<dyn AccountRepository + Send + Sync>,
    notifier: Arc<dyn RegistrationNotifier>,
    token_issuer: Arc<SessionTokenIssuer>,
    hasher: CredentialHasher,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepository + Send + Sync>,
        notifier: Arc<dyn RegistrationNotifier>,
        token_issuer: Arc<SessionTokenIssuer>,
    ) -> Self {
        Self {
            repository,
            notifier,
            token_issuer,
            hasher: CredentialHasher::new(),
        }
    }

    /// Creates a `User` account and queues a welcome notice.
    ///
    /// The notice is sent on its own task after the account is stored, so a
    /// delivery failure never undoes or fails the registration.
    #[instrument(skip(self, request), fields(phone_number = %request.phone_number))]
    pub async fn register(&self, request: RegisterRequest) -> Result<AccountModel, AppError> {
        if self
            .repository
            .get_account(&request.phone_number)
            .await?
            .is_some()
        {
            warn!("Registration rejected, account already exists");
            return Err(AppError::AccountAlreadyExists(request.phone_number));
        }

        let credential = self.hasher.derive(&request.password);
        let account = AccountModel::new(
            request.phone_number,
            request.first_name,
            request.last_name,
            request.email,
            credential,
        );

        self.repository.create_account(&account).await?;
        info!(role = %account.role, "Account registered");

        dispatch_registration_notice(
            Arc::clone(&self.notifier),
            RegistrationNotice {
                email: account.email.clone(),
                first_name: account.first_name.clone(),
                last_name: account.last_name.clone(),
            },
        );

        Ok(account)
    }

    /// Verifies the password and issues a session token.
    ///
    /// Unexpected failures are logged here and surface only as
    /// [`AppError::Internal`].
    #[instrument(skip(self, password))]
    pub async fn login(&self, phone_number: &str, password: &str) -> Result<String, AppError> {
        match self.authenticate(phone_number, password).await {
            Ok(token) => {
                info!("Login succeeded");
                Ok(token)
            }
            Err(e) if e.is_expected() => {
                warn!(reason = %e, "Login rejected");
                Err(e)
            }
            Err(e) => {
                error!(error = %e, details = ?e, "Unexpected failure during login");
                Err(AppError::Internal)
            }
        }
    }

    async fn authenticate(&self, phone_number: &str, password: &str) -> Result<String, AppError> {
        let account = self
            .repository
            .get_account(phone_number)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let verified =
            self.hasher
                .verify(password, &account.password_hash, &account.password_salt)?;
        if !verified {
            return Err(AppError::WrongPassword);
        }

        self.token_issuer.issue(&account.phone_number)
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, phone_number: &str) -> Result<AccountModel, AppError> {
        self.repository
            .get_account(phone_number)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}
