use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{AccountModel, Role};
use crate::shared::AppError;

/// Trait for account repository operations
#[async_trait]
pub trait AccountRepository {
    /// Inserts a new account; a taken phone number yields `AccountAlreadyExists`
    async fn create_account(&self, account: &AccountModel) -> Result<(), AppError>;
    async fn get_account(&self, phone_number: &str) -> Result<Option<AccountModel>, AppError>;
}

/// In-memory implementation of AccountRepository for development and testing
///
/// Data is stored in memory and will be lost when the application restarts.
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<String, AccountModel>>,
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAccountRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated accounts
    pub fn with_accounts(accounts: Vec<AccountModel>) -> Self {
        let account_map = accounts
            .into_iter()
            .map(|account| (account.phone_number.clone(), account))
            .collect();

        Self {
            accounts: Mutex::new(account_map),
        }
    }

    /// Returns the current number of accounts in the repository
    pub fn account_count(&self) -> usize {
        self.accounts.lock().map(|accounts| accounts.len()).unwrap_or(0)
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    #[instrument(skip(self, account), fields(phone_number = %account.phone_number))]
    async fn create_account(&self, account: &AccountModel) -> Result<(), AppError> {
        debug!("Creating account in memory");

        let mut accounts = self.accounts.lock().map_err(|_| AppError::Internal)?;
        if accounts.contains_key(&account.phone_number) {
            warn!("Account already exists in memory");
            return Err(AppError::AccountAlreadyExists(account.phone_number.clone()));
        }
        accounts.insert(account.phone_number.clone(), account.clone());

        debug!("Account created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_account(&self, phone_number: &str) -> Result<Option<AccountModel>, AppError> {
        let accounts = self.accounts.lock().map_err(|_| AppError::Internal)?;
        let account = accounts.get(phone_number).cloned();

        debug!(found = account.is_some(), "Fetched account from memory");
        Ok(account)
    }
}

/// PostgreSQL implementation of account repository
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(skip(self, account), fields(phone_number = %account.phone_number))]
    async fn create_account(&self, account: &AccountModel) -> Result<(), AppError> {
        debug!("Creating account in database");

        sqlx::query(
            "INSERT INTO accounts (phone_number, first_name, last_name, email, role, password_hash, password_salt) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        )
        .bind(&account.phone_number)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(account.role.as_ref())
        .bind(&account.password_hash)
        .bind(&account.password_salt)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e
                .as_database_error()
                .is_some_and(|db_error| db_error.is_unique_violation())
            {
                warn!("Account already exists in database");
                return AppError::AccountAlreadyExists(account.phone_number.clone());
            }
            warn!(error = %e, "Failed to create account in database");
            AppError::DatabaseError(e.to_string())
        })?;

        debug!("Account created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_account(&self, phone_number: &str) -> Result<Option<AccountModel>, AppError> {
        let row = sqlx::query(
            "SELECT phone_number, first_name, last_name, email, role, password_hash, password_salt FROM accounts WHERE phone_number = $1"
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch account from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let Some(row) = row else {
            debug!("Account not found in database");
            return Ok(None);
        };

        let role_label: String = row.get("role");
        let role = Role::from_str(&role_label).map_err(|_| {
            warn!(role = %role_label, "Unknown role label stored for account");
            AppError::DatabaseError(format!("unknown role label: {}", role_label))
        })?;

        debug!("Account found in database");
        Ok(Some(AccountModel {
            phone_number: row.get("phone_number"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            role,
            password_hash: row.get("password_hash"),
            password_salt: row.get("password_salt"),
        }))
    }
}
