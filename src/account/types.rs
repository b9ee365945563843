use serde::{Deserialize, Serialize};

use super::models::{AccountModel, Role};

/// Request body for account registration
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("phone_number", &self.phone_number)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Request body for login
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("phone_number", &self.phone_number)
            .finish_non_exhaustive()
    }
}

/// Response structure for login endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
}

/// Public view of an account; never carries the credential
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AccountResponse {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl From<AccountModel> for AccountResponse {
    fn from(account: AccountModel) -> Self {
        Self {
            phone_number: account.phone_number,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            role: account.role,
        }
    }
}
