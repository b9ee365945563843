use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::credentials::PasswordCredential;

/// Stored role label; registration always assigns `User`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Database model for the accounts table, keyed by phone number
#[derive(Clone, PartialEq, Eq)]
pub struct AccountModel {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
}

impl AccountModel {
    /// Creates a new `User` account from a freshly derived credential
    pub fn new(
        phone_number: String,
        first_name: String,
        last_name: String,
        email: String,
        credential: PasswordCredential,
    ) -> Self {
        Self {
            phone_number,
            first_name,
            last_name,
            email,
            role: Role::User,
            password_hash: credential.hash,
            password_salt: credential.salt,
        }
    }
}

impl std::fmt::Debug for AccountModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountModel")
            .field("phone_number", &self.phone_number)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}
