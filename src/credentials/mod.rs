// Public API - what other modules can use
pub use hasher::{CredentialError, CredentialHasher, PasswordCredential, HASH_LEN, SALT_LEN};
pub use middleware::{jwt_auth, require_subject};
pub use token::SessionTokenIssuer;
pub use types::SessionClaims;

// Internal modules
mod hasher;
mod middleware;
pub(crate) mod token;
mod types;
