use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;
use thiserror::Error;
use tracing::{debug, instrument};

type HmacSha512 = Hmac<Sha512>;

/// Salt length in bytes: one full SHA-512 block of HMAC key material
pub const SALT_LEN: usize = 128;

/// HMAC-SHA-512 output length in bytes
pub const HASH_LEN: usize = 64;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("stored password {field} is {actual} bytes, expected {expected}")]
    Corrupt {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// A derived password hash together with the salt that keyed it
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    pub hash: Vec<u8>,
    pub salt: Vec<u8>,
}

impl std::fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("hash_len", &self.hash.len())
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

/// Derives and verifies salted HMAC-SHA-512 password hashes.
///
/// The salt is the HMAC key and the UTF-8 password is the message. No
/// password policy is applied here; an empty password hashes like any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialHasher;

impl CredentialHasher {
    pub fn new() -> Self {
        Self
    }

    /// Generates a fresh random salt and hashes the password with it
    #[instrument(skip_all)]
    pub fn derive(&self, password: &str) -> PasswordCredential {
        let mut salt = vec![0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);

        let hash = self.hash_with_salt(password, &salt);
        debug!(salt_len = salt.len(), hash_len = hash.len(), "Derived password credential");

        PasswordCredential { hash, salt }
    }

    /// Computes the keyed hash of `password` under an explicit salt
    pub fn hash_with_salt(&self, password: &str, salt: &[u8]) -> Vec<u8> {
        keyed_mac(salt, password).finalize().into_bytes().to_vec()
    }

    /// Recomputes the hash for `password` and compares it in constant time.
    ///
    /// A stored salt or hash of the wrong length is reported as
    /// [`CredentialError::Corrupt`] rather than as a mismatch.
    #[instrument(skip_all)]
    pub fn verify(&self, password: &str, hash: &[u8], salt: &[u8]) -> Result<bool, CredentialError> {
        if salt.len() != SALT_LEN {
            return Err(CredentialError::Corrupt {
                field: "salt",
                expected: SALT_LEN,
                actual: salt.len(),
            });
        }
        if hash.len() != HASH_LEN {
            return Err(CredentialError::Corrupt {
                field: "hash",
                expected: HASH_LEN,
                actual: hash.len(),
            });
        }

        let matched = keyed_mac(salt, password).verify_slice(hash).is_ok();
        debug!(matched, "Verified password credential");
        Ok(matched)
    }
}

fn keyed_mac(salt: &[u8], password: &str) -> HmacSha512 {
    let mut mac = HmacSha512::new_from_slice(salt).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    mac
}
