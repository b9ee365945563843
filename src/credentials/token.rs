use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::types::SessionClaims;
use crate::config::TokenSettings;
use crate::shared::AppError;

/// Signs and validates HS512 session tokens.
///
/// Keys are derived once from validated [`TokenSettings`]; the issuer keeps no
/// per-token state, so a token stays valid until its `exp` regardless of what
/// happens to the account afterwards.
#[derive(Clone)]
pub struct SessionTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration: Duration,
}

impl SessionTokenIssuer {
    pub fn new(settings: &TokenSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret()),
            decoding_key: DecodingKey::from_secret(settings.secret()),
            validation,
            expiration: Duration::hours(settings.expiration_hours),
        }
    }

    /// Issues a token for `phone_number`, valid from now until the configured expiry
    pub fn issue(&self, phone_number: &str) -> Result<String, AppError> {
        self.issue_at(phone_number, Utc::now())
    }

    /// Issues a token as if it had been signed at `issued_at`
    #[instrument(skip(self, phone_number))]
    pub fn issue_at(&self, phone_number: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let exp = issued_at
            .checked_add_signed(self.expiration)
            .ok_or_else(|| AppError::TokenError("token expiry is out of range".to_string()))?
            .timestamp();

        debug!(
            expiration_hours = self.expiration.num_hours(),
            exp_timestamp = exp,
            "Creating session token with expiration"
        );

        let claims = SessionClaims {
            mobile_phone: phone_number.to_string(),
            nbf: issued_at.timestamp(),
            exp,
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key).map_err(|e| {
            debug!(error = %e, "Failed to encode session token");
            AppError::TokenError(e.to_string())
        })
    }

    /// Checks signature, algorithm and expiry and returns the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate(&self, token: &str) -> Result<SessionClaims, AppError> {
        debug!("Decoding and validating session token");

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Failed to decode session token");
                AppError::TokenError(e.to_string())
            })?;

        // jsonwebtoken accepts exp == now; a token is only valid strictly before its expiry
        if claims.exp <= Utc::now().timestamp() {
            debug!(exp = claims.exp, "Session token reached its expiry");
            return Err(AppError::TokenError("ExpiredSignature".to_string()));
        }

        debug!(exp = claims.exp, "Session token decoded successfully");
        Ok(claims)
    }
}
