use serde::{Deserialize, Serialize};

/// JWT claims asserting an authenticated account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Serialized under the `mobilephone` identity claim type URI
    #[serde(rename = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/mobilephone")]
    pub mobile_phone: String,
    pub nbf: i64, // Not before (standard JWT claim)
    pub exp: i64, // Expiration timestamp (standard JWT claim)
    pub iat: i64, // Issued at timestamp (standard JWT claim)
}

impl SessionClaims {
    /// Phone number of the account the token was issued to
    pub fn subject(&self) -> &str {
        &self.mobile_phone
    }
}
