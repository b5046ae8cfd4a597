use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// How long an issued token stays valid.
pub const TOKEN_VALIDITY_DAYS: i64 = 10;

/// Claim set carried by every access token.
///
/// `role` is optional on the way in so that a well-signed token without the
/// claim still parses; `extract_role` then reports it as missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,

    /// User role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for a user issued at `now`, expiring after the
    /// validity window.
    ///
    /// # Arguments
    /// * `username` - Token subject
    /// * `role` - Role stored in the `role` claim
    /// * `now` - Issue instant
    pub fn for_user(username: impl ToString, role: impl ToString, now: DateTime<Utc>) -> Self {
        let expiration = now + Duration::days(TOKEN_VALIDITY_DAYS);

        Self {
            sub: username.to_string(),
            role: Some(role.to_string()),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// The expiry instant itself is already outside the validity window.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
