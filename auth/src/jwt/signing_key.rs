use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::TokenError;

/// Minimum secret length for HMAC-SHA256 (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// HMAC-SHA256 key pair derived from the configured secret.
///
/// The UTF-8 bytes of the secret are the key material, so the same secret
/// always yields the same key.
pub struct SigningKey {
    pub(crate) encoding: EncodingKey,
    pub(crate) decoding: DecodingKey,
}

impl SigningKey {
    /// Check that a secret is usable as HMAC-SHA256 key material.
    ///
    /// # Errors
    /// * `MisconfiguredSecret` - Secret is empty or shorter than 32 bytes
    pub fn check_secret(secret: &str) -> Result<(), TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MisconfiguredSecret(
                "secret is not set; configure jwt.secret or JWT__SECRET".to_string(),
            ));
        }

        if secret.len() < MIN_SECRET_BYTES {
            return Err(TokenError::MisconfiguredSecret(format!(
                "secret must be at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                secret.len()
            )));
        }

        Ok(())
    }

    /// Derive the key from a secret string.
    ///
    /// # Errors
    /// * `MisconfiguredSecret` - Secret is empty or shorter than 32 bytes
    pub fn derive(secret: &str) -> Result<Self, TokenError> {
        Self::check_secret(secret)?;
        Ok(Self::from_checked_secret(secret))
    }

    /// Build the key pair from a secret that already passed `check_secret`.
    pub(crate) fn from_checked_secret(secret: &str) -> Self {
        let key_bytes = secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(key_bytes),
            decoding: DecodingKey::from_secret(key_bytes),
        }
    }
}
