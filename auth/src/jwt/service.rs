use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::TokenError;
use super::signing_key::SigningKey;

/// Issues and verifies access tokens.
///
/// Tokens are HS256-signed JWTs carrying the username as subject and the
/// user role as a custom `role` claim. The signing key is derived from the
/// configured secret on first use and cached for the lifetime of the
/// service; a missing or weak secret surfaces as `MisconfiguredSecret`
/// at that point rather than at construction.
pub struct TokenService {
    secret: String,
    signing_key: OnceLock<SigningKey>,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenService {
    /// Create a token service for a secret.
    ///
    /// # Arguments
    /// * `secret` - Signing secret (at least 32 bytes)
    ///
    /// # Security Notes
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Rotating the secret invalidates every outstanding token
    pub fn new(secret: impl Into<String>) -> Self {
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        // Expiry is checked against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            secret: secret.into(),
            signing_key: OnceLock::new(),
            algorithm,
            validation,
        }
    }

    fn signing_key(&self) -> Result<&SigningKey, TokenError> {
        if let Some(key) = self.signing_key.get() {
            return Ok(key);
        }

        SigningKey::check_secret(&self.secret)?;

        Ok(self.signing_key.get_or_init(|| {
            tracing::debug!(algorithm = ?self.algorithm, "Deriving token signing key");
            SigningKey::from_checked_secret(&self.secret)
        }))
    }

    /// Derive the signing key eagerly.
    ///
    /// Lets a service refuse to start with a bad secret instead of failing
    /// on the first request.
    ///
    /// # Errors
    /// * `MisconfiguredSecret` - Secret is empty or too short
    pub fn ensure_configured(&self) -> Result<(), TokenError> {
        self.signing_key().map(|_| ())
    }

    /// Issue a token for a user, valid for ten days from now.
    ///
    /// # Errors
    /// * `MisconfiguredSecret` - Secret is empty or too short
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, username: &str, role: &str) -> Result<String, TokenError> {
        self.issue_at(username, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        username: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let key = self.signing_key()?;
        let claims = TokenClaims::for_user(username, role, now);

        encode(&Header::new(self.algorithm), &claims, &key.encoding)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `MisconfiguredSecret` - Secret is empty or too short
    /// * `Invalid` - Malformed token or signature mismatch
    /// * `Expired` - Token is past its expiry
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let key = self.signing_key()?;

        let token_data = decode::<TokenClaims>(token, &key.decoding, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        if token_data.claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }

    /// Return the username of a valid token, `None` otherwise.
    pub fn validate(&self, token: &str) -> Option<String> {
        self.validate_at(token, Utc::now())
    }

    /// Same as `validate`, evaluated at `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        match self.verify_at(token, now) {
            Ok(claims) => Some(claims.sub),
            Err(e) => {
                log_rejection(&e);
                None
            }
        }
    }

    /// Return the role of a valid token, `None` if the token is invalid or
    /// carries no role.
    pub fn extract_role(&self, token: &str) -> Option<String> {
        self.extract_role_at(token, Utc::now())
    }

    /// Same as `extract_role`, evaluated at `now`.
    pub fn extract_role_at(&self, token: &str, now: DateTime<Utc>) -> Option<String> {
        match self.verify_at(token, now) {
            Ok(claims) => {
                if claims.role.is_none() {
                    tracing::debug!(subject = %claims.sub, "Token has no role claim");
                }
                claims.role
            }
            Err(e) => {
                log_rejection(&e);
                None
            }
        }
    }
}

fn log_rejection(error: &TokenError) {
    if error.is_configuration() {
        tracing::error!(error = %error, "Token verification impossible");
    } else {
        tracing::debug!(error = %error, "Token rejected");
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;

    use super::*;

    const SECRET: &str = "test-secret-key-1234567890123456";

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_issue_validate_and_extract_role() {
        let service = TokenService::new(SECRET);
        let token = service
            .issue_at("alice", "ADMIN", t0())
            .expect("Failed to issue token");

        assert_eq!(token.split('.').count(), 3);

        let later = t0() + Duration::seconds(1);
        assert_eq!(service.validate_at(&token, later), Some("alice".to_string()));
        assert_eq!(
            service.extract_role_at(&token, later),
            Some("ADMIN".to_string())
        );

        let expired = t0() + Duration::days(10) + Duration::seconds(1);
        assert_eq!(service.validate_at(&token, expired), None);
        assert_eq!(service.extract_role_at(&token, expired), None);
    }

    #[test]
    fn test_validity_window_boundaries() {
        let service = TokenService::new(SECRET);
        let token = service.issue_at("alice", "USER", t0()).unwrap();

        assert!(service.validate_at(&token, t0()).is_some());
        assert!(service
            .validate_at(&token, t0() + Duration::days(10) - Duration::seconds(1))
            .is_some());
        assert!(service
            .validate_at(&token, t0() + Duration::days(10))
            .is_none());
        assert_eq!(
            service.verify_at(&token, t0() + Duration::days(10)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_freshly_issued_token_validates_now() {
        let service = TokenService::new(SECRET);
        let token = service.issue("bob", "USER").unwrap();

        assert_eq!(service.validate(&token), Some("bob".to_string()));
        assert_eq!(service.extract_role(&token), Some("USER".to_string()));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = TokenService::new(SECRET);
        let token = service.issue_at("alice", "ADMIN", t0()).unwrap();
        let now = t0() + Duration::seconds(1);

        for (index, original) in token.char_indices() {
            if original == '.' {
                continue;
            }
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(index..index + 1, &replacement.to_string());

            assert_eq!(
                service.validate_at(&tampered, now),
                None,
                "tampering at position {} was accepted",
                index
            );
        }
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let service = TokenService::new(SECRET);

        assert!(service.validate("invalid.token.here").is_none());
        assert!(service.validate("").is_none());
        assert!(matches!(
            service.verify("not-a-jwt"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let issuer = TokenService::new("secret1_at_least_32_bytes_long_key!");
        let verifier = TokenService::new("secret2_at_least_32_bytes_long_key!");

        let token = issuer.issue("alice", "ADMIN").unwrap();
        assert!(verifier.validate(&token).is_none());
    }

    #[test]
    fn test_same_secret_gives_same_key() {
        let first = TokenService::new(SECRET);
        let second = TokenService::new(SECRET);

        let token = first.issue("alice", "ADMIN").unwrap();
        assert_eq!(second.validate(&token), Some("alice".to_string()));

        // Signing is deterministic for identical claims.
        assert_eq!(
            first.issue_at("alice", "ADMIN", t0()).unwrap(),
            second.issue_at("alice", "ADMIN", t0()).unwrap()
        );
    }

    #[test]
    fn test_empty_secret_is_misconfigured() {
        let service = TokenService::new("");

        assert!(matches!(
            service.ensure_configured(),
            Err(TokenError::MisconfiguredSecret(_))
        ));
        assert!(matches!(
            service.issue("alice", "ADMIN"),
            Err(TokenError::MisconfiguredSecret(_))
        ));
        assert!(matches!(
            service.verify("a.b.c"),
            Err(TokenError::MisconfiguredSecret(_))
        ));
        assert!(service.validate("a.b.c").is_none());
    }

    #[test]
    fn test_missing_role_claim() {
        let service = TokenService::new(SECRET);
        let key = SigningKey::derive(SECRET).unwrap();
        let claims = TokenClaims {
            sub: "alice".to_string(),
            role: None,
            iat: t0().timestamp(),
            exp: (t0() + Duration::days(1)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &key.encoding).unwrap();

        let now = t0() + Duration::seconds(1);
        assert_eq!(service.validate_at(&token, now), Some("alice".to_string()));
        assert_eq!(service.extract_role_at(&token, now), None);
    }

    #[test]
    fn test_concurrent_first_use_shares_one_key() {
        let service = std::sync::Arc::new(TokenService::new(SECRET));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = std::sync::Arc::clone(&service);
                std::thread::spawn(move || service.issue(&format!("user{}", i), "USER").unwrap())
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let token = handle.join().unwrap();
            assert_eq!(service.validate(&token), Some(format!("user{}", i)));
        }
    }
}
