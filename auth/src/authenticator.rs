use std::sync::Arc;

use crate::identity::IdentityLookup;
use crate::jwt::TokenService;
use crate::password::PasswordVerifier;

/// Credential verifier issuing access tokens.
///
/// Looks the user up through the identity port, compares the password with
/// the stored hash and hands the identity to the token service.
pub struct Authenticator<L, P>
where
    L: IdentityLookup,
    P: PasswordVerifier,
{
    identities: Arc<L>,
    password_verifier: Arc<P>,
    token_service: Arc<TokenService>,
}

/// Result of a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub username: String,
    pub role: String,
}

/// Authentication operation errors.
///
/// Unknown usernames and wrong passwords are the same error so that callers
/// cannot probe which accounts exist. Everything else is `Internal`; the
/// cause is logged, not returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error during authentication")]
    Internal,
}

impl<L, P> Authenticator<L, P>
where
    L: IdentityLookup,
    P: PasswordVerifier,
{
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `identities` - User lookup by username
    /// * `password_verifier` - Password hash comparison
    /// * `token_service` - Token issuance
    pub fn new(
        identities: Arc<L>,
        password_verifier: Arc<P>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            identities,
            password_verifier,
            token_service,
        }
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `username` - Username to authenticate
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Signed access token with the identity it was issued for
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user or wrong password
    /// * `Internal` - Lookup, hash comparison or token issuance failed
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        tracing::info!(username = %username, "Attempting authentication");

        let identity = self
            .identities
            .find_identity(username)
            .await
            .map_err(|e| {
                tracing::error!(username = %username, error = %e, "User lookup failed");
                AuthenticationError::Internal
            })?
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Authentication failed: unknown user");
                AuthenticationError::InvalidCredentials
            })?;

        let is_valid = self
            .password_verifier
            .matches(password, &identity.password_hash)
            .map_err(|e| {
                tracing::error!(username = %username, error = %e, "Password comparison failed");
                AuthenticationError::Internal
            })?;

        if !is_valid {
            tracing::warn!(username = %username, "Authentication failed: wrong password");
            return Err(AuthenticationError::InvalidCredentials);
        }

        let token = self
            .token_service
            .issue(&identity.username, &identity.role)
            .map_err(|e| {
                tracing::error!(username = %username, error = %e, "Token issuance failed");
                AuthenticationError::Internal
            })?;

        tracing::info!(username = %username, role = %identity.role, "Authentication successful");

        Ok(AuthenticationResult {
            access_token: token,
            username: identity.username,
            role: identity.role,
        })
    }

    /// Token service used for issuance, shared with token validation.
    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }
}
