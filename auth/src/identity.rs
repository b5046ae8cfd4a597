use async_trait::async_trait;
use thiserror::Error;

/// Authentication record of a user, as read from the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Failure of the user store while looking up an identity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Identity lookup failed: {0}")]
pub struct LookupError(pub String);

/// Port for finding identities by username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityLookup: Send + Sync + 'static {
    /// Find the identity registered under `username`.
    ///
    /// # Returns
    /// The identity, or `None` when no user has this username
    ///
    /// # Errors
    /// * `LookupError` - The user store could not be queried
    async fn find_identity(&self, username: &str) -> Result<Option<Identity>, LookupError>;
}
