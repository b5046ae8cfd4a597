use super::errors::PasswordError;

/// Port for comparing a plaintext password against a stored hash.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync + 'static {
    /// Check a password against a stored hash.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is unreadable
    fn matches(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError>;
}
