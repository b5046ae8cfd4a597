use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret is misconfigured: {0}")]
    MisconfiguredSecret(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token is invalid: {0}")]
    Invalid(String),
}

impl TokenError {
    /// Whether the failure comes from server configuration rather than
    /// from the presented token.
    pub fn is_configuration(&self) -> bool {
        matches!(self, TokenError::MisconfiguredSecret(_))
    }
}
