//! Authentication core
//!
//! Credential verification and access token lifecycle:
//! - Password hashing (Argon2id) and verification (Argon2, bcrypt)
//! - Access token issuance and validation (HS256, ten-day validity)
//! - Authentication coordination over a pluggable user lookup
//!
//! The hosting service provides the user store through [`IdentityLookup`];
//! everything else lives here.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenService;
//!
//! let tokens = TokenService::new("secret_key_at_least_32_bytes_long!");
//! let token = tokens.issue("alice", "ADMIN").unwrap();
//! assert_eq!(tokens.validate(&token).as_deref(), Some("alice"));
//! assert_eq!(tokens.extract_role(&token).as_deref(), Some("ADMIN"));
//! assert_eq!(tokens.validate("garbage"), None);
//! ```

pub mod authenticator;
pub mod identity;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use identity::Identity;
pub use identity::IdentityLookup;
pub use identity::LookupError;
pub use jwt::TokenClaims;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordVerifier;
