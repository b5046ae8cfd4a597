use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier as Argon2PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;
use super::verifier::PasswordVerifier;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Password hashing implementation.
///
/// New hashes are Argon2id. Verification also understands bcrypt hashes so
/// that accounts created with a bcrypt encoder keep working.
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a password for storage as an Argon2id PHC string with a fresh
    /// random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Compare a password with a stored Argon2 or bcrypt hash.
    ///
    /// Both schemes compare in constant time.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash cannot be parsed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix)) {
            return bcrypt::verify(password, hash).map_err(|e| {
                PasswordError::VerificationFailed(format!("Invalid bcrypt hash: {}", e))
            });
        }

        let stored = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid argon2 hash: {}", e))
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordVerifier for PasswordHasher {
    fn matches(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.verify(password, stored_hash)
    }
}
