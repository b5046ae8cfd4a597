pub mod errors;
pub mod hasher;
pub mod verifier;

pub use errors::PasswordError;
pub use hasher::PasswordHasher;
pub use verifier::PasswordVerifier;
