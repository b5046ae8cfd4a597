pub mod claims;
pub mod errors;
pub mod service;
pub mod signing_key;

pub use claims::TokenClaims;
pub use claims::TOKEN_VALIDITY_DAYS;
pub use errors::TokenError;
pub use service::TokenService;
