use std::sync::Arc;

use auth::TokenService;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: Option<String>,
}

/// Middleware that validates bearer tokens and adds the identity to request extensions
///
/// Any per-token failure is a 401; a misconfigured signing secret is a 500
/// since no token could ever pass.
pub async fn require_bearer(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = tokens.verify(token).map_err(|e| {
        if e.is_configuration() {
            tracing::error!(error = %e, "Token verification impossible");
            ApiError::InternalServerError("Internal server error".to_string())
        } else {
            tracing::warn!(error = %e, "Bearer token rejected");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        }
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    })
}
