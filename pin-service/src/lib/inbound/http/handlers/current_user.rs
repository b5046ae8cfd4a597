use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Identity carried by the presented bearer token.
pub async fn current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<CurrentUserData> {
    ApiSuccess::new(
        StatusCode::OK,
        CurrentUserData {
            username: user.username,
            role: user.role,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserData {
    pub username: String,
    pub role: Option<String>,
}
