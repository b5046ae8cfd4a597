use auth::AuthenticationResult;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn authenticate<R: UserRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<AuthenticateResponseData>, ApiError> {
    state
        .authenticator
        .authenticate(&body.username, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|result| ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateResponseData {
    pub username: String,
    pub role: String,
    pub token: String,
}

impl From<AuthenticationResult> for AuthenticateResponseData {
    fn from(result: AuthenticationResult) -> Self {
        Self {
            username: result.username,
            role: result.role,
            token: result.access_token,
        }
    }
}
