use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::create_user::create_user;
use super::handlers::current_user::current_user;
use super::middleware::require_bearer;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::UserService;

pub struct AppState<R: UserRepository> {
    pub user_service: Arc<UserService<R>>,
    pub authenticator: Arc<Authenticator<UserService<R>, PasswordHasher>>,
    pub token_service: Arc<TokenService>,
}

impl<R: UserRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            authenticator: Arc::clone(&self.authenticator),
            token_service: Arc::clone(&self.token_service),
        }
    }
}

pub fn create_router<R: UserRepository>(
    user_service: Arc<UserService<R>>,
    authenticator: Arc<Authenticator<UserService<R>, PasswordHasher>>,
) -> Router {
    let token_service = Arc::clone(authenticator.token_service());
    let state = AppState {
        user_service,
        authenticator,
        token_service: Arc::clone(&token_service),
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(authenticate::<R>))
        .route("/api/users", post(create_user::<R>));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(current_user))
        .route_layer(middleware::from_fn_with_state(
            token_service,
            require_bearer,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out: they carry bearer tokens.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
