use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenService;
use pin_service::domain::user::service::UserService;
use pin_service::inbound::http::router::create_router;
use pin_service::outbound::repositories::InMemoryUserRepository;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryUserRepository>,
    pub token_service: Arc<TokenService>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_secret(TEST_SECRET).await
    }

    pub async fn spawn_with_secret(secret: &str) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let token_service = Arc::new(TokenService::new(secret));

        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));
        let authenticator = Arc::new(Authenticator::new(
            Arc::clone(&user_service),
            Arc::new(PasswordHasher::new()),
            Arc::clone(&token_service),
        ));

        let router = create_router(user_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            token_service,
        }
    }

    /// Store a user directly, bypassing registration
    pub async fn seed_user(&self, username: &str, password_hash: String, role: &str) {
        self.repository
            .insert(username, password_hash, role)
            .expect("Failed to seed user");
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }
}
