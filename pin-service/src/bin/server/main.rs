use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenService;
use pin_service::config::Config;
use pin_service::domain::user::ports::UserRepository;
use pin_service::domain::user::service::UserService;
use pin_service::inbound::http::router::create_router;
use pin_service::outbound::repositories::InMemoryUserRepository;
use pin_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pin_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "pin-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = config.database.is_some(),
        "Configuration loaded"
    );

    let token_service = Arc::new(TokenService::new(config.jwt.secret.clone()));
    if let Err(e) = token_service.ensure_configured() {
        tracing::error!(error = %e, "Refusing to start");
        return Err(e.into());
    }

    match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            serve(
                Arc::new(PostgresUserRepository::new(pg_pool)),
                token_service,
                config.server.http_port,
            )
            .await
        }
        None => {
            tracing::warn!("No database configured, users are kept in memory");
            serve(
                Arc::new(InMemoryUserRepository::new()),
                token_service,
                config.server.http_port,
            )
            .await
        }
    }
}

async fn serve<R: UserRepository>(
    user_repository: Arc<R>,
    token_service: Arc<TokenService>,
    http_port: u16,
) -> Result<(), anyhow::Error> {
    let user_service = Arc::new(UserService::new(user_repository));
    let authenticator = Arc::new(Authenticator::new(
        Arc::clone(&user_service),
        Arc::new(PasswordHasher::new()),
        token_service,
    ));

    let http_address = format!("0.0.0.0:{}", http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");
    Ok(())
}
