//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http,
    http::{Method, header},
    routing::get,
};
use marketplace::{MarketplaceConfig, PgMarketplaceRepository, marketplace_router};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Process configuration read from the environment (after `.env`).
struct ServerConfig {
    database_url: String,
    max_connections: u32,
    listen_addr: SocketAddr,
    frontend_origins: Vec<http::HeaderValue>,
    password_pepper: Option<Vec<u8>>,
}

impl ServerConfig {
    fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .context("LISTEN_ADDR must look like 0.0.0.0:31113")?;

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string())
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        let password_pepper = env::var("PASSWORD_PEPPER")
            .ok()
            .filter(|pepper| !pepper.is_empty())
            .map(String::into_bytes);

        Ok(Self {
            database_url,
            max_connections,
            listen_addr,
            frontend_origins,
            password_pepper,
        })
    }

    fn marketplace(&self) -> MarketplaceConfig {
        match &self.password_pepper {
            Some(pepper) => MarketplaceConfig {
                password_pepper: Some(pepper.clone()),
                ..MarketplaceConfig::default()
            },
            None if cfg!(debug_assertions) => MarketplaceConfig::development(),
            None => {
                tracing::warn!("PASSWORD_PEPPER is not set, hashing passwords without a pepper");
                MarketplaceConfig::default()
            }
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

/// GET /api/health
async fn health(State(repo): State<PgMarketplaceRepository>) -> AppResult<Json<HealthResponse>> {
    repo.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check could not reach the database");
        AppError::service_unavailable("Database is unreachable").with_action("Try again later")
    })?;

    Ok(Json(HealthResponse {
        status: "ok",
        database: "up",
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,marketplace=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;

    tracing::info!(max_connections = config.max_connections, "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations completed");

    let repo = PgMarketplaceRepository::new(pool);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origins.clone())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let health_router = Router::new()
        .route("/health", get(health))
        .with_state(repo.clone());

    let app = Router::new()
        .nest(
            "/api",
            marketplace_router(repo, config.marketplace()).merge(health_router),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    // Start server
    tracing::info!("Listening on {}", config.listen_addr);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
