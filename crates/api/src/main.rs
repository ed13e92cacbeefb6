//! streakd API server
//!
//! Habit/activity tracker behind cookie-backed session authentication.

use std::net::SocketAddr;

use streakd_shared::{create_pool, run_migrations};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streakd_api::{routes::create_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,streakd_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting streakd API server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    tracing::info!(
        bind_address = %config.bind_address,
        session_duration = config.session_duration,
        "Configuration loaded"
    );

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection established");

    run_migrations(&pool).await?;

    let state = AppState::new(pool, config.clone());

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
