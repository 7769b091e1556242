//! LinguaLearn - Application Entry Point
//!
//! This is the main entry point for the LinguaLearn server.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use lingualearn::{
    app,
    config::Config,
    constants::REALTIME_CHANNEL_CAPACITY,
    db,
    middleware::rate_limit_middleware,
    realtime::RealtimeHub,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting LinguaLearn server...");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;
    db::test_connection(&db_pool).await?;

    // Run database migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    let redis_client = redis::Client::open(config.redis.url.as_str())?;

    let realtime = RealtimeHub::new(REALTIME_CHANNEL_CAPACITY);
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    // Create application state
    let state = AppState::new(db_pool, redis_client, config, realtime);

    // Initialize Redis connection
    tracing::info!("Connecting to Redis...");
    state.redis().await?;

    // Build the router
    let app = app(state.clone()).layer(axum::middleware::from_fn_with_state(
        state,
        rate_limit_middleware,
    ));

    // Start the server
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
