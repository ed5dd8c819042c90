use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use galleria_api::{
    build_router, config::ServerConfig, logging::init_tracing, middleware::build_rate_limiter,
    AppState,
};
use galleria_db::{log_pool_metrics, Database, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    let _log_guard = init_tracing(&config.log);

    info!(
        subsystem = "api",
        host = %config.host,
        port = config.port,
        pool_size = config.db_max_connections,
        "Starting galleria-api"
    );

    let db = Database::connect_with_config(
        &config.database_url,
        PoolConfig::new().max_connections(config.db_max_connections),
    )
    .await
    .context("Failed to connect to database")?;
    log_pool_metrics(db.pool());

    if config.run_migrations {
        db.migrate().await.context("Failed to run migrations")?;
        info!(subsystem = "api", "Migrations applied");
    }

    let rate_limiter = build_rate_limiter(&config.rate_limit);
    if rate_limiter.is_some() {
        info!(
            subsystem = "api",
            requests = config.rate_limit.requests,
            period_secs = config.rate_limit.period_secs,
            "Rate limiting enabled"
        );
    } else if config.rate_limit.enabled {
        warn!(subsystem = "api", "Rate limit quota is invalid; rate limiting disabled");
    }

    let state = AppState::new(Arc::new(db.media.clone())).with_rate_limiter(rate_limiter);
    let app = build_router(state, &config.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
