//! SmartRemedy dashboard server
//!
//! Run with: cargo run -p smartremedy-web

use smartremedy_config::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(backend = %config.api.base_url, "Starting SmartRemedy dashboard...");

    let state = smartremedy_web::state::AppState::from_config(&config).await?;

    match state.api.health().await {
        Ok(health) => info!(
            status = %health.status,
            version = health.version.as_deref().unwrap_or("unknown"),
            "backend reachable"
        ),
        Err(e) => warn!(error = %e, "backend health check failed, pages will show load errors"),
    }

    let app = smartremedy_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
