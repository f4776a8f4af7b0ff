use anyhow::Result;
use materia_db::{Database, DbConfig};
use materia_server::config::Config;
use materia_server::routes;
use materia_server::state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db = Database::new(DbConfig::new(config.db_path.clone())).await?;
    let app = routes::router(AppState::new(db.clone(), config.low_stock_threshold));

    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!(port = config.http_port, "materia-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
