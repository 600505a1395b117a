use anyhow::Context;
use puppymarket::app::{build_router, create_container};
use puppymarket::config::{AppConfig, ConfigService};
use puppymarket::lifecycle::{LifecycleManager, shutdown_signal};
use puppymarket::repository::Database;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

const INIT_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let service = ConfigService::new();
    let config = AppConfig::from_service(&service)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    if let Some(e) = service.dotenv_error() {
        tracing::warn!("ignoring unreadable .env file: {}", e);
    }

    tracing::info!("Starting PuppyMarket...");

    let database = Database::new();
    let mut lifecycle = LifecycleManager::new();
    lifecycle.register(Arc::new(RwLock::new(database.clone())), "Database");
    lifecycle.call_module_init(INIT_TIMEOUT).await?;

    let addr = config.bind_address();
    let container = create_container(config, database).await?;
    let router = build_router(&container)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Initiating graceful shutdown...");
    lifecycle.call_module_destroy().await?;
    tracing::info!("Server stopped");
    Ok(())
}
