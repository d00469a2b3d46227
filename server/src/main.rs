//! hbnb API server: reads configuration from the environment (and `.env`),
//! prepares the database, mounts the routes and serves until Ctrl+C.

use hbnb_api::{app, ensure_database_exists, AppState, DbStorage, ServerConfig, StorageConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hbnb_api=info,hbnb_server=info,tower_http=info")),
        )
        .init();

    let storage_config = StorageConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    ensure_database_exists(&storage_config).await?;
    let storage = DbStorage::new(&storage_config)?;
    storage.reload().await?;

    let router = app(AppState::new(storage.clone()));
    let listener = TcpListener::bind(server_config.addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("could not install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
