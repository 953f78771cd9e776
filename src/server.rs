//! HTTP server initialization and runtime setup.
//!
//! Selects the storage backend, wires the link service to the token cache,
//! and runs the Axum server until a shutdown signal arrives.

use crate::application::services::LinkService;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::MemoryTokenCache;
use crate::infrastructure::persistence::{
    InMemoryLinkRepository, PgLinkRepository, connect_with_retry, run_migrations,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The selected link repository (PostgreSQL pool with migrations, or an
///   in-memory map)
/// - The token cache and the expiration sweeper feeding it
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The database stays unreachable after the reconnect budget
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory link storage");
            serve(config, Arc::new(InMemoryLinkRepository::new())).await
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is not configured")?;

            let pool = connect_with_retry(database_url, &config.pool_settings())
                .await
                .context("Failed to connect to database")?;

            run_migrations(&pool)
                .await
                .context("Failed to apply migrations")?;
            tracing::info!("Migrations applied");

            serve(config, Arc::new(PgLinkRepository::new(Arc::new(pool)))).await
        }
    }
}

async fn serve<R: LinkRepository>(config: Config, repository: Arc<R>) -> Result<()> {
    let cache = Arc::new(MemoryTokenCache::new());

    let link_service = LinkService::start(
        repository.clone(),
        cache.clone(),
        config.token_generator()?,
        config.link_settings(),
        config.sweep_interval(),
        config.deletion_queue_capacity,
    )?;
    tracing::info!("Expiration sweeper attached to token cache");

    let state = AppState::new(Arc::new(link_service), cache, config.storage_backend);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, releasing storage");
    repository.shutdown().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
