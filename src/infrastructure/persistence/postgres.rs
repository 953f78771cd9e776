//! Connection bootstrap for the durable backend.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{info, warn};

/// Pool sizing and reconnect budget.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Total connection attempts, including the first one.
    pub reconnect_retries: u32,
    pub reconnect_delay: Duration,
}

/// Opens a pool, retrying with a fixed delay between attempts.
///
/// # Errors
///
/// Returns the error of the last attempt once `reconnect_retries` attempts
/// have failed.
pub async fn connect_with_retry(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    let options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout);

    let total = settings.reconnect_retries.max(1);
    let strategy = FixedInterval::new(settings.reconnect_delay).take(total as usize - 1);
    let attempts = AtomicU32::new(0);

    let pool = Retry::start(strategy, || {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let options = options.clone();
        async move {
            options
                .connect(database_url)
                .await
                .inspect_err(|e| warn!(attempt, total, error = %e, "Database connection failed"))
        }
    })
    .await?;

    info!(
        attempts = attempts.load(Ordering::Relaxed),
        "Connected to database"
    );
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
