//! Repository trait for short link storage.

use crate::domain::entities::Link;
use crate::domain::expiration_sweeper::DeletionSender;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Storage contract shared by the volatile and durable backends.
///
/// Absence is reported as `Ok(None)`; every `Err` is a backend fault.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local map
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync + 'static {
    /// Finds a link by its token.
    ///
    /// Expiry is not checked: a link past `expires_at` is returned until a
    /// sweep removes it.
    async fn get_by_token(&self, token: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by the URL it points to.
    async fn get_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError>;

    /// Persists a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the token is already taken or the
    /// backend fails.
    async fn store(&self, link: &Link) -> Result<(), AppError>;

    /// Deletes every link with `expires_at <= now` and returns their tokens.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError>;

    /// Spawns the periodic sweeper that publishes deleted tokens to `deleted_tx`.
    ///
    /// Must be called from within a Tokio runtime.
    fn start_expiration_sweep(&self, interval: Duration, deleted_tx: DeletionSender);

    /// Verifies that the backend can serve requests.
    async fn ping(&self) -> Result<(), AppError>;

    /// Stops the sweeper and releases backend resources.
    ///
    /// The repository must not be used afterwards.
    async fn shutdown(&self) -> Result<(), AppError>;
}
