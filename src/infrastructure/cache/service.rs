//! Token cache trait and error types.

use async_trait::async_trait;
use std::fmt;

use crate::domain::expiration_sweeper::DeletionReceiver;

/// Errors that can occur when wiring a token cache.
#[derive(Debug, PartialEq, Eq)]
pub enum CacheError {
    FeedAlreadyAttached,
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::FeedAlreadyAttached => write!(f, "Deletion feed is already attached"),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Process-local membership set of tokens currently in use.
///
/// Used to reject candidate tokens during creation without a backend round
/// trip. A stored token stays until a deletion batch removes it, so there
/// are no false negatives; a token deleted from storage may still be
/// reported as existing until its batch is processed.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryTokenCache`] - `RwLock<HashSet>` backed set
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenCache: Send + Sync + 'static {
    /// Returns true if `token` is known to be in use.
    async fn exists(&self, token: &str) -> bool;

    /// Marks `token` as in use. No-op if already present.
    async fn store(&self, token: &str);

    /// Spawns the listener removing every received batch from the set.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::FeedAlreadyAttached`] if a listener is already
    /// running; the given receiver is dropped.
    fn attach_deletion_feed(&self, deleted_rx: DeletionReceiver) -> CacheResult<()>;
}
