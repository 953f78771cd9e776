//! In-memory token existence cache.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use super::service::{CacheError, CacheResult, TokenCache};
use crate::domain::expiration_sweeper::DeletionReceiver;

/// Token set guarded by a single reader/writer lock.
///
/// Cloning shares the underlying set.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenCache {
    tokens: Arc<RwLock<HashSet<String>>>,
    listener: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl MemoryTokenCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        debug!("Using in-memory token cache");
        Self::default()
    }

    /// Number of tokens currently cached.
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    /// Returns true while the deletion feed listener is running.
    ///
    /// The listener stops once every sender of its feed is dropped.
    pub fn is_feed_active(&self) -> bool {
        self.listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

#[async_trait]
impl TokenCache for MemoryTokenCache {
    async fn exists(&self, token: &str) -> bool {
        self.tokens.read().await.contains(token)
    }

    async fn store(&self, token: &str) {
        if self.exists(token).await {
            return;
        }
        self.tokens.write().await.insert(token.to_owned());
    }

    fn attach_deletion_feed(&self, deleted_rx: DeletionReceiver) -> CacheResult<()> {
        let mut listener = self
            .listener
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if listener.is_some() {
            return Err(CacheError::FeedAlreadyAttached);
        }

        *listener = Some(tokio::spawn(run_deletion_listener(
            self.tokens.clone(),
            deleted_rx,
        )));
        Ok(())
    }
}

async fn run_deletion_listener(
    tokens: Arc<RwLock<HashSet<String>>>,
    mut deleted_rx: DeletionReceiver,
) {
    while let Some(batch) = deleted_rx.recv().await {
        let mut set = tokens.write().await;
        for token in &batch {
            set.remove(token);
        }
        debug!(
            evicted = batch.len(),
            remaining = set.len(),
            "Deleted tokens evicted from cache"
        );
    }

    debug!("Deletion feed closed, cache listener stopped");
}
