//! Volatile link repository backed by a process-local map.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::sweeper_slot::SweeperSlot;
use crate::domain::entities::Link;
use crate::domain::expiration_sweeper::{DeletionSender, run_expiration_sweeper};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// In-memory repository keyed by token.
///
/// Lookups by original URL scan every entry. Two concurrent creations for
/// the same URL may both miss that scan and store two tokens; only token
/// uniqueness is enforced here.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLinkRepository {
    links: Arc<RwLock<HashMap<String, Link>>>,
    sweeper: SweeperSlot,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links, expired or not.
    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn get_by_token(&self, token: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.read().await.get(token).cloned())
    }

    async fn get_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError> {
        let links = self.links.read().await;
        Ok(links
            .values()
            .find(|link| link.original_url == original_url)
            .cloned())
    }

    async fn store(&self, link: &Link) -> Result<(), AppError> {
        let mut links = self.links.write().await;
        if links.contains_key(&link.token) {
            tracing::error!(token = %link.token, "Token already stored");
            return Err(AppError::internal(
                "internal server error",
                serde_json::json!({}),
            ));
        }

        links.insert(link.token.clone(), link.clone());
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError> {
        let mut links = self.links.write().await;

        let expired: Vec<String> = links
            .values()
            .filter(|link| link.is_expired_at(now))
            .map(|link| link.token.clone())
            .collect();

        for token in &expired {
            links.remove(token);
        }

        Ok(expired)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn start_expiration_sweep(&self, interval: Duration, deleted_tx: DeletionSender) {
        let repository = self.clone();
        let started = self.sweeper.start(|| {
            tokio::spawn(run_expiration_sweeper(repository, interval, deleted_tx))
        });

        if !started {
            warn!("Expiration sweeper already running, ignoring start request");
        }
    }

    async fn shutdown(&self) -> Result<(), AppError> {
        if self.sweeper.stop() {
            debug!("Expiration sweeper stopped");
        }
        self.links.write().await.clear();
        info!("In-memory link storage closed");
        Ok(())
    }
}
