//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::sweeper_slot::SweeperSlot;
use crate::domain::entities::Link;
use crate::domain::expiration_sweeper::{DeletionSender, run_expiration_sweeper};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, map_sqlx_error};

const SELECT_BY_TOKEN: &str = r#"
    SELECT s.original_link, s.token, s.expires_at
    FROM short_link s
    WHERE s.token = $1
"#;

const SELECT_BY_ORIGINAL_LINK: &str = r#"
    SELECT s.original_link, s.token, s.expires_at
    FROM short_link s
    WHERE s.original_link = $1
"#;

const INSERT_LINK: &str = r#"
    INSERT INTO short_link (original_link, token, expires_at)
    VALUES ($1, $2, $3)
"#;

const DELETE_EXPIRED: &str = r#"
    DELETE FROM short_link
    WHERE expires_at <= $1
    RETURNING token
"#;

const PING: &str = "SELECT 1";

/// PostgreSQL repository for link storage and retrieval.
///
/// `token` is the primary key and `original_link` is unique, so a second
/// insert for either fails and surfaces as an internal error.
#[derive(Debug, Clone)]
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    sweeper: SweeperSlot,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            sweeper: SweeperSlot::default(),
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn get_by_token(&self, token: &str) -> Result<Option<Link>, AppError> {
        sqlx::query_as::<_, Link>(SELECT_BY_TOKEN)
            .bind(token)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn get_by_original_url(&self, original_url: &str) -> Result<Option<Link>, AppError> {
        sqlx::query_as::<_, Link>(SELECT_BY_ORIGINAL_LINK)
            .bind(original_url)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn store(&self, link: &Link) -> Result<(), AppError> {
        sqlx::query(INSERT_LINK)
            .bind(&link.original_url)
            .bind(&link.token)
            .bind(link.expires_at)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(DELETE_EXPIRED)
            .bind(now)
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query(PING)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

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
        self.pool.close().await;
        info!("Database pool closed");
        Ok(())
    }
}
