//! Link creation and retrieval service.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, ShortLink};
use crate::domain::expiration_sweeper::deletion_channel;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheError, TokenCache};
use crate::utils::token_generator::TokenSource;
use crate::utils::url_validator::validate_absolute_url;

/// Creation parameters shared by every call.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Lifetime of a new link.
    pub ttl: chrono::Duration,
    /// Token generations allowed per creation before giving up.
    pub max_retries: u32,
    /// Prepended to the token to build the public short URL.
    pub short_link_prefix: String,
}

/// Object-safe view of [`LinkService`] used by the HTTP layer.
#[async_trait]
pub trait ShortLinkUseCase: Send + Sync + 'static {
    async fn create_short_link(&self, original_url: &str) -> Result<ShortLink, AppError>;
    async fn get_original_link(&self, token: &str) -> Result<String, AppError>;
    async fn check_storage(&self) -> Result<(), AppError>;
}

/// Service for creating and resolving expiring short links.
///
/// Creation is idempotent per original URL. New tokens are checked against
/// the existence cache, never against the repository, and registered in the
/// cache only after the link has been persisted.
pub struct LinkService<R: LinkRepository, C: TokenCache, G: TokenSource> {
    repository: Arc<R>,
    cache: Arc<C>,
    generator: G,
    settings: LinkSettings,
}

impl<R: LinkRepository, C: TokenCache, G: TokenSource> LinkService<R, C, G> {
    /// Creates a service without starting any background work.
    pub fn new(repository: Arc<R>, cache: Arc<C>, generator: G, settings: LinkSettings) -> Self {
        Self {
            repository,
            cache,
            generator,
            settings,
        }
    }

    /// Creates a service and connects the repository sweeper to the cache.
    ///
    /// Opens a deletion channel of `deletion_capacity` (at least one slot),
    /// attaches its receiver to the cache and starts the repository sweeper
    /// on `sweep_interval`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::FeedAlreadyAttached`] if the cache is already
    /// wired to another sweeper. The sweeper is not started in that case.
    pub fn start(
        repository: Arc<R>,
        cache: Arc<C>,
        generator: G,
        settings: LinkSettings,
        sweep_interval: Duration,
        deletion_capacity: usize,
    ) -> Result<Self, CacheError> {
        let (deleted_tx, deleted_rx) = deletion_channel(deletion_capacity.max(1));
        cache.attach_deletion_feed(deleted_rx)?;
        repository.start_expiration_sweep(sweep_interval, deleted_tx);

        Ok(Self::new(repository, cache, generator, settings))
    }

    /// Creates a short link for `original_url`, or returns the existing one.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is not an absolute URI
    /// - [`AppError::Conflict`] if every generated token was already in use
    /// - [`AppError::Internal`] on storage failure; the cache is not updated
    pub async fn create_short_link(&self, original_url: &str) -> Result<ShortLink, AppError> {
        validate_absolute_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(existing) = self.repository.get_by_original_url(original_url).await? {
            debug!(token = %existing.token, "Returning existing link");
            return Ok(existing.into_short_link(&self.settings.short_link_prefix));
        }

        let token = self.generate_unique_token().await?;
        let link = Link::new(original_url.to_owned(), token, Utc::now(), self.settings.ttl);

        self.repository.store(&link).await?;
        self.cache.store(&link.token).await;

        metrics::counter!("short_link_links_created_total").increment(1);
        info!(token = %link.token, expires_at = %link.expires_at, "Short link created");

        Ok(link.into_short_link(&self.settings.short_link_prefix))
    }

    /// Resolves `token` to its original URL.
    ///
    /// Expiry is not checked here: a link past its TTL still resolves until
    /// the next sweep deletes it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this token.
    pub async fn get_original_link(&self, token: &str) -> Result<String, AppError> {
        self.repository
            .get_by_token(token)
            .await?
            .map(|link| link.original_url)
            .ok_or_else(AppError::link_not_found)
    }

    /// Draws tokens until one is absent from the cache.
    ///
    /// Makes exactly `max_retries` generations before failing.
    async fn generate_unique_token(&self) -> Result<String, AppError> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            let candidate = self.generator.generate_token();

            if !self.cache.exists(&candidate).await {
                return Ok(candidate);
            }

            metrics::counter!("short_link_token_collisions_total").increment(1);
            debug!(attempt = attempts, "Token collision");

            if attempts >= self.settings.max_retries {
                warn!(attempts, "Token retry budget exhausted");
                return Err(AppError::unable_to_create_link(attempts));
            }
        }
    }
}

#[async_trait]
impl<R: LinkRepository, C: TokenCache, G: TokenSource> ShortLinkUseCase for LinkService<R, C, G> {
    async fn create_short_link(&self, original_url: &str) -> Result<ShortLink, AppError> {
        LinkService::create_short_link(self, original_url).await
    }

    async fn get_original_link(&self, token: &str) -> Result<String, AppError> {
        LinkService::get_original_link(self, token).await
    }

    async fn check_storage(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
