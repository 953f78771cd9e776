#![allow(dead_code)]

use axum::{Router, routing::get};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use short_link::api::handlers::health_handler;
use short_link::api::routes::link_routes;
use short_link::application::services::{LinkService, LinkSettings};
use short_link::config::StorageBackend;
use short_link::domain::expiration_sweeper::{DeletionSender, deletion_channel};
use short_link::infrastructure::cache::{MemoryTokenCache, TokenCache};
use short_link::infrastructure::persistence::InMemoryLinkRepository;
use short_link::state::AppState;
use short_link::utils::token_generator::TokenGenerator;

pub const PREFIX: &str = "http://localhost:8080/url/";

pub type MemoryLinkService = LinkService<InMemoryLinkRepository, MemoryTokenCache, TokenGenerator>;

/// Service on the in-memory backend with the deletion feed wired by hand,
/// so tests can drive sweeps through the returned sender.
pub struct Harness {
    pub service: Arc<MemoryLinkService>,
    pub repository: Arc<InMemoryLinkRepository>,
    pub cache: Arc<MemoryTokenCache>,
    pub deleted_tx: DeletionSender,
}

pub fn settings(ttl: chrono::Duration, max_retries: u32) -> LinkSettings {
    LinkSettings {
        ttl,
        max_retries,
        short_link_prefix: PREFIX.to_string(),
    }
}

pub fn create_harness(alphabet: &str, length: usize, max_retries: u32) -> Harness {
    create_harness_with_ttl(alphabet, length, max_retries, chrono::Duration::hours(1))
}

pub fn create_harness_with_ttl(
    alphabet: &str,
    length: usize,
    max_retries: u32,
    ttl: chrono::Duration,
) -> Harness {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let cache = Arc::new(MemoryTokenCache::new());

    let (deleted_tx, deleted_rx) = deletion_channel(4);
    cache.attach_deletion_feed(deleted_rx).unwrap();

    let service = Arc::new(LinkService::new(
        repository.clone(),
        cache.clone(),
        TokenGenerator::new(alphabet, length).unwrap(),
        settings(ttl, max_retries),
    ));

    Harness {
        service,
        repository,
        cache,
        deleted_tx,
    }
}

/// State backed by a started in-memory service, as the server builds it.
pub fn create_memory_state() -> AppState {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let cache = Arc::new(MemoryTokenCache::new());

    let service = LinkService::start(
        repository,
        cache.clone(),
        TokenGenerator::default(),
        settings(chrono::Duration::hours(1), 10),
        Duration::from_secs(3600),
        4,
    )
    .unwrap();

    AppState::new(Arc::new(service), cache, StorageBackend::Memory)
}

pub fn create_test_app(state: AppState) -> Router {
    link_routes()
        .route("/health", get(health_handler))
        .with_state(state)
}

pub async fn wait_until_evicted(cache: &MemoryTokenCache, token: &str) -> bool {
    for _ in 0..200 {
        if !cache.exists(token).await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

pub async fn insert_link(pool: &PgPool, token: &str, url: &str, expires_at: DateTime<Utc>) {
    sqlx::query("INSERT INTO short_link (original_link, token, expires_at) VALUES ($1, $2, $3)")
        .bind(url)
        .bind(token)
        .bind(expires_at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn count_links(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM short_link")
        .fetch_one(pool)
        .await
        .unwrap()
}
