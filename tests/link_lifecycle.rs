mod common;

use chrono::Utc;
use short_link::AppError;
use short_link::application::services::LinkService;
use short_link::domain::expiration_sweeper::{TickOutcome, sweep_once};
use short_link::domain::repositories::LinkRepository;
use short_link::infrastructure::cache::{MemoryTokenCache, TokenCache};
use short_link::infrastructure::persistence::InMemoryLinkRepository;
use short_link::utils::token_generator::TokenGenerator;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_create_resolve_and_expire_scenario() {
    let harness = common::create_harness("ab", 3, 5);

    let link = harness
        .service
        .create_short_link("http://example.org")
        .await
        .unwrap();

    assert_eq!(link.token.chars().count(), 3);
    assert!(link.token.chars().all(|c| c == 'a' || c == 'b'));
    assert_eq!(link.short_link, format!("{}{}", common::PREFIX, link.token));

    let again = harness
        .service
        .create_short_link("http://example.org")
        .await
        .unwrap();
    assert_eq!(again.token, link.token);
    assert_eq!(harness.repository.len().await, 1);

    assert_eq!(
        harness.service.get_original_link(&link.token).await.unwrap(),
        "http://example.org"
    );

    let after_ttl = Utc::now() + chrono::Duration::hours(1) + chrono::Duration::seconds(1);
    let outcome = sweep_once(harness.repository.as_ref(), after_ttl, &harness.deleted_tx)
        .await
        .unwrap();
    assert_eq!(outcome, TickOutcome::Swept(1));

    let err = harness
        .service
        .get_original_link(&link.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    assert!(common::wait_until_evicted(&harness.cache, &link.token).await);
}

#[tokio::test]
async fn test_expired_link_resolves_until_swept() {
    let harness =
        common::create_harness_with_ttl("abcdef", 6, 5, chrono::Duration::milliseconds(1));

    let link = harness
        .service
        .create_short_link("https://example.com/stale")
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(link.expires_at < Utc::now());

    // Past its expiry but not yet swept: still resolvable.
    assert_eq!(
        harness.service.get_original_link(&link.token).await.unwrap(),
        "https://example.com/stale"
    );

    let outcome = sweep_once(harness.repository.as_ref(), Utc::now(), &harness.deleted_tx)
        .await
        .unwrap();
    assert_eq!(outcome, TickOutcome::Swept(1));
    assert!(harness.service.get_original_link(&link.token).await.is_err());
}

#[tokio::test]
async fn test_sweep_before_deadline_keeps_link() {
    let harness = common::create_harness("abcdef", 6, 5);

    let link = harness
        .service
        .create_short_link("https://example.com/fresh")
        .await
        .unwrap();

    let outcome = sweep_once(harness.repository.as_ref(), Utc::now(), &harness.deleted_tx)
        .await
        .unwrap();

    assert_eq!(outcome, TickOutcome::Swept(0));
    assert!(harness.service.get_original_link(&link.token).await.is_ok());
    assert!(harness.cache.exists(&link.token).await);
}

#[tokio::test]
async fn test_exhausted_token_space_is_a_conflict() {
    // A one-symbol alphabet of length one has exactly one possible token.
    let harness = common::create_harness("x", 1, 3);

    let first = harness
        .service
        .create_short_link("https://first.example")
        .await
        .unwrap();
    assert_eq!(first.token, "x");

    let err = harness
        .service
        .create_short_link("https://second.example")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
    assert_eq!(harness.repository.len().await, 1);
}

#[tokio::test]
async fn test_swept_token_becomes_reusable() {
    let harness = common::create_harness("x", 1, 3);

    harness
        .service
        .create_short_link("https://first.example")
        .await
        .unwrap();

    let after_ttl = Utc::now() + chrono::Duration::hours(2);
    sweep_once(harness.repository.as_ref(), after_ttl, &harness.deleted_tx)
        .await
        .unwrap();
    assert!(common::wait_until_evicted(&harness.cache, "x").await);

    let second = harness
        .service
        .create_short_link("https://second.example")
        .await
        .unwrap();
    assert_eq!(second.token, "x");
    assert_eq!(
        harness.service.get_original_link("x").await.unwrap(),
        "https://second.example"
    );
}

#[tokio::test]
async fn test_invalid_url_leaves_storage_and_cache_empty() {
    let harness = common::create_harness("ab", 3, 5);

    let err = harness
        .service
        .create_short_link("not a url")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation { .. }));
    assert!(harness.repository.is_empty().await);
    assert!(harness.cache.is_empty().await);
}

#[tokio::test]
async fn test_background_sweeper_retires_links() {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let cache = Arc::new(MemoryTokenCache::new());

    let service = LinkService::start(
        repository.clone(),
        cache.clone(),
        TokenGenerator::default(),
        common::settings(chrono::Duration::milliseconds(50), 10),
        Duration::from_millis(25),
        4,
    )
    .unwrap();

    let link = service
        .create_short_link("https://short-lived.example")
        .await
        .unwrap();
    assert!(cache.exists(&link.token).await);

    assert!(common::wait_until_evicted(&cache, &link.token).await);
    assert!(repository.get_by_token(&link.token).await.unwrap().is_none());

    repository.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_creations_get_distinct_tokens() {
    let harness = common::create_harness("abcdefghijklmnop", 8, 10);

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = harness.service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_short_link(&format!("https://example.com/{i}"))
                .await
                .unwrap()
                .token
        }));
    }

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap());
    }
    tokens.sort();
    tokens.dedup();

    assert_eq!(tokens.len(), 20);
    assert_eq!(harness.cache.len().await, 20);
}
