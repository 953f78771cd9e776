//! Periodic removal of expired links.
//!
//! Each repository backend spawns [`run_expiration_sweeper`] from its
//! `start_expiration_sweep`. A tick deletes everything with
//! `expires_at <= now` and publishes the deleted tokens as one batch on the
//! deletion channel, where the token cache listener consumes it.
//!
//! Publication is an awaited send on a bounded channel for every backend: a
//! slow listener delays the next tick instead of losing a batch. Empty
//! batches are not published.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Producer side of the deletion feed.
pub type DeletionSender = mpsc::Sender<Vec<String>>;
/// Consumer side of the deletion feed.
pub type DeletionReceiver = mpsc::Receiver<Vec<String>>;

/// Creates the bounded channel connecting a sweeper to a cache listener.
pub fn deletion_channel(capacity: usize) -> (DeletionSender, DeletionReceiver) {
    mpsc::channel(capacity)
}

/// Result of a single sweep tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Number of links removed and published.
    Swept(usize),
    /// Links were removed but the listener is gone; the sweeper should stop.
    FeedClosed,
}

/// Runs one sweep: deletes links expired at `now` and publishes their tokens.
///
/// # Errors
///
/// Returns the repository error if the deletion fails. Nothing is published
/// in that case.
pub async fn sweep_once<R>(
    repository: &R,
    now: DateTime<Utc>,
    deleted_tx: &DeletionSender,
) -> Result<TickOutcome, AppError>
where
    R: LinkRepository + ?Sized,
{
    let deleted = repository.delete_expired(now).await?;
    let count = deleted.len();

    if count == 0 {
        return Ok(TickOutcome::Swept(0));
    }

    metrics::counter!("short_link_links_expired_total").increment(count as u64);

    if deleted_tx.send(deleted).await.is_err() {
        return Ok(TickOutcome::FeedClosed);
    }

    Ok(TickOutcome::Swept(count))
}

/// Sweeps `repository` every `interval` until the deletion feed closes.
///
/// The first sweep happens one full interval after start. Ticks that fall
/// behind are delayed, never bursted.
pub async fn run_expiration_sweeper<R>(repository: R, interval: Duration, deleted_tx: DeletionSender)
where
    R: LinkRepository,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    info!(interval_secs = interval.as_secs_f64(), "Expiration sweeper started");

    loop {
        ticker.tick().await;

        match sweep_once(&repository, Utc::now(), &deleted_tx).await {
            Ok(TickOutcome::Swept(0)) => debug!("Expiration sweep found nothing to delete"),
            Ok(TickOutcome::Swept(count)) => info!(count, "Expired links deleted"),
            Ok(TickOutcome::FeedClosed) => {
                warn!("Deletion feed closed, stopping expiration sweeper");
                break;
            }
            Err(e) => warn!(error = %e, "Expiration sweep failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use serde_json::json;

    #[tokio::test]
    async fn test_sweep_publishes_deleted_tokens() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_expired()
            .times(1)
            .returning(|_| Ok(vec!["aaa".to_string(), "bbb".to_string()]));

        let (tx, mut rx) = deletion_channel(4);
        let outcome = sweep_once(&repo, Utc::now(), &tx).await.unwrap();

        assert_eq!(outcome, TickOutcome::Swept(2));
        assert_eq!(rx.recv().await.unwrap(), vec!["aaa", "bbb"]);
    }

    #[tokio::test]
    async fn test_sweep_skips_empty_batch() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_expired()
            .times(1)
            .returning(|_| Ok(vec![]));

        let (tx, mut rx) = deletion_channel(4);
        let outcome = sweep_once(&repo, Utc::now(), &tx).await.unwrap();

        assert_eq!(outcome, TickOutcome::Swept(0));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sweep_error_publishes_nothing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_expired()
            .times(1)
            .returning(|_| Err(AppError::internal("boom", json!({}))));

        let (tx, mut rx) = deletion_channel(4);
        let result = sweep_once(&repo, Utc::now(), &tx).await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sweep_reports_closed_feed() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_expired()
            .times(1)
            .returning(|_| Ok(vec!["aaa".to_string()]));

        let (tx, rx) = deletion_channel(4);
        drop(rx);

        let outcome = sweep_once(&repo, Utc::now(), &tx).await.unwrap();
        assert_eq!(outcome, TickOutcome::FeedClosed);
    }

    #[tokio::test]
    async fn test_sweeper_passes_current_time() {
        let before = Utc::now();
        let mut repo = MockLinkRepository::new();
        repo.expect_delete_expired()
            .withf(move |now| *now >= before)
            .returning(|_| Ok(vec!["tok".to_string()]));

        let (tx, mut rx) = deletion_channel(1);
        let handle = tokio::spawn(run_expiration_sweeper(
            repo,
            Duration::from_millis(20),
            tx,
        ));

        let batch = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("sweeper did not tick")
            .unwrap();
        assert_eq!(batch, vec!["tok"]);

        drop(rx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("sweeper did not stop after the feed closed")
            .unwrap();
    }
}
