//! Debounced document commits.
//!
//! Edits are decoupled from authoritative commits: the handler echoes the
//! submitted document immediately, while the durable write (and everything
//! downstream of it) happens only after a quiet period. Every new
//! submission cancels and restarts the timer, so a burst of keystrokes
//! costs one commit, and only the latest value is ever committed.
//!
//! One `Debouncer` serializes one stream of values; `AutosaveQueue` keeps
//! one per user so concurrent users never coalesce into each other.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::cv::storage::save_document;
use crate::models::cv::CvDocument;

/// Default quiet period before a pending edit is committed.
pub const COMMIT_QUIET_PERIOD: Duration = Duration::from_millis(750);

// ────────────────────────────────────────────────────────────────────────────
// Generic debouncer
// ────────────────────────────────────────────────────────────────────────────

/// A cancellable delayed-commit task: holds at most one pending value and
/// commits it once no new value has arrived for `delay`.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn spawn<F, Fut>(delay: Duration, commit: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        tokio::spawn(async move {
            loop {
                // Wait for the first value of a burst.
                let Some(mut pending) = rx.recv().await else {
                    break;
                };
                // Restart the quiet-period timer on every newer value.
                loop {
                    match tokio::time::timeout(delay, rx.recv()).await {
                        Ok(Some(newer)) => pending = newer,
                        Ok(None) => {
                            commit(pending).await;
                            return;
                        }
                        Err(_elapsed) => {
                            commit(pending).await;
                            break;
                        }
                    }
                }
            }
        });
        Debouncer { tx }
    }

    /// Supersedes any pending value. Returns false when the worker is gone.
    pub fn submit(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-user autosave
// ────────────────────────────────────────────────────────────────────────────

/// Debounced persistence of CV documents, keyed by user.
pub struct AutosaveQueue {
    pool: PgPool,
    delay: Duration,
    debouncers: Mutex<HashMap<Uuid, Debouncer<CvDocument>>>,
}

impl AutosaveQueue {
    pub fn new(pool: PgPool, delay: Duration) -> Self {
        AutosaveQueue {
            pool,
            delay,
            debouncers: Mutex::new(HashMap::new()),
        }
    }

    /// Queues `document` as the user's pending commit, superseding any
    /// earlier pending state for the same user.
    pub fn submit(&self, user_id: Uuid, document: CvDocument) {
        let mut debouncers = self.debouncers.lock().expect("autosave lock poisoned");
        let delivered = match debouncers.get(&user_id) {
            Some(debouncer) => debouncer.submit(document.clone()),
            None => false,
        };
        if !delivered {
            // First submission for this user, or its worker exited; spawn.
            let debouncer = self.spawn_for(user_id);
            debouncer.submit(document);
            debouncers.insert(user_id, debouncer);
        }
    }

    fn spawn_for(&self, user_id: Uuid) -> Debouncer<CvDocument> {
        let pool = self.pool.clone();
        Debouncer::spawn(self.delay, move |document: CvDocument| {
            let pool = pool.clone();
            async move {
                match save_document(&pool, user_id, &document).await {
                    Ok(version) => {
                        debug!(%user_id, version, "autosave committed document version")
                    }
                    Err(e) => error!(%user_id, error = %e, "autosave commit failed"),
                }
            }
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_debouncer(
        delay_ms: u64,
    ) -> (Debouncer<u32>, mpsc::UnboundedReceiver<u32>) {
        let (committed_tx, committed_rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::spawn(Duration::from_millis(delay_ms), move |v: u32| {
            let committed_tx = committed_tx.clone();
            async move {
                let _ = committed_tx.send(v);
            }
        });
        (debouncer, committed_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_commits_after_quiet_period() {
        let (debouncer, mut committed) = make_debouncer(100);
        assert!(debouncer.submit(7));
        assert_eq!(committed.recv().await, Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_commits_only_latest_value() {
        let (debouncer, mut committed) = make_debouncer(100);
        for v in [1, 2, 3] {
            assert!(debouncer.submit(v));
        }
        assert_eq!(
            committed.recv().await,
            Some(3),
            "intermediate edits must be superseded"
        );
        // No further commit for the burst.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(committed.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_submission_restarts_the_timer() {
        let (debouncer, mut committed) = make_debouncer(100);
        assert!(debouncer.submit(1));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(
            committed.try_recv().is_err(),
            "quiet period has not elapsed yet"
        );
        assert!(debouncer.submit(2));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(
            committed.try_recv().is_err(),
            "second submit must have restarted the timer"
        );
        assert_eq!(committed.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_commit_separately() {
        let (debouncer, mut committed) = make_debouncer(100);
        assert!(debouncer.submit(1));
        assert_eq!(committed.recv().await, Some(1));
        assert!(debouncer.submit(2));
        assert_eq!(committed.recv().await, Some(2));
    }
}
