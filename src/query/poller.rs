//! Interval polling for mounted views.
//!
//! A [`Poller`] owns the background refetch task for one query key. While a
//! view holds it, the key is refetched on a fixed interval and snapshots
//! are published through a watch channel; dropping it cancels the task and
//! discards any in-flight result, which is what "unmounting" means here.

use super::{QueryCache, QueryError, QueryKey};
use crate::api::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// What a polling view currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<T> {
    pub data: Option<T>,
    /// True while `data` is a stale stand-in (a sibling page, or the last
    /// good value after a failed refetch) rather than this key's fresh value.
    pub is_placeholder: bool,
    /// Message of the most recent failed refetch, cleared on success.
    pub error: Option<String>,
}

impl<T> QuerySnapshot<T> {
    fn empty() -> Self {
        Self {
            data: None,
            is_placeholder: false,
            error: None,
        }
    }
}

/// Handle owning a polling task. Dropping it stops the polling.
pub struct Poller {
    cancel: CancellationToken,
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl QueryCache {
    /// Refetch a key unconditionally (used by pollers), still serializing
    /// with any other fetch of the same key.
    pub async fn refetch<T, F, Fut>(
        self: &Arc<Self>,
        key: QueryKey,
        fetcher: F,
    ) -> Result<T, QueryError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.invalidate(&key);
        Ok(self.fetch(key, fetcher).await?.data)
    }

    /// Start polling a key on a fixed interval.
    ///
    /// The receiver's initial snapshot carries whatever the cache can serve
    /// immediately: this key's cached value, or for paginated keys the most
    /// recent sibling page flagged `is_placeholder`. The first refetch then
    /// replaces the placeholder exactly once.
    pub fn poll<T, F, Fut>(
        self: &Arc<Self>,
        key: QueryKey,
        every: Duration,
        fetcher: F,
    ) -> (Poller, watch::Receiver<QuerySnapshot<T>>)
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send,
    {
        let initial = match self.peek::<T>(&key) {
            Some(data) => QuerySnapshot {
                data: Some(data),
                is_placeholder: false,
                error: None,
            },
            None => match self.placeholder_for::<T>(&key) {
                Some(data) => QuerySnapshot {
                    data: Some(data),
                    is_placeholder: true,
                    error: None,
                },
                None => QuerySnapshot::empty(),
            },
        };

        let (tx, rx) = watch::channel(initial);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let cache = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            tracing::debug!(key = %key, interval_ms = every.as_millis() as u64, "Polling started");

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let outcome = tokio::select! {
                    // Cancellation mid-fetch drops the future; the in-flight
                    // result is discarded with it.
                    _ = task_cancel.cancelled() => break,
                    outcome = cache.refetch(key.clone(), &fetcher) => outcome,
                };

                let snapshot = match outcome {
                    Ok(data) => QuerySnapshot {
                        data: Some(data),
                        is_placeholder: false,
                        error: None,
                    },
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Refetch failed");
                        let previous = tx.borrow().clone();
                        QuerySnapshot {
                            is_placeholder: previous.data.is_some(),
                            error: Some(e.to_string()),
                            data: previous.data,
                        }
                    }
                };

                if tx.send(snapshot).is_err() {
                    break; // all receivers gone
                }
            }

            tracing::debug!(key = %key, "Polling stopped");
        });

        (Poller { cancel }, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_poll_emits_fresh_snapshots() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        let (_poller, mut rx) = cache.poll(
            QueryKey::DashboardStats,
            Duration::from_millis(10),
            move || {
                let calls = Arc::clone(&calls_clone);
                async move { Ok(calls.fetch_add(1, Ordering::SeqCst) as u32) }
            },
        );

        rx.changed().await.unwrap();
        let first = rx.borrow_and_update().clone();
        assert_eq!(first.data, Some(0));
        assert!(!first.is_placeholder);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().data, Some(1));
    }

    #[tokio::test]
    async fn test_page_change_serves_placeholder_then_replaces_once() {
        let cache = Arc::new(QueryCache::new());

        // Page 1 already cached, as after browsing the first page.
        let ticket = cache.begin(&QueryKey::Monitors { page: 1 });
        cache.complete(&ticket, &vec!["old-a".to_string(), "old-b".to_string()]).unwrap();

        let (_poller, mut rx) = cache.poll(
            QueryKey::Monitors { page: 2 },
            Duration::from_millis(10),
            || async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(vec!["new-a".to_string()])
            },
        );

        // Previous page's data visible while page 2 loads.
        let initial = rx.borrow().clone();
        assert_eq!(initial.data.as_deref(), Some(&["old-a".to_string(), "old-b".to_string()][..]));
        assert!(initial.is_placeholder);

        // Replaced exactly once by the resolved page.
        rx.changed().await.unwrap();
        let fresh = rx.borrow_and_update().clone();
        assert_eq!(fresh.data.as_deref(), Some(&["new-a".to_string()][..]));
        assert!(!fresh.is_placeholder);
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        let (poller, mut rx) = cache.poll(
            QueryKey::Channels,
            Duration::from_millis(5),
            move || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1u32)
                }
            },
        );

        rx.changed().await.unwrap();
        drop(poller);
        tokio::time::sleep(Duration::from_millis(40)).await;

        let after_drop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_last_data_as_placeholder() {
        let cache = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        let (_poller, mut rx) = cache.poll(
            QueryKey::MonitorStats(7),
            Duration::from_millis(10),
            move || {
                let n = calls_clone.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Ok(10u32)
                    } else {
                        Err(ApiError::Network("down".to_string()))
                    }
                }
            },
        );

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().data, Some(10));

        rx.changed().await.unwrap();
        let degraded = rx.borrow_and_update().clone();
        assert_eq!(degraded.data, Some(10)); // last good value retained
        assert!(degraded.is_placeholder);
        assert!(degraded.error.is_some());
    }
}
