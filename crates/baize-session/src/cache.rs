use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::LoadState;

#[derive(Debug, Clone)]
enum Slot {
    Loading,
    Ready(String),
}

/// Outcome of asking the cache for a subject's advice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advice {
    Ready(String),
    /// A request for this subject is already in flight.
    Pending,
}

/// Per-subject, at-most-once memo of advisory text.
///
/// Each subject owns its own slot, so different subjects can be fetched
/// concurrently. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct AdviceCache {
    slots: Mutex<HashMap<String, Slot>>,
}

/// Clears a `Loading` slot if the fetch is dropped before it resolves, so a
/// cancelled request does not leave the subject stuck.
struct LoadingGuard<'a> {
    cache: &'a AdviceCache,
    key: &'a str,
    armed: bool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.slots().remove(self.key);
        }
    }
}

impl AdviceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.slots().get(key) {
            Some(Slot::Ready(text)) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn state(&self, key: &str) -> LoadState {
        match self.slots().get(key) {
            None => LoadState::Idle,
            Some(Slot::Loading) => LoadState::Loading,
            Some(Slot::Ready(_)) => LoadState::Success,
        }
    }

    pub fn len(&self) -> usize {
        self.slots()
            .values()
            .filter(|s| matches!(s, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached text, or run `fetch` once and remember its result.
    ///
    /// Returns [`Advice::Pending`] without calling `fetch` when another call
    /// for the same key is still loading.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Advice
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = String>,
    {
        {
            let mut slots = self.slots();
            match slots.get(key) {
                Some(Slot::Ready(text)) => return Advice::Ready(text.clone()),
                Some(Slot::Loading) => return Advice::Pending,
                None => {
                    slots.insert(key.to_string(), Slot::Loading);
                }
            }
        }

        let mut guard = LoadingGuard {
            cache: self,
            key,
            armed: true,
        };
        let text = fetch().await;
        guard.armed = false;

        self.slots().insert(key.to_string(), Slot::Ready(text.clone()));
        tracing::debug!(key, "advice cached");
        Advice::Ready(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_fetches_once_per_key() {
        let cache = AdviceCache::new();
        let calls = AtomicU32::new(0);

        for _ in 0..3 {
            let advice = cache
                .get_or_fetch("1", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    "Balanced for break-building.".to_string()
                })
                .await;
            assert_eq!(advice, Advice::Ready("Balanced for break-building.".into()));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.state("1"), LoadState::Success);
        assert_eq!(cache.state("2"), LoadState::Idle);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_in_flight_key_is_pending() {
        let cache = AdviceCache::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<String>();

        let first = cache.get_or_fetch("line-up", move || async move { rx.await.unwrap_or_default() });
        let second = async {
            // Runs after `first` has claimed the slot and parked on the channel.
            tokio::task::yield_now().await;
            assert_eq!(cache.state("line-up"), LoadState::Loading);
            let advice = cache
                .get_or_fetch("line-up", || async { "second dispatch".to_string() })
                .await;
            tx.send("Stay down on the shot.".into()).unwrap();
            advice
        };

        let (first, second) = tokio::join!(first, second);
        assert_eq!(second, Advice::Pending);
        assert_eq!(first, Advice::Ready("Stay down on the shot.".into()));
    }

    #[tokio::test]
    async fn test_dropped_fetch_releases_slot() {
        let cache = AdviceCache::new();
        {
            let fetch = cache.get_or_fetch("7", || std::future::pending::<String>());
            let _ = tokio::time::timeout(std::time::Duration::from_millis(5), fetch).await;
        }
        assert_eq!(cache.state("7"), LoadState::Idle);
    }
}
