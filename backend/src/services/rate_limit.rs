use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use tokio::task::JoinHandle;

/// Counter state for one `{bucket}-{client}` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitEntry {
    fn fresh(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now + window_delta(window),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.reset_at
    }

    /// Fixed-window transition: start a new window once the old one elapsed,
    /// otherwise count the hit. The count stops at `max + 1` so a client
    /// hammering a closed window cannot overflow it.
    fn advance(self, max_requests: u32, window: Duration, now: DateTime<Utc>) -> Self {
        if self.is_expired(now) {
            Self::fresh(now, window)
        } else {
            Self {
                count: self.count.saturating_add(1).min(max_requests.saturating_add(1)),
                reset_at: self.reset_at,
            }
        }
    }
}

// Windows too large for chrono are capped at a year.
fn window_delta(window: Duration) -> chrono::Duration {
    chrono::Duration::from_std(window)
        .unwrap_or_else(|_| chrono::Duration::days(365))
        .min(chrono::Duration::days(365))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, never less than one.
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_at - now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1000).max(1)
    }
}

/// Backing table for rate-limit counters.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<RateLimitEntry>>;

    async fn set(&self, key: &str, entry: RateLimitEntry) -> anyhow::Result<()>;

    /// Records one request for `key` and returns the updated entry.
    ///
    /// The default is a plain get-then-set. Stores shared between concurrent
    /// callers should override it with an atomic read-modify-write.
    async fn hit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RateLimitEntry> {
        let next = match self.get(key).await? {
            Some(entry) => entry.advance(max_requests, window, now),
            None => RateLimitEntry::fresh(now, window),
        };
        self.set(key, next).await?;
        Ok(next)
    }

    /// Drops every entry whose window has elapsed; returns how many were removed.
    async fn remove_expired(&self, now: DateTime<Utc>) -> anyhow::Result<usize>;
}

/// Process-local store. Each key's update runs under its shard lock.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: DashMap<String, RateLimitEntry>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<RateLimitEntry>> {
        Ok(self.entries.get(key).map(|entry| *entry))
    }

    async fn set(&self, key: &str, entry: RateLimitEntry) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn hit(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RateLimitEntry> {
        let updated = match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let next = occupied.get().advance(max_requests, window, now);
                occupied.insert(next);
                next
            }
            Entry::Vacant(vacant) => *vacant.insert(RateLimitEntry::fresh(now, window)),
        };
        Ok(updated)
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before.saturating_sub(self.entries.len()))
    }
}

/// Fixed-window limiter over an injected [`RateLimitStore`].
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRateLimitStore::new()))
    }

    pub async fn allow(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
    ) -> anyhow::Result<RateLimitDecision> {
        self.allow_at(key, max_requests, window, Utc::now()).await
    }

    pub async fn allow_at(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RateLimitDecision> {
        let limit = max_requests.max(1);
        let entry = self.store.hit(key, limit, window, now).await?;
        let allowed = entry.count <= limit;
        Ok(RateLimitDecision {
            allowed,
            limit,
            remaining: if allowed { limit - entry.count } else { 0 },
            reset_at: entry.reset_at,
        })
    }

    pub async fn sweep(&self) -> anyhow::Result<usize> {
        self.sweep_at(Utc::now()).await
    }

    pub async fn sweep_at(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
        self.store.remove_expired(now).await
    }

    /// Starts the periodic sweep of elapsed windows. Runs until the runtime shuts down.
    pub fn spawn_cleanup(&self, every: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match limiter.sweep().await {
                    Ok(0) => {}
                    Ok(removed) => tracing::debug!(removed, "Swept expired rate limit entries"),
                    Err(err) => tracing::warn!(error = %err, "Rate limit sweep failed"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const WINDOW: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn first_hit_opens_window() {
        let store = InMemoryRateLimitStore::new();
        let now = Utc::now();
        let entry = store.hit("login-1.1.1.1", 5, WINDOW, now).await.unwrap();
        assert_eq!(entry.count, 1);
        assert_eq!(entry.reset_at, now + chrono::Duration::seconds(60));
    }

    #[tokio::test]
    async fn count_saturates_one_past_limit() {
        let store = InMemoryRateLimitStore::new();
        let now = Utc::now();
        for _ in 0..20 {
            store.hit("k", 3, WINDOW, now).await.unwrap();
        }
        assert_eq!(store.get("k").await.unwrap().unwrap().count, 4);
    }

    #[tokio::test]
    async fn reset_happens_exactly_at_reset_time() {
        let store = InMemoryRateLimitStore::new();
        let now = Utc::now();
        store.hit("k", 1, WINDOW, now).await.unwrap();
        store.hit("k", 1, WINDOW, now).await.unwrap();

        let at_reset = now + chrono::Duration::seconds(60);
        let entry = store.hit("k", 1, WINDOW, at_reset).await.unwrap();
        assert_eq!(entry.count, 1);
        assert_eq!(entry.reset_at, at_reset + chrono::Duration::seconds(60));
    }

    #[tokio::test]
    async fn remove_expired_keeps_live_windows() {
        let store = InMemoryRateLimitStore::new();
        let now = Utc::now();
        store.hit("old", 5, Duration::from_secs(1), now).await.unwrap();
        store.hit("live", 5, WINDOW, now).await.unwrap();

        let removed = store
            .remove_expired(now + chrono::Duration::seconds(2))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.get("old").await.unwrap().is_none());
        assert!(store.get("live").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn concurrent_hits_are_all_counted() {
        let limiter = RateLimiter::in_memory();
        let now = Utc::now();
        let mut handles = Vec::new();
        for _ in 0..50 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.allow_at("k", 100, WINDOW, now).await.unwrap()
            }));
        }
        let mut remaining = Vec::new();
        for handle in handles {
            remaining.push(handle.await.unwrap().remaining);
        }
        remaining.sort_unstable();
        let expected: Vec<u32> = (50..100).collect();
        assert_eq!(remaining, expected);
    }

    #[test]
    fn retry_after_rounds_up_and_is_at_least_one() {
        let now = Utc::now();
        let decision = RateLimitDecision {
            allowed: false,
            limit: 5,
            remaining: 0,
            reset_at: now + chrono::Duration::milliseconds(1500),
        };
        assert_eq!(decision.retry_after_secs(now), 2);
        assert_eq!(decision.retry_after_secs(now + chrono::Duration::seconds(10)), 1);
    }

    /// Store with only get/set, exercising the trait's default `hit`.
    #[derive(Default)]
    struct PlainStore {
        inner: Mutex<std::collections::HashMap<String, RateLimitEntry>>,
    }

    #[async_trait]
    impl RateLimitStore for PlainStore {
        async fn get(&self, key: &str) -> anyhow::Result<Option<RateLimitEntry>> {
            Ok(self.inner.lock().unwrap().get(key).copied())
        }

        async fn set(&self, key: &str, entry: RateLimitEntry) -> anyhow::Result<()> {
            self.inner.lock().unwrap().insert(key.to_string(), entry);
            Ok(())
        }

        async fn remove_expired(&self, now: DateTime<Utc>) -> anyhow::Result<usize> {
            let mut inner = self.inner.lock().unwrap();
            let before = inner.len();
            inner.retain(|_, entry| !entry.is_expired(now));
            Ok(before - inner.len())
        }
    }

    #[tokio::test]
    async fn default_hit_follows_same_window_rules() {
        let limiter = RateLimiter::new(Arc::new(PlainStore::default()));
        let now = Utc::now();
        let remaining: Vec<u32> = {
            let mut out = Vec::new();
            for _ in 0..3 {
                out.push(limiter.allow_at("k", 3, WINDOW, now).await.unwrap().remaining);
            }
            out
        };
        assert_eq!(remaining, vec![2, 1, 0]);
        assert!(!limiter.allow_at("k", 3, WINDOW, now).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn zero_limit_is_treated_as_one() {
        let limiter = RateLimiter::in_memory();
        let now = Utc::now();
        let first = limiter.allow_at("k", 0, WINDOW, now).await.unwrap();
        assert!(first.allowed);
        assert_eq!(first.limit, 1);
        assert!(!limiter.allow_at("k", 0, WINDOW, now).await.unwrap().allowed);
    }
}
