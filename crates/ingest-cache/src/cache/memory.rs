//! In-process [`Cache`] for tests and local runs without Redis.
//!
//! Expiry uses `tokio::time::Instant`, so paused-clock tests can advance past
//! a TTL without sleeping. Expired entries are dropped when next read, and
//! every [`SWEEP_INTERVAL`] writes all expired entries are swept.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::Cache;
use super::config::DEFAULT_EXPIRATION;
use crate::error::Result;

/// Writes between full sweeps of expired entries.
pub const SWEEP_INTERVAL: usize = 1024;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

#[derive(Debug, Default)]
struct Store {
    entries: HashMap<String, Entry>,
    writes: usize,
}

impl Store {
    fn sweep(&mut self, now: Instant) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        let swept = before - self.entries.len();
        if swept > 0 {
            tracing::trace!(swept, remaining = self.entries.len(), "Swept expired entries");
        }
    }
}

/// Process-local key-value store with per-entry expiration
#[derive(Debug)]
pub struct InMemoryCache {
    store: RwLock<Store>,
    default_expiration: Duration,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_default_expiration(DEFAULT_EXPIRATION)
    }

    pub fn with_default_expiration(default_expiration: Duration) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            default_expiration,
        }
    }

    /// Number of entries held, including expired ones not yet swept
    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.entries.is_empty()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        {
            let store = self.store.read().await;
            match store.entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut store = self.store.write().await;
        if store.entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            store.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, expiration: Option<Duration>) -> Result<()> {
        let now = Instant::now();
        let ttl = expiration.unwrap_or(self.default_expiration);
        let expires_at = (!ttl.is_zero()).then(|| now + ttl);

        let mut store = self.store.write().await;
        store.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );

        store.writes += 1;
        if store.writes >= SWEEP_INTERVAL {
            store.writes = 0;
            store.sweep(now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[tokio::test]
    async fn test_never_set_key_is_absent() {
        let cache = InMemoryCache::new();

        assert_eq!(cache.get("foo").await.unwrap(), None);
        assert_eq!(cache.get_string("foo").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = InMemoryCache::new();

        cache.set("foo", "bar", None).await.unwrap();

        assert_eq!(cache.get("foo").await.unwrap().as_deref(), Some("bar"));
    }

    #[tokio::test]
    async fn test_empty_value_differs_from_absent() {
        let cache = InMemoryCache::new();

        cache.set("empty", "", None).await.unwrap();

        assert_eq!(cache.get("empty").await.unwrap(), Some(String::new()));
        assert_eq!(cache.get("absent").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_expiration_window() {
        let cache = InMemoryCache::new();
        let value: String = Faker.fake();

        cache.set("event:1", &value, None).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(cache.get("event:1").await.unwrap(), Some(value));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("event:1").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_expiration_overrides_default() {
        let cache = InMemoryCache::new();

        cache
            .set("short", "v", Some(Duration::from_millis(500)))
            .await
            .unwrap();
        cache
            .set("long", "v", Some(Duration::from_secs(60)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(cache.get("short").await.unwrap(), None);
        assert_eq!(cache.get("long").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_expiration_never_expires() {
        let cache = InMemoryCache::new();

        cache.set("pinned", "v", Some(Duration::ZERO)).await.unwrap();
        tokio::time::advance(Duration::from_secs(3600)).await;

        assert_eq!(cache.get("pinned").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_round_trip_random_values() {
        let cache = InMemoryCache::new();

        for i in 0..20 {
            let key = format!("event:{i}");
            let value: String = Faker.fake();
            cache.set(&key, &value, None).await.unwrap();
            assert_eq!(cache.get(&key).await.unwrap(), Some(value));
        }
        assert_eq!(cache.len().await, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_unread_keys_are_swept() {
        let cache = InMemoryCache::new();

        for i in 0..SWEEP_INTERVAL - 1 {
            cache
                .set(&format!("event:{i}"), "v", Some(Duration::from_millis(50)))
                .await
                .unwrap();
        }
        cache.set("pinned", "v", Some(Duration::ZERO)).await.unwrap();
        assert_eq!(cache.len().await, SWEEP_INTERVAL);

        tokio::time::advance(Duration::from_secs(1)).await;
        cache.set("fresh", "v", None).await.unwrap();

        for i in 0..SWEEP_INTERVAL - 1 {
            cache
                .set(&format!("later:{i}"), "v", Some(Duration::from_millis(50)))
                .await
                .unwrap();
        }

        // The `event:*` keys were never read again; only the sweep removes them.
        assert_eq!(cache.len().await, SWEEP_INTERVAL + 1);
        assert_eq!(cache.get_string("pinned").await.unwrap(), "v");
    }

    #[tokio::test]
    async fn test_overwrite_keeps_last_value() {
        let cache = InMemoryCache::new();

        cache.set("foo", "first", None).await.unwrap();
        cache.set("foo", "second", None).await.unwrap();

        assert_eq!(cache.get_string("foo").await.unwrap(), "second");
    }
}
