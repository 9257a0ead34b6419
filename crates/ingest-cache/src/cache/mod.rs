//! # Cache Module
//!
//! The [`Cache`] capability and its backends.
//!
//! Callers hold an `Arc<dyn Cache>` and never see whether the store behind it
//! is a single Redis node, a sentinel-monitored master, or process memory.

pub mod config;
pub mod memory;
pub mod redis_client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

pub use config::{CacheConfig, DEFAULT_EXPIRATION, Topology};
pub use memory::InMemoryCache;
pub use redis_client::RedisCache;

/// Keyed get/set against a store with per-entry expiration.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Look up `key`. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`.
    ///
    /// `None` applies the backend's default expiration. `Some(Duration::ZERO)`
    /// stores the entry without expiry.
    async fn set(&self, key: &str, value: &str, expiration: Option<Duration>) -> Result<()>;

    /// Like [`Cache::get`], but a missing key reads as an empty string.
    async fn get_string(&self, key: &str) -> Result<String> {
        Ok(self.get(key).await?.unwrap_or_default())
    }
}

/// JSON helpers available on every [`Cache`].
#[async_trait]
pub trait CacheExt: Cache {
    /// Get a JSON value from cache
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Set a JSON value in cache
    async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        expiration: Option<Duration>,
    ) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json, expiration).await
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

/// Shared cache handle
pub type SharedCache = Arc<dyn Cache>;

/// Wrap a backend into a shared handle
pub fn shared_cache<C: Cache + 'static>(cache: C) -> SharedCache {
    Arc::new(cache)
}
