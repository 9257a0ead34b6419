//! # Ingest Cache Library
//!
//! Key-value cache used by the event ingestion service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Ingestion Pipeline                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  Arc<dyn Cache>
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Cache trait (get / set)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │       RedisCache        │   │        InMemoryCache         │
//! │  (direct or sentinel)   │   │     (tests, local runs)      │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ingest_cache::{Cache, CacheConfig, RedisCache, shared_cache};
//!
//! let cache = shared_cache(RedisCache::new(&CacheConfig::default())?);
//!
//! cache.set("foo", "bar", None).await?;
//! assert_eq!(cache.get("foo").await?.as_deref(), Some("bar"));
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;

// Re-export commonly used types
pub use cache::{
    Cache, CacheConfig, CacheExt, DEFAULT_EXPIRATION, InMemoryCache, RedisCache, SharedCache,
    Topology, shared_cache,
};
pub use error::{CacheError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
