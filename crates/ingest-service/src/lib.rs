//! # Event Ingestion Service
//!
//! Startup wiring: configuration is loaded once, turned into a cache client,
//! and both are handed to the ingestion pipeline as plain values.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod telemetry;

use std::time::{Duration, Instant};

use ingest_cache::{Cache, CacheConfig, RedisCache, SharedCache, shared_cache};
use ingest_config::{Config, EnvSource, RedisConfig};

pub use error::{ServiceError, ServiceResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const PROBE_TTL: Duration = Duration::from_secs(5);

/// Everything the pipeline needs from startup
#[derive(Clone)]
pub struct Service {
    pub config: Config,
    pub cache: SharedCache,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Map loaded Redis settings onto the cache client's configuration.
pub fn cache_config(redis: &RedisConfig) -> CacheConfig {
    CacheConfig {
        url: redis.url.clone(),
        use_sentinel: redis.use_sentinel,
        master_name: redis.master_name.clone(),
        sentinel_addresses: redis.sentinel_addresses.clone(),
        sentinel_enable_authentication: redis.sentinel_enable_authentication,
        sentinel_password: redis.sentinel_password.clone(),
        database: redis.caching_database,
    }
}

/// Load configuration from `env` and build the cache client.
///
/// # Errors
///
/// Fails when the Redis settings cannot produce a client.
pub fn bootstrap(env: &impl EnvSource) -> ServiceResult<Service> {
    let config = Config::from_source(env);
    config.log();

    let cache = RedisCache::new(&cache_config(&config.redis))?;
    tracing::info!(topology = ?cache.topology(), "Cache client ready");

    Ok(Service {
        config,
        cache: shared_cache(cache),
    })
}

/// Write a throwaway key and read it back, returning the round-trip time.
///
/// # Errors
///
/// Propagates store errors, or `ProbeMismatch` if the value read back differs.
pub async fn probe_cache(cache: &dyn Cache) -> ServiceResult<Duration> {
    let key = format!("ingest:probe:{}", uuid::Uuid::new_v4());
    let expected = VERSION;

    let started = Instant::now();
    cache.set(&key, expected, Some(PROBE_TTL)).await?;
    let actual = cache.get(&key).await?;
    let elapsed = started.elapsed();

    if actual.as_deref() != Some(expected) {
        return Err(ServiceError::ProbeMismatch { key, actual });
    }

    tracing::debug!(?elapsed, "Cache probe succeeded");
    Ok(elapsed)
}
