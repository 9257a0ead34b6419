//! # Ingest Configuration
//!
//! Environment-based configuration for the event ingestion service.
//!
//! Every setting has a default, so loading never fails. The result is a plain
//! value: build it once at startup and pass it to whatever needs it.
//!
//! ```rust,ignore
//! let config = ingest_config::Config::from_env();
//! config.log();
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod database;
pub mod env;
pub mod kafka;
pub mod redis;

pub use env::{EnvSource, ProcessEnv};
pub use kafka::KafkaConfig;
pub use redis::RedisConfig;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ingestion HTTP port
    pub port: u16,

    /// Postgres connection URL
    pub database_url: String,

    pub kafka: KafkaConfig,

    /// Caching store
    pub redis: RedisConfig,

    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(env: &impl EnvSource) -> Self {
        Self {
            port: env.parse_or("PORT", 7998),
            database_url: database::database_url(env),
            kafka: KafkaConfig::from_source(env),
            redis: RedisConfig::from_source(env),
            log_level: env.string_or("LOG_LEVEL", "info"),
        }
    }

    /// Log the effective configuration, secrets excluded.
    pub fn log(&self) {
        tracing::info!(
            port = self.port,
            kafka_brokers = ?self.kafka.brokers,
            kafka_topic = %self.kafka.topic,
            kafka_sasl = self.kafka.has_sasl_credentials(),
            redis_use_sentinel = self.redis.use_sentinel,
            redis_url = %self.redis.url,
            redis_master = %self.redis.master_name,
            redis_sentinels = ?self.redis.sentinel_addresses,
            redis_sentinel_auth = self.redis.sentinel_enable_authentication,
            redis_caching_database = self.redis.caching_database,
            "Loaded configuration"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
