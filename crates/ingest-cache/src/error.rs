//! Cache layer error types

use redis::RedisError;
use thiserror::Error;

/// Cache layer errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Required settings are missing or contradict each other.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A connection URL or sentinel address could not be parsed.
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(#[source] RedisError),

    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns `true` for errors raised while validating configuration.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
