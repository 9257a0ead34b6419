//! # Service Error Types

use thiserror::Error;

/// Startup errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Cache error: {0}")]
    Cache(#[from] ingest_cache::CacheError),

    #[error("Cache probe read back {actual:?} for key '{key}'")]
    ProbeMismatch { key: String, actual: Option<String> },
}

/// Result type alias for service startup
pub type ServiceResult<T> = Result<T, ServiceError>;
