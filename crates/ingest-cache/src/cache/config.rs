//! Cache client configuration

use std::time::Duration;

/// Expiration applied by `set` when the caller passes `None`.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(10);

/// Which Redis deployment a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// A single, statically addressed node
    Direct,
    /// A master located through sentinel monitors
    Sentinel,
}

/// Redis cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Connection URL for direct mode
    pub url: String,
    /// Locate the master through sentinels instead of `url`
    pub use_sentinel: bool,
    /// Master set name monitored by the sentinels
    pub master_name: String,
    /// Sentinel `host:port` addresses, in order
    pub sentinel_addresses: Vec<String>,
    pub sentinel_enable_authentication: bool,
    pub sentinel_password: String,
    /// Database index selected on the master (sentinel mode)
    pub database: i64,
}

impl CacheConfig {
    /// The topology a client built from this config will use.
    pub const fn topology(&self) -> Topology {
        if self.use_sentinel {
            Topology::Sentinel
        } else {
            Topology::Direct
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            use_sentinel: false,
            master_name: String::new(),
            sentinel_addresses: Vec::new(),
            sentinel_enable_authentication: false,
            sentinel_password: "password".to_string(),
            database: 0,
        }
    }
}
