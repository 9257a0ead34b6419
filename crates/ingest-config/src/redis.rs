//! Redis settings for the caching store.

use crate::env::EnvSource;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_SENTINEL_PASSWORD: &str = "password";

/// Redis connection configuration
#[derive(Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Direct-mode URL, `REDIS_TLS_URL` then `REDIS_URL`
    pub url: String,
    pub use_sentinel: bool,
    /// Master set name, `REDIS_SENTINEL_SERVICE`
    pub master_name: String,
    pub sentinel_addresses: Vec<String>,
    pub sentinel_enable_authentication: bool,
    pub sentinel_password: String,
    /// `CACHING_REDIS_DATABASE`
    pub caching_database: i64,
}

impl RedisConfig {
    pub fn from_source(env: &impl EnvSource) -> Self {
        Self {
            url: env
                .first_of(&["REDIS_TLS_URL", "REDIS_URL"])
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            use_sentinel: env.bool_or("REDIS_USE_SENTINEL", false),
            master_name: env.string_or("REDIS_SENTINEL_SERVICE", ""),
            sentinel_addresses: env.list("REDIS_SENTINELS"),
            sentinel_enable_authentication: env
                .bool_or("REDIS_SENTINEL_ENABLE_AUTHENTICATION", false),
            sentinel_password: env.string_or("REDIS_SENTINEL_PASSWORD", DEFAULT_SENTINEL_PASSWORD),
            caching_database: env.parse_or("CACHING_REDIS_DATABASE", 0),
        }
    }
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("url", &self.url)
            .field("use_sentinel", &self.use_sentinel)
            .field("master_name", &self.master_name)
            .field("sentinel_addresses", &self.sentinel_addresses)
            .field("sentinel_enable_authentication", &self.sentinel_enable_authentication)
            .field("sentinel_password", &"<redacted>")
            .field("caching_database", &self.caching_database)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = RedisConfig::from_source(&env(&[]));

        assert_eq!(config.url, "redis://localhost:6379");
        assert!(!config.use_sentinel);
        assert!(!config.sentinel_enable_authentication);
        assert_eq!(config.sentinel_password, "password");
        assert_eq!(config.caching_database, 0);
        assert!(config.sentinel_addresses.is_empty());
        assert_eq!(config.master_name, "");
    }

    #[test]
    fn test_tls_url_wins_over_plain_url() {
        let both = env(&[
            ("REDIS_TLS_URL", "rediss://cache:6380"),
            ("REDIS_URL", "redis://cache:6379"),
        ]);
        let empty_tls = env(&[("REDIS_TLS_URL", ""), ("REDIS_URL", "redis://cache:6379")]);

        assert_eq!(RedisConfig::from_source(&both).url, "rediss://cache:6380");
        assert_eq!(RedisConfig::from_source(&empty_tls).url, "redis://cache:6379");
    }

    #[test]
    fn test_sentinel_settings() {
        let config = RedisConfig::from_source(&env(&[
            ("REDIS_USE_SENTINEL", "true"),
            ("REDIS_SENTINEL_SERVICE", "mymaster"),
            ("REDIS_SENTINELS", "s0:26379,s1:26379, s2:26379"),
            ("REDIS_SENTINEL_ENABLE_AUTHENTICATION", "1"),
            ("REDIS_SENTINEL_PASSWORD", "hunter2"),
            ("CACHING_REDIS_DATABASE", "3"),
        ]));

        assert!(config.use_sentinel);
        assert_eq!(config.master_name, "mymaster");
        assert_eq!(config.sentinel_addresses, vec!["s0:26379", "s1:26379", "s2:26379"]);
        assert!(config.sentinel_enable_authentication);
        assert_eq!(config.sentinel_password, "hunter2");
        assert_eq!(config.caching_database, 3);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = RedisConfig::from_source(&env(&[("REDIS_SENTINEL_PASSWORD", "hunter2")]));

        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
