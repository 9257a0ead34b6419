//! # Redis Cache Layer
//!
//! [`RedisCache`] talks to either a single Redis node or a master found
//! through sentinels. The topology is fixed when the client is built; the
//! connection itself is opened on first use.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionLike, ConnectionManager, MultiplexedConnection};
use redis::sentinel::{SentinelClient, SentinelNodeConnectionInfo, SentinelServerType};
use redis::{
    AsyncCommands, Client, Cmd, ConnectionInfo, IntoConnectionInfo, Pipeline, RedisConnectionInfo,
    RedisError, RedisFuture, Value,
};
use tokio::sync::Mutex;

use super::config::{CacheConfig, DEFAULT_EXPIRATION, Topology};
use super::Cache;
use crate::error::{CacheError, Result};

/// Open connection for either topology.
#[derive(Clone)]
enum Connection {
    Direct(ConnectionManager),
    Failover(MultiplexedConnection),
}

impl ConnectionLike for Connection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        match self {
            Self::Direct(conn) => conn.req_packed_command(cmd),
            Self::Failover(conn) => conn.req_packed_command(cmd),
        }
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        offset: usize,
        count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        match self {
            Self::Direct(conn) => conn.req_packed_commands(cmd, offset, count),
            Self::Failover(conn) => conn.req_packed_commands(cmd, offset, count),
        }
    }

    fn get_db(&self) -> i64 {
        match self {
            Self::Direct(conn) => conn.get_db(),
            Self::Failover(conn) => conn.get_db(),
        }
    }
}

enum Source {
    Direct(Client),
    Sentinel(SentinelClient),
}

struct Link {
    source: Source,
    conn: Option<Connection>,
    /// Bumped on every new connection so a stale failure cannot drop a newer one.
    generation: u64,
}

/// Redis-backed [`Cache`]
pub struct RedisCache {
    topology: Topology,
    link: Mutex<Link>,
    default_expiration: Duration,
}

impl RedisCache {
    /// Build a client for the topology selected by `config`.
    ///
    /// Nothing is dialed here; the first `get`/`set` connects.
    ///
    /// # Errors
    ///
    /// `CacheError::Configuration` when the selected topology is missing a
    /// required setting, `CacheError::InvalidUrl` when the URL or a sentinel
    /// address does not parse.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let topology = config.topology();
        let source = match topology {
            Topology::Sentinel => Source::Sentinel(sentinel_client(config)?),
            Topology::Direct => Source::Direct(direct_client(config)?),
        };

        tracing::debug!(?topology, "Redis cache client built");

        Ok(Self {
            topology,
            link: Mutex::new(Link {
                source,
                conn: None,
                generation: 0,
            }),
            default_expiration: DEFAULT_EXPIRATION,
        })
    }

    pub const fn topology(&self) -> Topology {
        self.topology
    }

    pub const fn default_expiration(&self) -> Duration {
        self.default_expiration
    }

    async fn connection(&self) -> Result<(Connection, u64)> {
        let mut guard = self.link.lock().await;
        let link = &mut *guard;
        if let Some(conn) = &link.conn {
            return Ok((conn.clone(), link.generation));
        }

        let conn = match &mut link.source {
            Source::Direct(client) => {
                Connection::Direct(ConnectionManager::new(client.clone()).await?)
            }
            Source::Sentinel(sentinel) => {
                Connection::Failover(sentinel.get_async_connection().await?)
            }
        };
        link.generation += 1;
        tracing::info!(topology = ?self.topology, generation = link.generation, "Connected to Redis");

        link.conn = Some(conn.clone());
        Ok((conn, link.generation))
    }

    /// Drop the cached connection after transport failures so the next call
    /// reconnects (and, behind sentinels, asks for the current master).
    ///
    /// Only the connection from `generation` is discarded; one opened since
    /// by another task is kept.
    async fn fail(&self, err: RedisError, generation: u64) -> CacheError {
        if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
            let mut guard = self.link.lock().await;
            let link = &mut *guard;
            if discard_connection(&mut link.conn, link.generation, generation) {
                tracing::warn!(error = %err, topology = ?self.topology, generation, "Discarding Redis connection");
            }
        }
        CacheError::Redis(err)
    }
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("topology", &self.topology)
            .field("default_expiration", &self.default_expiration)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let (mut conn, generation) = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.fail(err, generation).await),
        }
    }

    async fn set(&self, key: &str, value: &str, expiration: Option<Duration>) -> Result<()> {
        let ttl = expiration.unwrap_or(self.default_expiration);
        let (mut conn, generation) = self.connection().await?;

        let outcome = match ttl_millis(ttl) {
            None => conn.set::<_, _, ()>(key, value).await,
            Some(millis) => conn.pset_ex::<_, _, ()>(key, value, millis).await,
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err, generation).await),
        }
    }
}

/// `PSETEX` milliseconds for `ttl`; `None` stores without expiry.
///
/// Sub-millisecond TTLs round up to 1 ms, since Redis rejects an expire of 0.
fn ttl_millis(ttl: Duration) -> Option<u64> {
    if ttl.is_zero() {
        return None;
    }
    Some(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1))
}

/// Clear `slot` if it still holds the connection from `failed`.
fn discard_connection<C>(slot: &mut Option<C>, current: u64, failed: u64) -> bool {
    if current == failed && slot.is_some() {
        *slot = None;
        true
    } else {
        false
    }
}

fn direct_client(config: &CacheConfig) -> Result<Client> {
    if config.url.is_empty() {
        return Err(CacheError::configuration("redis url is empty"));
    }

    let info = config
        .url
        .as_str()
        .into_connection_info()
        .map_err(CacheError::InvalidUrl)?;
    Client::open(info).map_err(CacheError::InvalidUrl)
}

fn sentinel_client(config: &CacheConfig) -> Result<SentinelClient> {
    if config.sentinel_addresses.is_empty() {
        return Err(CacheError::configuration("redis sentinels is empty"));
    }

    let password = if config.sentinel_enable_authentication {
        if config.sentinel_password.is_empty() {
            return Err(CacheError::configuration(
                "must set REDIS_SENTINEL_PASSWORD when enable redis sentinel authentication",
            ));
        }
        Some(config.sentinel_password.as_str())
    } else {
        None
    };

    let sentinels = config
        .sentinel_addresses
        .iter()
        .map(|addr| sentinel_node(addr, password))
        .collect::<Result<Vec<_>>>()?;

    SentinelClient::build(
        sentinels,
        config.master_name.clone(),
        Some(master_info(config)),
        SentinelServerType::Master,
    )
    .map_err(CacheError::InvalidUrl)
}

/// Connection settings for the master the sentinels resolve. The sentinel
/// password is not carried over.
fn master_info(config: &CacheConfig) -> SentinelNodeConnectionInfo {
    SentinelNodeConnectionInfo {
        tls_mode: None,
        redis_connection_info: Some(RedisConnectionInfo {
            db: config.database,
            ..Default::default()
        }),
    }
}

/// Connection info for one sentinel monitor. Bare `host:port` is accepted.
fn sentinel_node(addr: &str, password: Option<&str>) -> Result<ConnectionInfo> {
    let url = if addr.contains("://") {
        addr.to_string()
    } else {
        format!("redis://{addr}")
    };

    let mut info = url
        .as_str()
        .into_connection_info()
        .map_err(CacheError::InvalidUrl)?;
    if let Some(password) = password {
        info.redis.password = Some(password.to_string());
    }
    Ok(info)
}
