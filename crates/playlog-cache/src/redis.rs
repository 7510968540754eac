//! Redis-backed remote tier
//!
//! A single shared connection is established lazily on first use; reconnect
//! and backoff are owned by the client's connection manager. Expiry is
//! delegated to the store itself via per-key TTLs, so this tier needs no
//! manual sweeping. Callers treat every failure here as "tier unavailable"
//! rather than an error worth propagating.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::stats::RemoteStats;
use crate::tier::TierStore;

/// Remote tier backed by a Redis-compatible key-value store
pub struct RedisTier {
    client: redis::Client,
    manager: OnceCell<ConnectionManager>,
}

impl std::fmt::Debug for RedisTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTier")
            .field("connected", &self.manager.initialized())
            .finish_non_exhaustive()
    }
}

impl RedisTier {
    /// Create a tier for the given connection URL
    ///
    /// No connection is attempted yet; the first operation establishes it.
    pub fn new(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            manager: OnceCell::new(),
        })
    }

    /// Build a tier from configuration, yielding `None` when the store is
    /// unconfigured or the URL is rejected
    ///
    /// Callers fall back to [`NullTier`](crate::NullTier) on `None`, keeping
    /// the in-memory tier as the only storage.
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        let url = config.redis_url.as_deref()?;
        match Self::new(url) {
            Ok(tier) => Some(tier),
            Err(error) => {
                warn!(%error, "remote tier disabled: invalid connection URL");
                None
            }
        }
    }

    /// Shared connection handle, established on first call
    async fn connection(&self) -> CacheResult<ConnectionManager> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                debug!("establishing remote tier connection");
                self.client.get_connection_manager().await
            })
            .await
            .map_err(|error| CacheError::Unavailable(error.to_string()))?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl TierStore for RedisTier {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        // SETEX rejects a zero expiry; round sub-second TTLs up
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value.as_ref(), seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }

    async fn stats(&self) -> RemoteStats {
        let Ok(mut conn) = self.connection().await else {
            return RemoteStats::default();
        };
        let ping: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        if ping.is_err() {
            return RemoteStats::default();
        }
        let keys_count = redis::cmd("DBSIZE")
            .query_async::<u64>(&mut conn)
            .await
            .ok();
        let memory_usage = redis::cmd("INFO")
            .arg("memory")
            .query_async::<String>(&mut conn)
            .await
            .ok()
            .and_then(|info| parse_used_memory(&info));
        RemoteStats {
            connected: true,
            memory_usage,
            keys_count,
        }
    }
}

/// Extract `used_memory_human` from an `INFO memory` response
fn parse_used_memory(info: &str) -> Option<String> {
    info.lines()
        .find_map(|line| line.strip_prefix("used_memory_human:"))
        .map(|value| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_used_memory_from_info_section() {
        let info = "# Memory\r\nused_memory:1048576\r\nused_memory_human:1.00M\r\n";
        assert_eq!(parse_used_memory(info), Some("1.00M".to_string()));
    }

    #[test]
    fn test_parse_used_memory_missing_field() {
        assert_eq!(parse_used_memory("# Memory\r\nmaxmemory:0\r\n"), None);
    }

    #[test]
    fn test_invalid_url_disables_tier() {
        let config = CacheConfig::default().with_redis_url("not-a-url");
        assert!(RedisTier::from_config(&config).is_none());
    }

    #[test]
    fn test_unconfigured_store_disables_tier() {
        assert!(RedisTier::from_config(&CacheConfig::default()).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_store_reports_disconnected_stats() {
        // Port 1 is never a Redis server; connection establishment fails
        let tier = RedisTier::new("redis://127.0.0.1:1/0").unwrap();
        let stats = tier.stats().await;
        assert!(!stats.connected);
        assert!(stats.keys_count.is_none());
    }
}
