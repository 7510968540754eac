//! Read/write facade over the two cache tiers
//!
//! [`HybridCache`] hides tier selection from callers: the remote tier is
//! authoritative and checked first on read, the in-memory tier is a
//! shorter-lived fallback present in every context. Writes populate both.
//!
//! None of the facade operations panic or return errors. Cache misses are
//! `None`; tier failures are logged and degrade to a miss or a no-op.
//! Concurrent misses for one key are allowed to race; there is no
//! single-flight de-duplication.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::key::CacheKey;
use crate::memory::MemoryTier;
use crate::redis::RedisTier;
use crate::stats::{CacheStats, MemoryStats};
use crate::tier::{NullTier, TierStore};

/// Two-tier cache for JSON-serializable application data
pub struct HybridCache {
    remote: Arc<dyn TierStore>,
    memory: MemoryTier,
    default_ttl: Duration,
}

impl std::fmt::Debug for HybridCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridCache")
            .field("memory_entries", &self.memory.len())
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl HybridCache {
    /// Build a cache from configuration, selecting the remote tier once
    ///
    /// A configured, well-formed Redis URL selects [`RedisTier`]; anything
    /// else selects [`NullTier`] and the cache runs memory-only.
    pub fn from_config(config: &CacheConfig) -> Self {
        let remote: Arc<dyn TierStore> = match RedisTier::from_config(config) {
            Some(tier) => Arc::new(tier),
            None => {
                debug!("remote tier not configured, running memory-only");
                Arc::new(NullTier)
            }
        };
        Self::with_tier(remote, config)
    }

    /// Build a cache with an explicit remote tier implementation
    pub fn with_tier(remote: Arc<dyn TierStore>, config: &CacheConfig) -> Self {
        Self {
            remote,
            memory: MemoryTier::new(
                config.memory_ttl_cap,
                config.memory_max_entries,
                config.memory_eviction_batch,
            ),
            default_ttl: config.default_ttl,
        }
    }

    /// Look up a record, remote tier first
    ///
    /// A valid remote hit returns without touching in-memory state. A
    /// malformed stored record is treated as a miss and purged from the
    /// tier holding it.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.remote.get(key.as_str()).await {
            Ok(Some(raw)) => match serde_json::from_slice(&raw) {
                Ok(value) => return Some(value),
                Err(error) => {
                    warn!(%key, %error, "malformed record in remote tier, purging");
                    if let Err(error) = self.remote.delete(key.as_str()).await {
                        debug!(%key, %error, "failed to purge malformed record");
                    }
                }
            },
            Ok(None) => {}
            Err(error) => debug!(%key, %error, "remote tier read failed"),
        }

        let raw = self.memory.get(key.as_str())?;
        match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(%key, %error, "malformed record in memory tier, purging");
                self.memory.remove(key.as_str());
                None
            }
        }
    }

    /// Store a record with the default TTL
    pub async fn set<T: Serialize>(&self, key: &CacheKey, value: &T) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Store a record in both tiers
    ///
    /// The remote tier receives the requested TTL; the in-memory copy is
    /// clamped by the tier itself. A remote write failure leaves the
    /// in-memory copy in place.
    pub async fn set_with_ttl<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let raw = match serde_json::to_vec(value) {
            Ok(raw) => Bytes::from(raw),
            Err(error) => {
                warn!(%key, %error, "record not cacheable, skipping");
                return;
            }
        };
        if let Err(error) = self.remote.set(key.as_str(), raw.clone(), ttl).await {
            debug!(%key, %error, "remote tier write failed");
        }
        self.memory.insert(key.as_str().to_owned(), raw, ttl);
    }

    /// Remove a record from both tiers unconditionally
    pub async fn delete(&self, key: &CacheKey) {
        if let Err(error) = self.remote.delete(key.as_str()).await {
            debug!(%key, %error, "remote tier delete failed");
        }
        self.memory.remove(key.as_str());
    }

    /// Drop all cached data from both tiers
    ///
    /// Coarse and non-namespaced: the remote flush affects every key in the
    /// store's database, not just this process's.
    pub async fn clear(&self) {
        if let Err(error) = self.remote.clear().await {
            debug!(%error, "remote tier clear failed");
        }
        self.memory.clear();
    }

    /// Best-effort statistics for both tiers
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            remote: self.remote.stats().await,
            memory: MemoryStats {
                entries: self.memory.len(),
            },
        }
    }

    /// Direct handle on the in-memory tier
    pub fn memory(&self) -> &MemoryTier {
        &self.memory
    }
}
