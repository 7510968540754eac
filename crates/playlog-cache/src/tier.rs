//! Remote tier seam
//!
//! The facade talks to the remote key-value store through [`TierStore`].
//! Two implementations exist: [`RedisTier`](crate::RedisTier) where a store
//! is configured and reachable, and [`NullTier`] everywhere else (browser
//! contexts, processes without Redis configuration). The implementation is
//! selected once at startup rather than re-checked on every call.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::CacheResult;
use crate::stats::RemoteStats;

/// Storage operations the remote tier must provide
#[async_trait]
pub trait TierStore: Send + Sync {
    /// Look up a raw record; `Ok(None)` is a miss, not an error
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>>;

    /// Store a raw record with a per-key expiry
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> CacheResult<()>;

    /// Remove a record if present
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Flush the entire database backing this tier
    ///
    /// Coarse and non-namespaced: affects all cached application data.
    async fn clear(&self) -> CacheResult<()>;

    /// Best-effort connectivity and size report; never fails
    async fn stats(&self) -> RemoteStats;
}

/// No-op tier used when no remote store is available
///
/// Every read misses and every write silently succeeds, leaving the
/// in-memory tier as the only storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTier;

#[async_trait]
impl TierStore for NullTier {
    async fn get(&self, _key: &str) -> CacheResult<Option<Bytes>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Bytes, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        Ok(())
    }

    async fn stats(&self) -> RemoteStats {
        RemoteStats::default()
    }
}
