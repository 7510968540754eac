//! Configuration for the two-tier application data cache

use std::env;
use std::time::Duration;

/// Default TTL applied when a caller does not request one (1 hour)
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Hard upper bound on the in-memory tier's TTL (10 minutes)
///
/// The memory tier has no expiry-aware background sweep, so it is kept
/// intentionally shorter-lived than the remote tier.
pub const MEMORY_TTL_CAP: Duration = Duration::from_secs(600);

/// Safety-valve capacity of the in-memory tier
pub const MEMORY_MAX_ENTRIES: usize = 1000;

/// Number of oldest insertions dropped when the valve triggers
pub const MEMORY_EVICTION_BATCH: usize = 100;

/// Configuration for [`HybridCache`](crate::HybridCache)
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Connection URL for the remote key-value store; `None` selects the
    /// no-op tier
    pub redis_url: Option<String>,
    /// TTL used by `set` when the caller does not pass one
    pub default_ttl: Duration,
    /// Clamp applied to the in-memory tier's TTL
    pub memory_ttl_cap: Duration,
    /// Entry count above which the in-memory tier evicts
    pub memory_max_entries: usize,
    /// Number of oldest insertions evicted per valve trigger
    pub memory_eviction_batch: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl: DEFAULT_TTL,
            memory_ttl_cap: MEMORY_TTL_CAP,
            memory_max_entries: MEMORY_MAX_ENTRIES,
            memory_eviction_batch: MEMORY_EVICTION_BATCH,
        }
    }
}

impl CacheConfig {
    /// Build a configuration from environment variables
    ///
    /// `REDIS_URL` takes precedence; otherwise a URL is assembled from
    /// `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD` and `REDIS_DB`. When
    /// neither form is present the remote tier stays disabled and only the
    /// in-memory tier operates.
    pub fn from_env() -> Self {
        let redis_url = env::var("REDIS_URL").ok().or_else(Self::url_from_parts);
        Self {
            redis_url,
            ..Self::default()
        }
    }

    /// Enable the remote tier with an explicit connection URL
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Override the default TTL
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    fn url_from_parts() -> Option<String> {
        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());
        match env::var("REDIS_PASSWORD") {
            Ok(password) => Some(format!("redis://:{password}@{host}:{port}/{db}")),
            Err(_) => Some(format!("redis://{host}:{port}/{db}")),
        }
    }
}
