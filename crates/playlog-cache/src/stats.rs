//! Cache statistics types
//!
//! Consumed by a debug/admin surface; collection is best-effort and never
//! fails the caller.

use serde::Serialize;

/// Combined statistics for both cache tiers
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Remote key-value tier connectivity and size
    pub remote: RemoteStats,
    /// In-memory tier occupancy
    pub memory: MemoryStats,
}

/// Remote tier statistics
///
/// `connected` is `false` whenever the store is unconfigured or any probe
/// fails; the optional fields are then absent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemoteStats {
    pub connected: bool,
    /// Human-readable memory usage as reported by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<String>,
    /// Number of keys in the store's database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys_count: Option<u64>,
}

/// In-memory tier statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryStats {
    /// Current entry count, expired entries included until lazily purged
    pub entries: usize,
}
