//! Error types for cache tier operations
//!
//! These errors are internal to the tiers: the [`HybridCache`](crate::HybridCache)
//! facade catches every one of them and degrades to a miss or a no-op.

use thiserror::Error;

/// Result alias for cache tier operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur inside a cache tier
#[derive(Debug, Error)]
pub enum CacheError {
    /// A stored record could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote key-value store rejected an operation or is unreachable
    #[error("Remote tier error: {0}")]
    Remote(#[from] redis::RedisError),

    /// The remote tier is not configured for this process
    #[error("Remote tier unavailable: {0}")]
    Unavailable(String),
}
