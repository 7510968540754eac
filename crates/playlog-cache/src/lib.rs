//! Two-tier application data cache for playlog game records
//!
//! This crate provides a read-through/write-through cache for structured
//! (JSON-serializable) application data such as game records, search results,
//! and user profiles. Two storage tiers compose the cache:
//!
//! - An **in-memory tier** that is always available, with a clamped TTL and a
//!   FIFO safety valve against unbounded growth.
//! - An optional **remote tier** backed by a Redis-compatible key-value store,
//!   which is authoritative when reachable and a silent no-op otherwise.
//!
//! The [`HybridCache`] facade hides tier selection from callers: reads check
//! the remote tier first and fall back to memory, writes populate both. No
//! operation on the facade ever panics or returns an error; failures degrade
//! to a cache miss plus a log line.
//!
//! # Example
//!
//! ```no_run
//! use playlog_cache::{CacheConfig, CacheKey, HybridCache};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Game {
//!     title: String,
//! }
//!
//! # async fn example() {
//! let cache = HybridCache::from_config(&CacheConfig::from_env());
//!
//! let key = CacheKey::game_by_slug("zelda-botw");
//! cache.set(&key, &Game { title: "Zelda".into() }).await;
//!
//! if let Some(game) = cache.get::<Game>(&key).await {
//!     println!("cached: {}", game.title);
//! }
//! # }
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod memory;
pub mod redis;
pub mod service;
pub mod stats;
pub mod tier;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use key::CacheKey;
pub use memory::MemoryTier;
pub use redis::RedisTier;
pub use service::HybridCache;
pub use stats::{CacheStats, MemoryStats, RemoteStats};
pub use tier::{NullTier, TierStore};
