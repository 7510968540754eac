//! Integration tests for the two-tier cache facade
//!
//! These tests drive `HybridCache` against an in-process mock of the remote
//! tier to verify tier ordering, degradation, and the facade's no-throw
//! contract.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

use playlog_cache::error::{CacheError, CacheResult};
use playlog_cache::{CacheConfig, CacheKey, HybridCache, NullTier, RemoteStats, TierStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Game {
    title: String,
}

/// Remote tier double recording writes and optionally failing every call
#[derive(Default)]
struct MockTier {
    entries: Mutex<HashMap<String, (Bytes, Duration)>>,
    failing: AtomicBool,
    get_calls: AtomicUsize,
    cleared: AtomicBool,
}

impl MockTier {
    fn seed(&self, key: &str, value: Bytes, ttl: Duration) {
        self.entries.lock().insert(key.to_string(), (value, ttl));
    }

    fn fail_everything(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> CacheResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CacheError::Unavailable("mock tier down".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TierStore for MockTier {
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.entries.lock().get(key).map(|(raw, _)| raw.clone()))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> CacheResult<()> {
        self.check()?;
        self.entries.lock().insert(key.to_string(), (value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.check()?;
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.check()?;
        self.entries.lock().clear();
        self.cleared.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stats(&self) -> RemoteStats {
        if self.check().is_err() {
            return RemoteStats::default();
        }
        RemoteStats {
            connected: true,
            memory_usage: None,
            keys_count: Some(self.entries.lock().len() as u64),
        }
    }
}

fn cache_with(remote: Arc<dyn TierStore>) -> HybridCache {
    init_tracing();
    HybridCache::with_tier(remote, &CacheConfig::default())
}

#[tokio::test]
async fn test_set_then_get_round_trips_without_origin() {
    let remote = Arc::new(MockTier::default());
    let cache = cache_with(remote.clone());
    let key = CacheKey::game_by_slug("foo");

    cache
        .set_with_ttl(&key, &Game { title: "Foo".into() }, Duration::from_secs(3600))
        .await;
    let value: Option<Game> = cache.get(&key).await;

    assert_eq!(value, Some(Game { title: "Foo".into() }));
}

#[tokio::test]
async fn test_remote_hit_returns_without_touching_memory() {
    let remote = Arc::new(MockTier::default());
    let key = CacheKey::game_by_id(1);
    remote.seed(
        key.as_str(),
        Bytes::from(serde_json::to_vec(&Game { title: "Seeded".into() }).unwrap()),
        Duration::from_secs(60),
    );
    let cache = cache_with(remote);

    let value: Option<Game> = cache.get(&key).await;
    assert_eq!(value, Some(Game { title: "Seeded".into() }));

    // The hit was served from the remote tier alone
    assert_eq!(cache.memory().len(), 0);
}

#[tokio::test]
async fn test_remote_down_falls_back_to_memory() {
    let remote = Arc::new(MockTier::default());
    let cache = cache_with(remote.clone());
    let key = CacheKey::game_by_slug("offline-game");

    cache.set(&key, &Game { title: "Offline".into() }).await;
    remote.fail_everything();

    let value: Option<Game> = cache.get(&key).await;
    assert_eq!(value, Some(Game { title: "Offline".into() }));
}

#[tokio::test]
async fn test_remote_down_and_memory_miss_yields_none() {
    let remote = Arc::new(MockTier::default());
    remote.fail_everything();
    let cache = cache_with(remote);

    let value: Option<Game> = cache.get(&CacheKey::game_by_slug("absent")).await;
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_malformed_remote_record_is_purged_and_missed() {
    let remote = Arc::new(MockTier::default());
    let key = CacheKey::game_by_slug("corrupt");
    remote.seed(key.as_str(), Bytes::from_static(b"not json{"), Duration::from_secs(60));
    let cache = cache_with(remote.clone());

    let value: Option<Game> = cache.get(&key).await;
    assert_eq!(value, None);
    // The offending key was removed from the tier
    assert!(remote.entries.lock().get(key.as_str()).is_none());
}

#[tokio::test]
async fn test_set_passes_requested_ttl_to_remote() {
    let remote = Arc::new(MockTier::default());
    let cache = cache_with(remote.clone());
    let key = CacheKey::popular_games(1);

    cache
        .set_with_ttl(&key, &Game { title: "Popular".into() }, Duration::from_secs(7200))
        .await;

    let stored_ttl = remote.entries.lock().get(key.as_str()).map(|(_, ttl)| *ttl);
    assert_eq!(stored_ttl, Some(Duration::from_secs(7200)));
    // The in-memory copy is clamped independently of the request
    assert_eq!(cache.memory().ttl_of(key.as_str()), Some(Duration::from_secs(600)));
}

#[tokio::test]
async fn test_delete_removes_from_both_tiers() {
    let remote = Arc::new(MockTier::default());
    let cache = cache_with(remote.clone());
    let key = CacheKey::user_profile(9);

    cache.set(&key, &Game { title: "Profile".into() }).await;
    cache.delete(&key).await;

    assert!(remote.entries.lock().get(key.as_str()).is_none());
    let value: Option<Game> = cache.get(&key).await;
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_clear_flushes_remote_and_empties_memory() {
    let remote = Arc::new(MockTier::default());
    let cache = cache_with(remote.clone());

    cache.set(&CacheKey::game_by_id(1), &Game { title: "A".into() }).await;
    cache.set(&CacheKey::game_by_id(2), &Game { title: "B".into() }).await;
    cache.clear().await;

    assert!(remote.cleared.load(Ordering::SeqCst));
    assert_eq!(cache.memory().len(), 0);
}

#[tokio::test]
async fn test_stats_report_both_tiers() {
    let remote = Arc::new(MockTier::default());
    let cache = cache_with(remote.clone());
    cache.set(&CacheKey::game_by_id(1), &Game { title: "A".into() }).await;

    let stats = cache.stats().await;
    assert!(stats.remote.connected);
    assert_eq!(stats.remote.keys_count, Some(1));
    assert_eq!(stats.memory.entries, 1);

    remote.fail_everything();
    let stats = cache.stats().await;
    assert!(!stats.remote.connected);
}

#[tokio::test]
async fn test_memory_only_cache_with_null_tier() {
    let cache = cache_with(Arc::new(NullTier));
    let key = CacheKey::search_results("Metroid");

    cache.set(&key, &Game { title: "Metroid".into() }).await;
    let value: Option<Game> = cache.get(&key).await;
    assert_eq!(value, Some(Game { title: "Metroid".into() }));
}

#[tokio::test]
async fn test_memory_ttl_expiry_treated_as_miss() {
    let cache = cache_with(Arc::new(NullTier));
    let key = CacheKey::game_by_slug("fleeting");

    cache
        .set_with_ttl(&key, &Game { title: "Fleeting".into() }, Duration::from_millis(30))
        .await;
    let fresh: Option<Game> = cache.get(&key).await;
    assert!(fresh.is_some());

    tokio::time::sleep(Duration::from_millis(50)).await;
    let stale: Option<Game> = cache.get(&key).await;
    assert_eq!(stale, None);
}
