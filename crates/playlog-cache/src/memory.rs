//! In-memory cache tier
//!
//! Always available regardless of execution context. Records carry their own
//! TTL, clamped to [`MEMORY_TTL_CAP`](crate::config::MEMORY_TTL_CAP) since no
//! background sweep removes expired entries; expiry is checked lazily on read.
//! A FIFO safety valve evicts the oldest insertions when the tier grows past
//! its configured capacity.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::{MEMORY_EVICTION_BATCH, MEMORY_MAX_ENTRIES, MEMORY_TTL_CAP};

#[derive(Debug, Clone)]
struct MemoryEntry {
    data: Bytes,
    stored_at: Instant,
    ttl: Duration,
}

impl MemoryEntry {
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, MemoryEntry>,
    /// Insertion order, front = oldest; kept free of duplicates
    order: VecDeque<String>,
}

/// The in-memory cache tier
#[derive(Debug)]
pub struct MemoryTier {
    inner: Mutex<MemoryInner>,
    ttl_cap: Duration,
    max_entries: usize,
    eviction_batch: usize,
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new(MEMORY_TTL_CAP, MEMORY_MAX_ENTRIES, MEMORY_EVICTION_BATCH)
    }
}

impl MemoryTier {
    /// Create a tier with explicit limits
    pub fn new(ttl_cap: Duration, max_entries: usize, eviction_batch: usize) -> Self {
        Self {
            inner: Mutex::new(MemoryInner::default()),
            ttl_cap,
            max_entries,
            eviction_batch,
        }
    }

    /// Look up a record, treating expired entries as absent
    ///
    /// Expired entries are purged on the spot rather than waiting for the
    /// safety valve.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let mut inner = self.inner.lock();
        match inner.entries.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.data.clone()),
            Some(_) => {}
            None => return None,
        }
        inner.entries.remove(key);
        inner.order.retain(|k| k != key);
        None
    }

    /// Store a record, clamping its TTL to the tier cap
    ///
    /// Re-inserting an existing key refreshes its insertion position. When
    /// the tier grows past `max_entries`, the `eviction_batch` oldest
    /// insertions are dropped.
    pub fn insert(&self, key: String, data: Bytes, ttl: Duration) {
        let effective_ttl = ttl.min(self.ttl_cap);
        let mut inner = self.inner.lock();
        if inner.entries.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(
            key,
            MemoryEntry {
                data,
                stored_at: Instant::now(),
                ttl: effective_ttl,
            },
        );
        if inner.entries.len() > self.max_entries {
            let mut evicted = 0;
            for _ in 0..self.eviction_batch {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.entries.remove(&oldest);
                evicted += 1;
            }
            debug!(evicted, remaining = inner.entries.len(), "memory tier over capacity");
        }
    }

    /// Remove a record if present
    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.entries.remove(key).is_some();
        if removed {
            inner.order.retain(|k| k != key);
        }
        removed
    }

    /// Drop every record
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Current entry count, expired-but-unpurged entries included
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Effective (clamped) TTL stored for a key
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.inner.lock().entries.get(key).map(|entry| entry.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier() -> MemoryTier {
        MemoryTier::default()
    }

    #[test]
    fn test_get_returns_stored_value_before_expiry() {
        let tier = tier();
        tier.insert("game:id:1".into(), Bytes::from_static(b"{}"), Duration::from_secs(5));
        assert_eq!(tier.get("game:id:1"), Some(Bytes::from_static(b"{}")));
    }

    #[test]
    fn test_expired_entry_is_absent_and_purged() {
        let tier = tier();
        tier.insert("game:id:1".into(), Bytes::from_static(b"{}"), Duration::from_millis(20));
        assert!(tier.get("game:id:1").is_some());

        std::thread::sleep(Duration::from_millis(30));
        assert!(tier.get("game:id:1").is_none());
        // Lazy purge removed the entry, not just hid it
        assert_eq!(tier.len(), 0);
    }

    #[test]
    fn test_ttl_clamped_to_cap() {
        let tier = tier();
        tier.insert(
            "game:id:1".into(),
            Bytes::from_static(b"{}"),
            Duration::from_secs(999_999),
        );
        assert_eq!(tier.ttl_of("game:id:1"), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_ttl_below_cap_kept_as_requested() {
        let tier = tier();
        tier.insert("game:id:1".into(), Bytes::from_static(b"{}"), Duration::from_secs(5));
        assert_eq!(tier.ttl_of("game:id:1"), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_fifo_safety_valve_evicts_oldest_batch() {
        let tier = tier();
        for i in 0..1001 {
            tier.insert(format!("game:id:{i}"), Bytes::from_static(b"{}"), Duration::from_secs(60));
        }

        assert_eq!(tier.len(), 901);
        // The 100 oldest insertions are gone
        for i in 0..100 {
            assert!(tier.get(&format!("game:id:{i}")).is_none(), "key {i} should be evicted");
        }
        // The most recent 901 remain
        for i in 100..1001 {
            assert!(tier.get(&format!("game:id:{i}")).is_some(), "key {i} should survive");
        }
    }

    #[test]
    fn test_reinsert_refreshes_insertion_position() {
        let tier = MemoryTier::new(Duration::from_secs(600), 3, 1);
        tier.insert("a".into(), Bytes::from_static(b"1"), Duration::from_secs(60));
        tier.insert("b".into(), Bytes::from_static(b"2"), Duration::from_secs(60));
        tier.insert("a".into(), Bytes::from_static(b"3"), Duration::from_secs(60));
        tier.insert("c".into(), Bytes::from_static(b"4"), Duration::from_secs(60));
        // Four inserts but three keys; adding a fourth key triggers the valve
        tier.insert("d".into(), Bytes::from_static(b"5"), Duration::from_secs(60));

        // "b" is now the oldest insertion, "a" was refreshed
        assert!(tier.get("b").is_none());
        assert_eq!(tier.get("a"), Some(Bytes::from_static(b"3")));
    }

    #[test]
    fn test_remove_and_clear() {
        let tier = tier();
        tier.insert("a".into(), Bytes::from_static(b"1"), Duration::from_secs(60));
        tier.insert("b".into(), Bytes::from_static(b"2"), Duration::from_secs(60));

        assert!(tier.remove("a"));
        assert!(!tier.remove("a"));
        assert_eq!(tier.len(), 1);

        tier.clear();
        assert!(tier.is_empty());
    }
}
