//! Named cache partitions
//!
//! A partition is an in-process store of request URL → captured response
//! pairs, identified by name. Each entry records an explicit insertion
//! timestamp; eviction never depends on origin-supplied `Date` headers.
//! Entry-count limits are enforced eventually, on write and on periodic
//! sweep, not transactionally.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::response::CachedResponse;

/// Partition holding the app shell, stylesheets, scripts and local images
pub const STATIC_PARTITION: &str = "static";
/// Partition holding whole JSON API responses
pub const API_PARTITION: &str = "api";
/// Partition holding third-party images, capped and batch-evicted
pub const IMAGES_PARTITION: &str = "images";

#[derive(Debug, Clone)]
struct StoredEntry {
    response: CachedResponse,
    stored_at: Instant,
}

#[derive(Debug, Default)]
struct PartitionInner {
    entries: HashMap<String, StoredEntry>,
    /// Insertion order, front = oldest; kept free of duplicates
    order: VecDeque<String>,
}

/// One named request→response store
#[derive(Debug)]
pub struct Partition {
    name: String,
    inner: Mutex<PartitionInner>,
}

impl Partition {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Mutex::new(PartitionInner::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Captured response for a URL, if present
    pub fn lookup(&self, url: &str) -> Option<CachedResponse> {
        self.inner
            .lock()
            .entries
            .get(url)
            .map(|entry| entry.response.clone())
    }

    /// Store a response, overwriting any previous entry for the URL
    ///
    /// An overwrite counts as a fresh insertion: the entry moves to the
    /// back of the eviction order and its stored-at timestamp resets.
    pub fn put(&self, url: impl Into<String>, response: CachedResponse) {
        let url = url.into();
        let mut inner = self.inner.lock();
        if inner.entries.contains_key(&url) {
            inner.order.retain(|key| key != &url);
        }
        inner.order.push_back(url.clone());
        inner.entries.insert(
            url,
            StoredEntry {
                response,
                stored_at: Instant::now(),
            },
        );
    }

    /// Remove a single entry
    pub fn remove(&self, url: &str) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.entries.remove(url).is_some();
        if removed {
            inner.order.retain(|key| key != url);
        }
        removed
    }

    /// Entry count
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// URLs in insertion order, oldest first
    pub fn urls(&self) -> Vec<String> {
        self.inner.lock().order.iter().cloned().collect()
    }

    /// Insertion timestamp for a URL
    pub fn stored_at(&self, url: &str) -> Option<Instant> {
        self.inner.lock().entries.get(url).map(|entry| entry.stored_at)
    }

    /// Drop the oldest insertions until at most `cap` entries remain
    ///
    /// Returns the number of entries removed. FIFO by insertion order.
    pub fn trim_to(&self, cap: usize) -> usize {
        let mut inner = self.inner.lock();
        let mut removed = 0;
        while inner.entries.len() > cap {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            removed += 1;
        }
        if removed > 0 {
            debug!(partition = %self.name, removed, "trimmed partition to cap");
        }
        removed
    }

    /// Drop the `count` entries with the earliest stored-at timestamps
    ///
    /// Ties fall back to insertion order. Returns the number removed.
    pub fn evict_oldest(&self, count: usize) -> usize {
        let mut inner = self.inner.lock();
        let mut candidates: Vec<(usize, String, Instant)> = inner
            .order
            .iter()
            .enumerate()
            .filter_map(|(index, url)| {
                inner
                    .entries
                    .get(url)
                    .map(|entry| (index, url.clone(), entry.stored_at))
            })
            .collect();
        candidates.sort_by_key(|(index, _, stored_at)| (*stored_at, *index));

        let mut removed = 0;
        for (_, url, _) in candidates.into_iter().take(count) {
            inner.entries.remove(&url);
            inner.order.retain(|key| key != &url);
            removed += 1;
        }
        if removed > 0 {
            debug!(partition = %self.name, removed, "evicted oldest entries");
        }
        removed
    }
}

/// Registry of named partitions
///
/// Partitions are shared mutable state: any strategy may read or write any
/// partition, and concurrent writes to one key resolve last-write-wins.
#[derive(Debug, Default)]
pub struct CacheStorage {
    partitions: DashMap<String, Arc<Partition>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a partition, creating it on first use
    pub fn open(&self, name: &str) -> Arc<Partition> {
        self.partitions
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Partition::new(name)))
            .clone()
    }

    /// Partition by name without creating it
    pub fn get(&self, name: &str) -> Option<Arc<Partition>> {
        self.partitions.get(name).map(|entry| entry.clone())
    }

    /// Delete a whole partition; returns whether it existed
    pub fn delete(&self, name: &str) -> bool {
        self.partitions.remove(name).is_some()
    }

    /// Names of all existing partitions
    pub fn names(&self) -> Vec<String> {
        self.partitions.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Delete every partition
    pub fn clear_all(&self) {
        self.partitions.clear();
    }
}
