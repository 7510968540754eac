//! Gateway lifecycle and request dispatch
//!
//! The [`Gateway`] owns the partition registry, the upstream fetcher and the
//! configuration, and exposes the lifecycle the hosting runtime drives:
//! install (pre-populate the shell, take over immediately, schedule the
//! eviction sweep), activate (version garbage collection), cross-context
//! commands, and push payloads.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::classify::{RequestClass, classify};
use crate::config::{
    API_CAP, GatewayConfig, IMAGES_CAP, IMAGE_EVICTION_BATCH, STATIC_CAP, partition_cap,
};
use crate::error::Result;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::message::{Command, Notification};
use crate::partition::{
    API_PARTITION, CacheStorage, IMAGES_PARTITION, Partition, STATIC_PARTITION,
};
use crate::response::CachedResponse;
use crate::strategy;

/// Offline-first request gateway
pub struct Gateway {
    storage: Arc<CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    config: GatewayConfig,
    cleanup_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("partitions", &self.storage.names())
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Create a gateway with the production HTTP fetcher
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Create a gateway with an explicit fetcher implementation
    pub fn with_fetcher(config: GatewayConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            storage: Arc::new(CacheStorage::new()),
            fetcher,
            config,
            cleanup_task: Mutex::new(None),
        }
    }

    /// The partition registry
    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Intercept one request
    ///
    /// Returns `None` when the request is not intercepted (non-GET,
    /// disallowed host, unmatched path) and default handling applies.
    /// Every intercepted request resolves to a response; strategy-internal
    /// failures never propagate.
    pub async fn handle(&self, method: &str, url: &Url) -> Option<CachedResponse> {
        let class = classify(&self.config, method, url);
        debug!(%url, ?class, "request classified");
        let response = match class {
            RequestClass::Bypass => return None,
            RequestClass::Image => {
                let images = self.storage.open(IMAGES_PARTITION);
                strategy::image(
                    self.fetcher.as_ref(),
                    &images,
                    IMAGES_CAP,
                    IMAGE_EVICTION_BATCH,
                    url,
                    self.default_cover(),
                )
                .await
            }
            RequestClass::StaticAsset => {
                let statics = self.storage.open(STATIC_PARTITION);
                strategy::cache_first(
                    self.fetcher.as_ref(),
                    &statics,
                    STATIC_CAP,
                    url,
                    self.offline_page(),
                )
                .await
            }
            RequestClass::Api => {
                let api = self.storage.open(API_PARTITION);
                strategy::network_first(self.fetcher.as_ref(), &api, API_CAP, url).await
            }
            RequestClass::Page => {
                let statics = self.storage.open(STATIC_PARTITION);
                strategy::stale_while_revalidate(
                    Arc::clone(&self.fetcher),
                    statics,
                    STATIC_CAP,
                    url.clone(),
                )
                .await
            }
        };
        Some(response)
    }

    /// Install the gateway: warm the shell, then take over immediately
    ///
    /// Pre-populates the `static` partition with the app shell (each
    /// pre-fetch failure is logged per URL and never aborts the install; a
    /// partially warmed shell is still a working gateway), activates this
    /// version without waiting, and schedules the recurring eviction sweep.
    /// No further host wiring is needed after this returns.
    pub async fn install(&self) {
        let statics = self.storage.open(STATIC_PARTITION);
        for path in &self.config.precache_paths {
            let url = match self.config.origin.join(path) {
                Ok(url) => url,
                Err(error) => {
                    warn!(path, %error, "skipping unjoinable precache path");
                    continue;
                }
            };
            match self.fetcher.fetch(&url).await {
                Ok(response) if response.is_success() => {
                    statics.put(url.as_str(), response);
                }
                Ok(response) => {
                    warn!(%url, status = response.status, "precache fetch returned non-success");
                }
                Err(error) => warn!(%url, %error, "precache fetch failed"),
            }
        }
        info!(cached = statics.len(), "gateway installed");
        self.activate().await;
        let sweeper = self.spawn_cleanup_task();
        if let Some(previous) = self.cleanup_task.lock().replace(sweeper) {
            previous.abort();
        }
    }

    /// Delete every partition not named `static` or `api`
    ///
    /// Old versioned shell partitions disappear here when a new gateway
    /// version takes over.
    pub async fn activate(&self) {
        for name in self.storage.names() {
            if name != STATIC_PARTITION && name != API_PARTITION {
                self.storage.delete(&name);
                debug!(partition = %name, "removed stale partition");
            }
        }
        info!("gateway activated");
    }

    /// Run the eviction sweep now instead of waiting for the timer
    pub fn cleanup(&self) {
        sweep(&self.storage);
    }

    /// Run the eviction sweep on a recurring timer
    ///
    /// [`install`](Self::install) schedules this automatically; the handle
    /// is returned for hosts driving the schedule themselves. The task
    /// lives until aborted or the runtime shuts down.
    pub fn spawn_cleanup_task(&self) -> JoinHandle<()> {
        let storage = Arc::clone(&self.storage);
        let interval = self.config.cleanup_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so the sweep runs
            // one full interval after scheduling
            interval.tick().await;
            loop {
                interval.tick().await;
                sweep(&storage);
            }
        })
    }

    /// Apply a cross-context command
    pub async fn on_message(&self, command: Command) {
        match command {
            Command::SkipWaiting => self.activate().await,
            Command::ClearCaches => {
                self.storage.clear_all();
                info!("all cache partitions cleared");
            }
            Command::RunCleanup => self.cleanup(),
        }
    }

    /// Parse and apply a raw JSON command payload
    pub async fn on_raw_message(&self, payload: &[u8]) {
        if let Some(command) = Command::parse(payload) {
            self.on_message(command).await;
        }
    }

    /// Turn a push payload into a displayable notification
    pub fn on_push(&self, payload: &[u8]) -> Option<Notification> {
        Notification::from_push(payload)
    }

    fn static_partition(&self) -> Option<Arc<Partition>> {
        self.storage.get(STATIC_PARTITION)
    }

    /// Cached offline page, used when a cache-first fetch dead-ends
    fn offline_page(&self) -> Option<CachedResponse> {
        let url = self.config.offline_url()?;
        self.static_partition()?.lookup(url.as_str())
    }

    /// Cached default cover, used when an image fetch dead-ends
    fn default_cover(&self) -> Option<CachedResponse> {
        let url = self.config.default_cover_url()?;
        self.static_partition()?.lookup(url.as_str())
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        if let Some(sweeper) = self.cleanup_task.get_mut().take() {
            sweeper.abort();
        }
    }
}

/// Sweep every partition down to its configured cap
///
/// `static` and `api` trim FIFO by insertion order; `images` evicts by
/// stored-at timestamp. Partitions without a configured cap are left alone.
fn sweep(storage: &CacheStorage) {
    for name in storage.names() {
        let Some(cap) = partition_cap(&name) else {
            continue;
        };
        let Some(partition) = storage.get(&name) else {
            continue;
        };
        let excess = partition.len().saturating_sub(cap);
        if excess == 0 {
            continue;
        }
        let removed = if name == IMAGES_PARTITION {
            partition.evict_oldest(excess)
        } else {
            partition.trim_to(cap)
        };
        debug!(partition = %name, removed, "cleanup sweep");
    }
}
