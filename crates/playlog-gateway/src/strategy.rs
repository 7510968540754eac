//! Caching strategies
//!
//! Each strategy answers one request class from one partition. A strategy
//! always resolves to *some* response: a cached entry, the network result,
//! a fallback asset, or a synthetic 503/404. Transport failures never
//! escape; non-2xx upstream responses pass through uncached.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::fetch::Fetcher;
use crate::partition::Partition;
use crate::response::CachedResponse;

const UNAVAILABLE_BODY: &str = "Service temporarily unavailable";
const IMAGE_MISSING_BODY: &str = "Image unavailable";

/// Serve from cache, fetching and storing only on a miss
///
/// On a miss with the network down, falls back to the cached offline page
/// if one was supplied, else a synthetic 503.
pub(crate) async fn cache_first(
    fetcher: &dyn Fetcher,
    partition: &Partition,
    cap: usize,
    url: &Url,
    offline: Option<CachedResponse>,
) -> CachedResponse {
    if let Some(cached) = partition.lookup(url.as_str()) {
        return cached;
    }
    match fetcher.fetch(url).await {
        Ok(response) if response.is_success() => {
            partition.put(url.as_str(), response.clone());
            partition.trim_to(cap);
            response
        }
        Ok(response) => response,
        Err(error) => {
            warn!(%url, %error, "cache-first fetch failed with no cached entry");
            offline.unwrap_or_else(|| CachedResponse::service_unavailable(UNAVAILABLE_BODY))
        }
    }
}

/// Always try the network, keeping the cache as a fallback
///
/// The stored entry always reflects the most recent successful fetch.
pub(crate) async fn network_first(
    fetcher: &dyn Fetcher,
    partition: &Partition,
    cap: usize,
    url: &Url,
) -> CachedResponse {
    match fetcher.fetch(url).await {
        Ok(response) if response.is_success() => {
            partition.put(url.as_str(), response.clone());
            partition.trim_to(cap);
            response
        }
        Ok(response) => response,
        Err(error) => {
            debug!(%url, %error, "network-first fetch failed, trying cache");
            partition
                .lookup(url.as_str())
                .unwrap_or_else(|| CachedResponse::service_unavailable(UNAVAILABLE_BODY))
        }
    }
}

/// Serve the cached entry immediately while refreshing it in the background
///
/// The caller never waits on the revalidation fetch; it runs as a detached
/// task whose failures are logged and dropped. On a miss the caller waits
/// on the network; a miss combined with a network failure yields a
/// synthetic 503, consistent with the other strategies.
pub(crate) async fn stale_while_revalidate(
    fetcher: Arc<dyn Fetcher>,
    partition: Arc<Partition>,
    cap: usize,
    url: Url,
) -> CachedResponse {
    if let Some(cached) = partition.lookup(url.as_str()) {
        tokio::spawn(async move {
            revalidate(fetcher.as_ref(), &partition, cap, &url).await;
        });
        return cached;
    }
    match fetcher.fetch(&url).await {
        Ok(response) if response.is_success() => {
            partition.put(url.as_str(), response.clone());
            partition.trim_to(cap);
            response
        }
        Ok(response) => response,
        Err(error) => {
            warn!(%url, %error, "revalidation miss with network down");
            CachedResponse::service_unavailable(UNAVAILABLE_BODY)
        }
    }
}

async fn revalidate(fetcher: &dyn Fetcher, partition: &Partition, cap: usize, url: &Url) {
    match fetcher.fetch(url).await {
        Ok(response) if response.is_success() => {
            partition.put(url.as_str(), response);
            partition.trim_to(cap);
        }
        Ok(response) => {
            debug!(%url, status = response.status, "background revalidation returned non-success");
        }
        Err(error) => debug!(%url, %error, "background revalidation failed"),
    }
}

/// Image strategy: cache-first with batched oldest-first eviction
///
/// When the partition is at or over its cap, the oldest batch is evicted
/// before the fetch so a fresh image always has room. Any failure falls
/// back to the default cover, else a synthetic 404.
pub(crate) async fn image(
    fetcher: &dyn Fetcher,
    images: &Partition,
    cap: usize,
    eviction_batch: usize,
    url: &Url,
    default_cover: Option<CachedResponse>,
) -> CachedResponse {
    if let Some(cached) = images.lookup(url.as_str()) {
        return cached;
    }
    if images.len() >= cap {
        images.evict_oldest(eviction_batch);
    }
    match fetcher.fetch(url).await {
        Ok(response) if response.is_success() => {
            images.put(url.as_str(), response.clone());
            response
        }
        Ok(response) => {
            debug!(%url, status = response.status, "image fetch returned non-success");
            default_cover.unwrap_or_else(|| CachedResponse::not_found(IMAGE_MISSING_BODY))
        }
        Err(error) => {
            debug!(%url, %error, "image fetch failed");
            default_cover.unwrap_or_else(|| CachedResponse::not_found(IMAGE_MISSING_BODY))
        }
    }
}
