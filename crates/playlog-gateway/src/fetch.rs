//! Upstream fetch seam
//!
//! Strategies reach the network only through [`Fetcher`], so tests can
//! substitute doubles and the HTTP client is configured in one place.
//! Non-2xx statuses come back as responses; only transport failures and
//! timeouts are errors.

use async_trait::async_trait;
use tracing::trace;
use url::Url;

use crate::error::Result;
use crate::response::CachedResponse;

/// Issues upstream GET requests on behalf of the strategies
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<CachedResponse>;
}

/// Production fetcher backed by a pooled HTTP client
///
/// Every request carries the configured timeout; a hanging upstream fetch
/// surfaces as a transport error rather than stalling a strategy forever.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<CachedResponse> {
        trace!(%url, "upstream fetch");
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await?;
        Ok(CachedResponse {
            status,
            headers,
            body,
        })
    }
}
