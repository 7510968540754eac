//! Offline-first request gateway for the playlog front-end
//!
//! This crate reimplements the browser service worker's job as a library:
//! intercept outgoing GET requests, classify them, and answer each one from
//! a named cache partition, the network, or both, so that the application
//! keeps working when the origin is slow or unreachable.
//!
//! Four partitions with distinct eviction rules back four strategies:
//!
//! | Request class | Partition | Strategy |
//! |---|---|---|
//! | Images (extensions, CDN host, proxy route) | `images` (cap 50) | cache-first with batched oldest-first eviction |
//! | Static assets (`/images/`, `/_next/static/`, `.css`/`.js`/`.woff2`) | `static` (cap 100) | cache-first |
//! | API calls (`/api/`) | `api` (cap 30) | network-first |
//! | App pages (`/games`, `/search`, …) | `static` | stale-while-revalidate |
//!
//! Anything else, including non-GET requests and non-allow-listed hosts, is
//! bypassed entirely. Strategies never fail: every path resolves to a cached
//! entry, a fallback asset (offline page, default cover), or a synthetic
//! 503/404 response.
//!
//! [`Gateway::install`] warms the shell, activates the new gateway version
//! immediately, and schedules the recurring eviction sweep; after install the
//! host only drives [`Gateway::handle`] and the message/push hooks.
//!
//! # Example
//!
//! ```no_run
//! use playlog_gateway::{Gateway, GatewayConfig};
//! use url::Url;
//!
//! # async fn example() -> Result<(), playlog_gateway::GatewayError> {
//! let gateway = Gateway::new(GatewayConfig::default())?;
//! gateway.install().await;
//!
//! let url = Url::parse("http://localhost:3000/api/games")?;
//! if let Some(response) = gateway.handle("GET", &url).await {
//!     println!("served {} with status {}", url, response.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod message;
pub mod partition;
pub mod response;
mod strategy;

pub use classify::RequestClass;
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use gateway::Gateway;
pub use message::{Command, Notification, NotificationAction};
pub use partition::{
    API_PARTITION, CacheStorage, IMAGES_PARTITION, Partition, STATIC_PARTITION,
};
pub use response::CachedResponse;
