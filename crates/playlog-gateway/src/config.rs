//! Gateway configuration
//!
//! Defaults mirror the playlog front-end: a Next-style asset layout, the
//! IGDB image CDN, and the app's route set. Everything is overridable for
//! other deployments and for tests.

use std::time::Duration;

use url::Url;

use crate::partition::{API_PARTITION, IMAGES_PARTITION, STATIC_PARTITION};

/// Entry cap for the `static` partition
pub const STATIC_CAP: usize = 100;
/// Entry cap for the `api` partition
pub const API_CAP: usize = 30;
/// Entry cap for the `images` partition
pub const IMAGES_CAP: usize = 50;
/// Number of oldest images evicted when the cap is reached
pub const IMAGE_EVICTION_BATCH: usize = 10;

/// Configuration for [`Gateway`](crate::Gateway)
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Origin server every relative path resolves against
    pub origin: Url,
    /// Hosts the gateway is allowed to intercept; all others bypass
    pub allowed_hosts: Vec<String>,
    /// Third-party image CDN host, intercepted and cached in `images`
    pub image_cdn_host: String,
    /// Image-proxy route prefix on the origin
    pub image_proxy_prefix: String,
    /// Path prefixes classified as static assets
    pub static_prefixes: Vec<String>,
    /// Path suffixes classified as static assets
    pub static_suffixes: Vec<String>,
    /// App routes served stale-while-revalidate
    pub page_routes: Vec<String>,
    /// Path of the offline fallback page within the `static` partition
    pub offline_path: String,
    /// Path of the default cover image within the `static` partition
    pub default_cover_path: String,
    /// Shell paths pre-populated at install time
    pub precache_paths: Vec<String>,
    /// Per-request upstream timeout
    pub fetch_timeout: Duration,
    /// Interval between periodic eviction sweeps
    pub cleanup_interval: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        #[allow(clippy::unwrap_used)] // literal URL
        let origin = Url::parse("http://localhost:3000").unwrap();
        Self {
            origin,
            allowed_hosts: vec![
                "localhost".to_string(),
                "127.0.0.1".to_string(),
                "playlog.app".to_string(),
                "www.playlog.app".to_string(),
            ],
            image_cdn_host: "images.igdb.com".to_string(),
            image_proxy_prefix: "/api/image-proxy".to_string(),
            static_prefixes: vec!["/images/".to_string(), "/_next/static/".to_string()],
            static_suffixes: vec![".css".to_string(), ".js".to_string(), ".woff2".to_string()],
            page_routes: vec![
                "/games".to_string(),
                "/search".to_string(),
                "/connexion".to_string(),
                "/inscription".to_string(),
            ],
            offline_path: "/offline".to_string(),
            default_cover_path: "/images/default-cover.png".to_string(),
            precache_paths: vec![
                "/".to_string(),
                "/offline".to_string(),
                "/images/default-cover.png".to_string(),
                "/images/default-avatar.png".to_string(),
                "/images/logo.png".to_string(),
            ],
            fetch_timeout: Duration::from_secs(10),
            cleanup_interval: Duration::from_secs(30 * 60),
        }
    }
}

impl GatewayConfig {
    /// Configuration pointed at an explicit origin, with the origin's host
    /// added to the allow-list
    pub fn for_origin(origin: Url) -> Self {
        let mut config = Self {
            origin,
            ..Self::default()
        };
        if let Some(host) = config.origin.host_str() {
            let host = host.to_string();
            if !config.allowed_hosts.contains(&host) {
                config.allowed_hosts.push(host);
            }
        }
        config
    }

    /// Whether a request host may be intercepted at all
    pub fn is_allowed_host(&self, host: &str) -> bool {
        host == self.image_cdn_host || self.allowed_hosts.iter().any(|allowed| allowed == host)
    }

    /// Absolute URL of the offline fallback page
    pub fn offline_url(&self) -> Option<Url> {
        self.origin.join(&self.offline_path).ok()
    }

    /// Absolute URL of the default cover image
    pub fn default_cover_url(&self) -> Option<Url> {
        self.origin.join(&self.default_cover_path).ok()
    }
}

/// Entry cap enforced for a partition, `None` for unmanaged names
pub fn partition_cap(name: &str) -> Option<usize> {
    match name {
        STATIC_PARTITION => Some(STATIC_CAP),
        API_PARTITION => Some(API_CAP),
        IMAGES_PARTITION => Some(IMAGES_CAP),
        _ => None,
    }
}
