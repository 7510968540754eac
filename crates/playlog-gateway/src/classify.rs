//! Request classification
//!
//! Every intercepted request is mapped to exactly one strategy by the first
//! matching rule: image, static asset, API, page. Non-GET methods and hosts
//! outside the allow-list are never intercepted, which keeps the gateway
//! away from opaque cross-origin responses it could not safely cache.

use url::Url;

use crate::config::GatewayConfig;

/// File extensions treated as images regardless of path
const IMAGE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".ico", ".avif",
];

/// The strategy class a request resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Served by the image strategy from the `images` partition
    Image,
    /// Served cache-first from the `static` partition
    StaticAsset,
    /// Served network-first from the `api` partition
    Api,
    /// Served stale-while-revalidate from the `static` partition
    Page,
    /// Not intercepted; default handling applies
    Bypass,
}

/// Classify a request; first matching rule wins
pub fn classify(config: &GatewayConfig, method: &str, url: &Url) -> RequestClass {
    if !method.eq_ignore_ascii_case("GET") {
        return RequestClass::Bypass;
    }
    let Some(host) = url.host_str() else {
        return RequestClass::Bypass;
    };
    if !config.is_allowed_host(host) {
        return RequestClass::Bypass;
    }

    let path = url.path();
    if is_image(config, host, path) {
        return RequestClass::Image;
    }
    if is_static_asset(config, path) {
        return RequestClass::StaticAsset;
    }
    if path.starts_with("/api/") {
        return RequestClass::Api;
    }
    if is_page(config, path) {
        return RequestClass::Page;
    }
    RequestClass::Bypass
}

fn is_image(config: &GatewayConfig, host: &str, path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        || host == config.image_cdn_host
        || path.starts_with(&config.image_proxy_prefix)
        || path.starts_with("/images/")
}

fn is_static_asset(config: &GatewayConfig, path: &str) -> bool {
    config.static_prefixes.iter().any(|prefix| path.starts_with(prefix))
        || config.static_suffixes.iter().any(|suffix| path.ends_with(suffix))
}

fn is_page(config: &GatewayConfig, path: &str) -> bool {
    config
        .page_routes
        .iter()
        .any(|route| path == route || path.starts_with(&format!("{route}/")))
}
