//! Error types for gateway operations
//!
//! Strategy functions never surface these to the request pipeline; they are
//! confined to the fetch seam and to construction.

use thiserror::Error;

/// Result alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur inside the gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The upstream fetch failed at the transport level or timed out
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// A URL could not be parsed or joined against the origin
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
