//! Captured HTTP responses and synthetic fallbacks

use bytes::Bytes;

/// A captured HTTP response as stored in a cache partition
///
/// Bodies are held as cheaply cloneable [`Bytes`], so serving a cached entry
/// never copies the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl CachedResponse {
    /// A 200 response with the given body, mostly useful in tests and
    /// pre-seeded partitions
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    /// Synthetic 503 used when every fallback in a strategy is exhausted
    pub fn service_unavailable(message: &str) -> Self {
        Self {
            status: 503,
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: Bytes::from(message.to_string()),
        }
    }

    /// Synthetic 404 used when an image has no cached copy and no fallback
    pub fn not_found(message: &str) -> Self {
        Self {
            status: 404,
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: Bytes::from(message.to_string()),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name`, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(CachedResponse::ok("text/html", "hi").is_success());
        assert!(!CachedResponse::not_found("missing").is_success());
        assert!(!CachedResponse::service_unavailable("down").is_success());
    }

    #[test]
    fn test_synthetic_responses_are_plain_text() {
        let response = CachedResponse::service_unavailable("Service temporarily unavailable");
        assert_eq!(response.status, 503);
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(&response.body[..], b"Service temporarily unavailable");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = CachedResponse::ok("image/png", "");
        assert_eq!(response.header("CONTENT-TYPE"), Some("image/png"));
        assert_eq!(response.header("etag"), None);
    }
}
