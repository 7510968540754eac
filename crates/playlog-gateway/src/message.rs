//! Cross-context messages and push payloads
//!
//! Pages control the gateway through a small JSON command protocol, and the
//! push channel delivers `{ title, body }` payloads that become system
//! notifications. Malformed input is logged and dropped, never an error.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Commands a page may send to the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Activate a pending updated gateway immediately
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
    /// Delete every cache partition
    #[serde(rename = "CACHE_CLEAR")]
    ClearCaches,
    /// Run the eviction sweep now instead of waiting for the timer
    #[serde(rename = "CACHE_CLEANUP")]
    RunCleanup,
}

impl Command {
    /// Parse a JSON command payload; `None` on malformed input
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match serde_json::from_slice(payload) {
            Ok(command) => Some(command),
            Err(error) => {
                warn!(%error, "dropping malformed gateway command");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    title: String,
    body: String,
}

/// Action buttons attached to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Opens the app root
    Explore,
    /// Dismisses the notification
    Close,
}

impl NotificationAction {
    /// Path the action navigates to, if any
    pub fn target(self) -> Option<&'static str> {
        match self {
            Self::Explore => Some("/"),
            Self::Close => None,
        }
    }
}

/// A system notification derived from a push payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// Build a notification from a push payload; `None` on malformed input
    pub fn from_push(payload: &[u8]) -> Option<Self> {
        let payload: PushPayload = match serde_json::from_slice(payload) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "dropping malformed push payload");
                return None;
            }
        };
        Some(Self {
            title: payload.title,
            body: payload.body,
            actions: vec![NotificationAction::Explore, NotificationAction::Close],
        })
    }
}
