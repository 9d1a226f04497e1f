//! Notification delivery boundary.
//!
//! The engine hands a [`Notification`] and the target [`Subscriber`] to a
//! [`Notifier`]. Delivery is fire-once: failures are reported back to the
//! engine and never retried.

mod log;
mod webhook;

pub use self::log::LogNotifier;
pub use webhook::{WebhookConfig, WebhookNotifier, DEFAULT_NOTIFY_TIMEOUT_SECS};

use futures::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;

use crate::model::Subscriber;

/// Placeholder used when a label or category is empty.
pub const UNKNOWN_PLACEHOLDER: &str = "unknown";

/// Errors raised while delivering a notification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotifyError {
    /// Transport-level failure.
    #[error("Notification request failed: {0}")]
    Http(String),

    /// The delivery service answered but refused the message.
    #[error("Notification rejected: {0}")]
    Rejected(String),

    /// No response within the configured deadline.
    #[error("Notification timed out after {0}s")]
    Timeout(u64),
}

/// A push message: title plus body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Builds an enter notification: callsign as title, type as body.
    ///
    /// Empty values are replaced with [`UNKNOWN_PLACEHOLDER`] so the delivered
    /// message is never blank.
    pub fn for_sighting(label: &str, category: &str) -> Self {
        Self::new(or_unknown(label), or_unknown(category))
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN_PLACEHOLDER
    } else {
        value
    }
}

/// Delivery channel for notifications.
pub trait Notifier: Send + Sync {
    /// Delivers `notification` to `subscriber`'s address.
    fn notify<'a>(
        &'a self,
        subscriber: &'a Subscriber,
        notification: &'a Notification,
    ) -> BoxFuture<'a, Result<(), NotifyError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sighting_keeps_labels() {
        let n = Notification::for_sighting("RCH123", "C17");
        assert_eq!(n.title, "RCH123");
        assert_eq!(n.body, "C17");
    }

    #[test]
    fn test_sighting_defaults_empty_labels() {
        let n = Notification::for_sighting("", "B738");
        assert_eq!(n.title, "unknown");
        assert_eq!(n.body, "B738");

        let n = Notification::for_sighting("  ", "");
        assert_eq!(n.title, "unknown");
        assert_eq!(n.body, "unknown");
    }
}
