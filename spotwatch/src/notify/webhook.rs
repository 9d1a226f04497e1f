//! HTTP push notifier.
//!
//! Posts an FCM-legacy-shaped JSON message to a configured endpoint:
//!
//! ```json
//! { "to": "<subscriber address>", "notification": { "title": "...", "body": "..." } }
//! ```

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tracing::debug;

use super::{Notification, Notifier, NotifyError};
use crate::model::Subscriber;

/// Default request timeout in seconds.
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Settings for [`WebhookNotifier`].
#[derive(Clone, Debug)]
pub struct WebhookConfig {
    pub endpoint: String,
    /// Sent as `Authorization: key=<server_key>` when present.
    pub server_key: Option<String>,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            server_key: None,
            timeout: Duration::from_secs(DEFAULT_NOTIFY_TIMEOUT_SECS),
        }
    }

    pub fn with_server_key(mut self, key: impl Into<String>) -> Self {
        self.server_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct PushMessage<'a> {
    to: &'a str,
    notification: &'a Notification,
}

/// Delivers notifications by HTTP POST.
pub struct WebhookNotifier {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NotifyError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn send(
        &self,
        subscriber: &Subscriber,
        notification: &Notification,
    ) -> Result<(), NotifyError> {
        let message = PushMessage {
            to: &subscriber.address,
            notification,
        };

        let mut request = self.client.post(&self.config.endpoint).json(&message);
        if let Some(key) = &self.config.server_key {
            request = request.header("Authorization", format!("key={}", key));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                NotifyError::Timeout(self.config.timeout.as_secs())
            } else {
                NotifyError::Http(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected(format!("HTTP {}: {}", status, detail.trim())));
        }

        debug!(subscriber_id = %subscriber.id, "Notification delivered");
        Ok(())
    }
}

impl Notifier for WebhookNotifier {
    fn notify<'a>(
        &'a self,
        subscriber: &'a Subscriber,
        notification: &'a Notification,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        self.send(subscriber, notification).boxed()
    }
}
