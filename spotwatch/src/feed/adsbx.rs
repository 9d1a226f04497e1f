//! ADS-B Exchange (RapidAPI) feed client.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use super::{parse_snapshot, FeedError, FeedSource};
use crate::model::TrackedObject;

/// Military aircraft endpoint.
pub const DEFAULT_FEED_URL: &str = "https://adsbexchange-com1.p.rapidapi.com/v2/mil/";

/// RapidAPI host header value for ADS-B Exchange.
pub const DEFAULT_FEED_HOST: &str = "adsbexchange-com1.p.rapidapi.com";

/// Default request timeout in seconds.
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("spotwatch/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`AdsbExchangeFeed`].
#[derive(Clone, Debug)]
pub struct FeedConfig {
    pub url: String,
    pub api_key: String,
    pub api_host: String,
    pub timeout: Duration,
}

impl FeedConfig {
    /// Creates a config for the default endpoint with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            api_key: api_key.into(),
            api_host: DEFAULT_FEED_HOST.to_string(),
            timeout: Duration::from_secs(DEFAULT_FEED_TIMEOUT_SECS),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Polls ADS-B Exchange for the current military snapshot.
pub struct AdsbExchangeFeed {
    client: reqwest::Client,
    config: FeedConfig,
}

impl AdsbExchangeFeed {
    /// Creates a feed client with its own connection pool.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    async fn fetch(&self) -> Result<Vec<TrackedObject>, FeedError> {
        let response = self
            .client
            .get(&self.config.url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FeedError::Timeout(self.config.timeout.as_secs())
                } else {
                    FeedError::Http(format!("Request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(FeedError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                self.config.url
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::Http(format!("Failed to read response: {}", e)))?;

        debug!(bytes = body.len(), "Feed response received");
        parse_snapshot(&body)
    }
}

impl FeedSource for AdsbExchangeFeed {
    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<Vec<TrackedObject>, FeedError>> {
        self.fetch().boxed()
    }

    fn name(&self) -> &str {
        "adsbexchange"
    }
}
