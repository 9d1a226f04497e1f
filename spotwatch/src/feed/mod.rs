//! Live aircraft feed abstraction.
//!
//! The engine consumes snapshots through the [`FeedSource`] trait. The
//! production implementation polls the ADS-B Exchange military endpoint via
//! RapidAPI; tests inject canned snapshots.
//!
//! # Example
//!
//! ```ignore
//! use spotwatch::feed::{AdsbExchangeFeed, FeedConfig, FeedSource};
//!
//! let feed = AdsbExchangeFeed::new(FeedConfig::new(api_key))?;
//! let snapshot = feed.fetch_snapshot().await?;
//! ```

mod adsbx;
mod parse;

pub use adsbx::{
    AdsbExchangeFeed, FeedConfig, DEFAULT_FEED_HOST, DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_FEED_URL,
};
pub use parse::parse_snapshot;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::model::TrackedObject;

/// Errors that cause a poll cycle to be skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    /// Transport-level failure (DNS, TLS, connection reset, non-2xx status).
    #[error("Feed request failed: {0}")]
    Http(String),

    /// The body could not be decoded as a snapshot.
    #[error("Feed response could not be decoded: {0}")]
    Decode(String),

    /// No response within the configured deadline.
    #[error("Feed request timed out after {0}s")]
    Timeout(u64),
}

/// Source of feed snapshots.
///
/// Dyn-compatible so the cycle runner can hold an `Arc<dyn FeedSource>`.
pub trait FeedSource: Send + Sync {
    /// Fetches the current set of visible aircraft.
    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<Vec<TrackedObject>, FeedError>>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "feed"
    }
}
