//! Persistence boundary for subscribers and tracked spots.
//!
//! Two logical collections are exposed through narrow, dyn-compatible traits:
//!
//! - [`SubscriberDirectory`]: read-only list of registered subscribers
//! - [`SpotStore`]: per-subscriber "currently tracked" records, keyed by
//!   `(subscriber_id, object_id)`
//!
//! # Implementations
//!
//! | Type                       | Backing                          |
//! |----------------------------|----------------------------------|
//! | [`MemoryStore`]            | `DashMap`, process lifetime      |
//! | [`JsonSpotStore`]          | `<dir>/spots.json`, write-through |
//! | [`JsonSubscriberDirectory`] | `<dir>/subscribers.json`         |
//!
//! Each subscriber's spot set is disjoint from every other's, so callers may
//! reconcile different subscribers concurrently. Implementations are
//! responsible for any serialization the backing storage needs.

mod json;
mod memory;

pub use json::{JsonSpotStore, JsonSubscriberDirectory, SPOTS_FILE, SUBSCRIBERS_FILE};
pub use memory::MemoryStore;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::model::{Subscriber, TrackedSpot};

/// Errors raised by store implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("Store I/O error: {0}")]
    Io(String),

    /// Persisted data could not be decoded.
    #[error("Store data is corrupt: {0}")]
    Corrupt(String),

    /// The backing store is unreachable or refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within the configured deadline.
    #[error("Store operation timed out after {0}s")]
    Timeout(u64),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

/// Read access to registered subscribers.
pub trait SubscriberDirectory: Send + Sync {
    /// Lists every registered subscriber. Called once per cycle.
    fn list_subscribers(&self) -> BoxFuture<'_, Result<Vec<Subscriber>, StoreError>>;
}

/// Persistence for tracked spots.
///
/// Spots are exclusively owned by the reconciliation engine; nothing else
/// should mutate them.
pub trait SpotStore: Send + Sync {
    /// Loads every spot belonging to `subscriber_id`.
    fn load_spots<'a>(
        &'a self,
        subscriber_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TrackedSpot>, StoreError>>;

    /// Deletes the spot keyed by `(subscriber_id, object_id)`.
    ///
    /// Deleting a spot that does not exist is not an error.
    fn delete_spot<'a>(
        &'a self,
        subscriber_id: &'a str,
        object_id: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Inserts a spot, replacing any existing spot with the same key.
    fn create_spot<'a>(&'a self, spot: &'a TrackedSpot) -> BoxFuture<'a, Result<(), StoreError>>;
}
