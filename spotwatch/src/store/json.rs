//! JSON-file persistence.
//!
//! Subscribers and spots live in two files inside one data directory:
//!
//! ```text
//! <dir>/subscribers.json   [ { "id", "address", "latitude", "longitude", "radius" }, ... ]
//! <dir>/spots.json         [ { "subscriber_id", "object_id", "label", "category" }, ... ]
//! ```
//!
//! The subscriber file is owned by the registration side and re-read on
//! every listing. The spot file is owned by the engine: it is loaded once on
//! open and written through (temp file + rename) on every mutation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{SpotStore, StoreError, SubscriberDirectory};
use crate::model::{Subscriber, TrackedSpot};

/// File name of the subscriber collection.
pub const SUBSCRIBERS_FILE: &str = "subscribers.json";

/// File name of the spot collection.
pub const SPOTS_FILE: &str = "spots.json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

async fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(items)
        .map_err(|e| StoreError::Corrupt(format!("Failed to encode {}: {}", path.display(), e)))?;

    // Unique per write: an abandoned write must not share a temp file with the next one.
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp = path.with_extension(format!("json.{}.{}.tmp", std::process::id(), seq));
    tokio::fs::write(&tmp, json).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

// =============================================================================
// Spot store
// =============================================================================

/// Write-through spot store persisted to `spots.json`.
///
/// All mutations are serialized by an async mutex; the in-memory copy is
/// only updated after the file write succeeds, so memory never runs ahead
/// of disk.
pub struct JsonSpotStore {
    path: PathBuf,
    spots: Mutex<Vec<TrackedSpot>>,
}

impl JsonSpotStore {
    /// Opens (or initializes) the spot file inside `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(SPOTS_FILE);
        let spots: Vec<TrackedSpot> = read_collection(&path).await?;
        info!(path = %path.display(), spots = spots.len(), "Opened spot store");

        Ok(Self {
            path,
            spots: Mutex::new(spots),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drops every spot of `subscriber_id`. Returns how many were removed.
    ///
    /// Used when a subscriber is unregistered, so that a later registration
    /// under the same id starts from an empty set.
    pub async fn purge_subscriber(&self, subscriber_id: &str) -> Result<usize, StoreError> {
        let mut spots = self.spots.lock().await;
        let next: Vec<TrackedSpot> = spots
            .iter()
            .filter(|s| s.subscriber_id != subscriber_id)
            .cloned()
            .collect();

        let removed = spots.len() - next.len();
        if removed == 0 {
            return Ok(0);
        }

        write_collection(&self.path, &next).await?;
        *spots = next;
        info!(subscriber_id, removed, "Purged spots");
        Ok(removed)
    }

    async fn load(&self, subscriber_id: &str) -> Result<Vec<TrackedSpot>, StoreError> {
        let spots = self.spots.lock().await;
        Ok(spots
            .iter()
            .filter(|s| s.subscriber_id == subscriber_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, subscriber_id: &str, object_id: &str) -> Result<(), StoreError> {
        let mut spots = self.spots.lock().await;
        let before = spots.len();
        let next: Vec<TrackedSpot> = spots
            .iter()
            .filter(|s| !(s.subscriber_id == subscriber_id && s.object_id == object_id))
            .cloned()
            .collect();

        if next.len() == before {
            return Ok(());
        }

        write_collection(&self.path, &next).await?;
        *spots = next;
        debug!(subscriber_id, object_id, "Spot deleted");
        Ok(())
    }

    async fn create(&self, spot: &TrackedSpot) -> Result<(), StoreError> {
        let mut spots = self.spots.lock().await;
        let mut next = spots.clone();
        match next.iter_mut().find(|s| {
            s.subscriber_id == spot.subscriber_id && s.object_id == spot.object_id
        }) {
            Some(existing) => *existing = spot.clone(),
            None => next.push(spot.clone()),
        }

        write_collection(&self.path, &next).await?;
        *spots = next;
        debug!(
            subscriber_id = %spot.subscriber_id,
            object_id = %spot.object_id,
            "Spot created"
        );
        Ok(())
    }
}

impl SpotStore for JsonSpotStore {
    fn load_spots<'a>(
        &'a self,
        subscriber_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TrackedSpot>, StoreError>> {
        self.load(subscriber_id).boxed()
    }

    fn delete_spot<'a>(
        &'a self,
        subscriber_id: &'a str,
        object_id: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        self.delete(subscriber_id, object_id).boxed()
    }

    fn create_spot<'a>(&'a self, spot: &'a TrackedSpot) -> BoxFuture<'a, Result<(), StoreError>> {
        self.create(spot).boxed()
    }
}

// =============================================================================
// Subscriber directory
// =============================================================================

/// Subscriber directory persisted to `subscribers.json`.
///
/// Listing re-reads the file so that registrations made by another process
/// take effect on the next cycle.
#[derive(Debug, Clone)]
pub struct JsonSubscriberDirectory {
    path: PathBuf,
}

impl JsonSubscriberDirectory {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SUBSCRIBERS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all subscribers from disk.
    ///
    /// Records that do not decode as a subscriber are logged and skipped;
    /// only an unreadable or non-array file fails the listing.
    pub async fn read(&self) -> Result<Vec<Subscriber>, StoreError> {
        let records: Vec<Value> = read_collection(&self.path).await?;
        let mut subscribers = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let id = record_id(&record).map(str::to_string);
            match serde_json::from_value::<Subscriber>(record) {
                Ok(subscriber) => subscribers.push(subscriber),
                Err(e) => warn!(
                    path = %self.path.display(),
                    index,
                    subscriber_id = id.as_deref().unwrap_or("?"),
                    error = %e,
                    "Skipping malformed subscriber record"
                ),
            }
        }
        Ok(subscribers)
    }

    /// Adds or replaces a subscriber. Returns true if one was replaced.
    ///
    /// Other records, malformed ones included, are written back untouched.
    pub async fn add(&self, subscriber: Subscriber) -> Result<bool, StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let record = serde_json::to_value(&subscriber)
            .map_err(|e| StoreError::Corrupt(format!("Failed to encode subscriber: {}", e)))?;
        let mut records: Vec<Value> = read_collection(&self.path).await?;
        let replaced = match records
            .iter_mut()
            .find(|r| record_id(r) == Some(subscriber.id.as_str()))
        {
            Some(existing) => {
                *existing = record;
                true
            }
            None => {
                records.push(record);
                false
            }
        };

        write_collection(&self.path, &records).await?;
        Ok(replaced)
    }

    /// Removes a subscriber by id. Returns true if it existed.
    pub async fn remove(&self, subscriber_id: &str) -> Result<bool, StoreError> {
        let mut records: Vec<Value> = read_collection(&self.path).await?;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(subscriber_id));

        if records.len() == before {
            return Ok(false);
        }

        write_collection(&self.path, &records).await?;
        Ok(true)
    }
}

impl SubscriberDirectory for JsonSubscriberDirectory {
    fn list_subscribers(&self) -> BoxFuture<'_, Result<Vec<Subscriber>, StoreError>> {
        self.read().boxed()
    }
}
