//! In-memory store backed by `DashMap`.

use dashmap::DashMap;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use parking_lot::RwLock;

use super::{SpotStore, StoreError, SubscriberDirectory};
use crate::model::{Subscriber, TrackedSpot};

/// Volatile subscriber directory and spot store.
///
/// Spots are sharded by subscriber id so concurrent reconciliation of
/// different subscribers never contends on the same entry. Insertion order
/// within a subscriber is preserved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    subscribers: RwLock<Vec<Subscriber>>,
    spots: DashMap<String, Vec<TrackedSpot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with subscribers.
    pub fn with_subscribers(subscribers: Vec<Subscriber>) -> Self {
        Self {
            subscribers: RwLock::new(subscribers),
            spots: DashMap::new(),
        }
    }

    /// Registers or replaces a subscriber.
    pub fn upsert_subscriber(&self, subscriber: Subscriber) {
        let mut subscribers = self.subscribers.write();
        match subscribers.iter_mut().find(|s| s.id == subscriber.id) {
            Some(existing) => *existing = subscriber,
            None => subscribers.push(subscriber),
        }
    }

    /// Removes a subscriber and its spots. Returns true if it existed.
    pub fn remove_subscriber(&self, subscriber_id: &str) -> bool {
        self.spots.remove(subscriber_id);
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != subscriber_id);
        subscribers.len() != before
    }

    /// Snapshot of a subscriber's spots (synchronous, for inspection).
    pub fn spots_for(&self, subscriber_id: &str) -> Vec<TrackedSpot> {
        self.spots
            .get(subscriber_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Total number of spots across all subscribers.
    pub fn spot_count(&self) -> usize {
        self.spots.iter().map(|entry| entry.value().len()).sum()
    }

    fn delete_now(&self, subscriber_id: &str, object_id: &str) {
        let now_empty = match self.spots.get_mut(subscriber_id) {
            Some(mut entry) => {
                entry.retain(|spot| spot.object_id != object_id);
                entry.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.spots
                .remove_if(subscriber_id, |_, spots| spots.is_empty());
        }
    }

    fn create_now(&self, spot: &TrackedSpot) {
        let mut entry = self.spots.entry(spot.subscriber_id.clone()).or_default();
        match entry.iter_mut().find(|s| s.object_id == spot.object_id) {
            Some(existing) => *existing = spot.clone(),
            None => entry.push(spot.clone()),
        }
    }
}

impl SubscriberDirectory for MemoryStore {
    fn list_subscribers(&self) -> BoxFuture<'_, Result<Vec<Subscriber>, StoreError>> {
        future::ready(Ok(self.subscribers.read().clone())).boxed()
    }
}

impl SpotStore for MemoryStore {
    fn load_spots<'a>(
        &'a self,
        subscriber_id: &'a str,
    ) -> BoxFuture<'a, Result<Vec<TrackedSpot>, StoreError>> {
        future::ready(Ok(self.spots_for(subscriber_id))).boxed()
    }

    fn delete_spot<'a>(
        &'a self,
        subscriber_id: &'a str,
        object_id: &'a str,
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        self.delete_now(subscriber_id, object_id);
        future::ready(Ok(())).boxed()
    }

    fn create_spot<'a>(&'a self, spot: &'a TrackedSpot) -> BoxFuture<'a, Result<(), StoreError>> {
        self.create_now(spot);
        future::ready(Ok(())).boxed()
    }
}
