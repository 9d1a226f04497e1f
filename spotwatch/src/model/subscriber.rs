//! Registered watchers and their persisted spots.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoError, GeoPoint};
use crate::zone::Zone;

/// A registered watcher with a circular zone of interest.
///
/// Created and removed by an external registration process; the engine
/// only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Unique subscriber id.
    pub id: String,
    /// Opaque delivery token for the notification channel.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Watch radius, in the configured distance unit.
    pub radius: f64,
}

impl Subscriber {
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
        radius: f64,
    ) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            latitude,
            longitude,
            radius,
        }
    }

    /// Builds the subscriber's zone, rejecting a bad center or radius.
    pub fn zone(&self) -> Result<Zone, GeoError> {
        let center = GeoPoint::checked(self.latitude, self.longitude)?;
        Zone::new(center, self.radius)
    }
}

/// Persisted record that an object is inside a subscriber's zone and the
/// subscriber has already been notified about it.
///
/// Keyed by `(subscriber_id, object_id)`. Carries no position: membership
/// is binary and re-derived from each snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedSpot {
    pub subscriber_id: String,
    pub object_id: String,
    /// Raw label as seen on entry (may be empty).
    pub label: String,
    /// Raw category as seen on entry (may be empty).
    pub category: String,
}

impl TrackedSpot {
    pub fn new(
        subscriber_id: impl Into<String>,
        object_id: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            object_id: object_id.into(),
            label: label.into(),
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_from_valid_subscriber() {
        let sub = Subscriber::new("u1", "tok", 32.85, -97.41, 100.0);
        let zone = sub.zone().unwrap();
        assert_eq!(zone.center(), GeoPoint::new(32.85, -97.41));
        assert_eq!(zone.radius(), 100.0);
    }

    #[test]
    fn test_zone_rejects_negative_radius() {
        let sub = Subscriber::new("u1", "tok", 32.85, -97.41, -1.0);
        assert_eq!(sub.zone(), Err(GeoError::InvalidRadius(-1.0)));
    }

    #[test]
    fn test_zone_rejects_bad_center() {
        let sub = Subscriber::new("u1", "tok", 132.0, -97.41, 10.0);
        assert!(matches!(sub.zone(), Err(GeoError::InvalidLatitude(_))));
    }

    #[test]
    fn test_subscriber_json_shape() {
        let sub = Subscriber::new("u1", "tok", 1.5, 2.5, 25.0);
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["id"], "u1");
        assert_eq!(json["address"], "tok");
        assert_eq!(json["radius"], 25.0);
    }
}
