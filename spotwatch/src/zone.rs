//! Zone membership filtering.
//!
//! A [`Zone`] is a subscriber's circular region of interest. Filtering a
//! snapshot against a zone is a pure, order-preserving operation; radius
//! validation happens once when the zone is built, not per filter call.

use crate::geo::{distance, DistanceUnit, GeoError, GeoPoint};
use crate::model::TrackedObject;

/// A circular region: center point plus radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    center: GeoPoint,
    radius: f64,
}

impl Zone {
    /// Creates a zone, rejecting NaN or negative radii.
    ///
    /// A radius of `f64::INFINITY` is accepted and matches every object.
    pub fn new(center: GeoPoint, radius: f64) -> Result<Self, GeoError> {
        if radius.is_nan() || radius < 0.0 {
            return Err(GeoError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns true if `point` lies within the zone (boundary inclusive).
    #[inline]
    pub fn contains(&self, point: GeoPoint, unit: DistanceUnit) -> bool {
        distance(point, self.center, unit) <= self.radius
    }

    /// Returns the objects inside this zone, preserving snapshot order.
    pub fn filter<'a>(
        &self,
        objects: &'a [TrackedObject],
        unit: DistanceUnit,
    ) -> Vec<&'a TrackedObject> {
        filter_in_zone(objects, self.center, self.radius, unit)
    }
}

/// Returns the subsequence of `objects` within `radius` of `center`.
///
/// The radius is not validated here; callers build a [`Zone`] first.
pub fn filter_in_zone(
    objects: &[TrackedObject],
    center: GeoPoint,
    radius: f64,
    unit: DistanceUnit,
) -> Vec<&TrackedObject> {
    objects
        .iter()
        .filter(|obj| distance(obj.position(), center, unit) <= radius)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HOME: GeoPoint = GeoPoint::new(32.8533, -97.4132);

    fn snapshot() -> Vec<TrackedObject> {
        vec![
            // ~6nm north
            TrackedObject::new("NEAR01", 32.95, -97.4132),
            // ~180nm south-east
            TrackedObject::new("FAR001", 29.99, -95.34),
            // on top of the center
            TrackedObject::new("HOME01", 32.8533, -97.4132),
        ]
    }

    #[test]
    fn test_filter_keeps_only_objects_in_radius() {
        let objects = snapshot();
        let inside = filter_in_zone(&objects, HOME, 100.0, DistanceUnit::NauticalMiles);
        let ids: Vec<&str> = inside.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["NEAR01", "HOME01"]);
    }

    #[test]
    fn test_zero_radius_keeps_coincident_points_only() {
        let objects = snapshot();
        let inside = filter_in_zone(&objects, HOME, 0.0, DistanceUnit::NauticalMiles);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].id, "HOME01");
    }

    #[test]
    fn test_empty_snapshot() {
        let inside = filter_in_zone(&[], HOME, 50.0, DistanceUnit::Kilometers);
        assert!(inside.is_empty());
    }

    #[test]
    fn test_unit_changes_membership() {
        // NEAR01 is ~5.8nm / ~10.8km away
        let objects = vec![TrackedObject::new("NEAR01", 32.95, -97.4132)];
        assert_eq!(
            filter_in_zone(&objects, HOME, 8.0, DistanceUnit::NauticalMiles).len(),
            1
        );
        assert!(filter_in_zone(&objects, HOME, 8.0, DistanceUnit::Kilometers).is_empty());
    }

    #[test]
    fn test_zone_rejects_negative_and_nan_radius() {
        assert!(Zone::new(HOME, -0.5).is_err());
        assert!(Zone::new(HOME, f64::NAN).is_err());
        assert!(Zone::new(HOME, 0.0).is_ok());
        assert!(Zone::new(HOME, f64::INFINITY).is_ok());
    }

    #[test]
    fn test_zone_contains_boundary() {
        let edge = GeoPoint::new(33.8533, -97.4132);
        let d = distance(edge, HOME, DistanceUnit::NauticalMiles);
        let zone = Zone::new(HOME, d).unwrap();
        assert!(zone.contains(edge, DistanceUnit::NauticalMiles));
    }

    fn objects() -> impl Strategy<Value = Vec<TrackedObject>> {
        prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 0..40).prop_map(|points| {
            points
                .into_iter()
                .enumerate()
                .map(|(i, (lat, lon))| TrackedObject::new(format!("OBJ{:03}", i), lat, lon))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_filter_partitions_by_distance(
            objs in objects(),
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            radius in 0.0f64..6000.0,
        ) {
            let center = GeoPoint::new(lat, lon);
            let inside = filter_in_zone(&objs, center, radius, DistanceUnit::NauticalMiles);
            let inside_ids: Vec<&str> = inside.iter().map(|o| o.id.as_str()).collect();

            for obj in &objs {
                let d = distance(obj.position(), center, DistanceUnit::NauticalMiles);
                if inside_ids.contains(&obj.id.as_str()) {
                    prop_assert!(d <= radius);
                } else {
                    prop_assert!(d > radius);
                }
            }
        }

        #[test]
        fn prop_infinite_radius_returns_everything_in_order(
            objs in objects(),
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
        ) {
            let zone = Zone::new(GeoPoint::new(lat, lon), f64::INFINITY).unwrap();
            let inside = zone.filter(&objs, DistanceUnit::Kilometers);
            let expected: Vec<&TrackedObject> = objs.iter().collect();
            prop_assert_eq!(inside, expected);
        }
    }
}
