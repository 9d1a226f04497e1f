//! Great-circle geometry.
//!
//! Provides the haversine distance between two geographic points, expressed
//! in a configurable [`DistanceUnit`] so that watch radii and distances always
//! share the same unit.

mod types;

pub use types::{DistanceUnit, GeoError, GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Great-circle distance between two points using the haversine formula.
///
/// # Arguments
///
/// * `from` - First point (degrees)
/// * `to` - Second point (degrees)
/// * `unit` - Unit of the returned distance
///
/// # Returns
///
/// The distance along the Earth's surface. Symmetric in its arguments and
/// zero for identical points.
#[inline]
pub fn distance(from: GeoPoint, to: GeoPoint, unit: DistanceUnit) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair outside [0, 1] for near-antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    unit.earth_radius() * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_distance_to_self_is_zero() {
        let fort_worth = GeoPoint::new(32.8533, -97.4132);
        assert_eq!(distance(fort_worth, fort_worth, DistanceUnit::NauticalMiles), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude_is_sixty_nautical_miles() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = distance(a, b, DistanceUnit::NauticalMiles);
        assert!((d - 60.04).abs() < 0.1, "expected ~60nm, got {}", d);
    }

    #[test]
    fn test_dfw_to_iah_in_each_unit() {
        // KDFW to KIAH is roughly 195nm / 362km / 225mi
        let dfw = GeoPoint::new(32.8998, -97.0403);
        let iah = GeoPoint::new(29.9902, -95.3368);

        let nm = distance(dfw, iah, DistanceUnit::NauticalMiles);
        let km = distance(dfw, iah, DistanceUnit::Kilometers);
        let mi = distance(dfw, iah, DistanceUnit::StatuteMiles);

        assert!((nm - 195.0).abs() < 3.0, "got {}nm", nm);
        assert!((km - 362.0).abs() < 5.0, "got {}km", km);
        assert!((mi - 225.0).abs() < 4.0, "got {}mi", mi);
    }

    #[test]
    fn test_antipodal_points_are_half_circumference() {
        let a = GeoPoint::new(40.0, -74.0);
        let b = GeoPoint::new(-40.0, 106.0);
        for unit in [
            DistanceUnit::NauticalMiles,
            DistanceUnit::Kilometers,
            DistanceUnit::StatuteMiles,
        ] {
            let expected = PI * unit.earth_radius();
            let d = distance(a, b, unit);
            assert!(
                (d - expected).abs() < 1e-6 * expected,
                "{}: expected {}, got {}",
                unit,
                expected,
                d
            );
        }
    }

    fn point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(p in point(), q in point()) {
            let pq = distance(p, q, DistanceUnit::NauticalMiles);
            let qp = distance(q, p, DistanceUnit::NauticalMiles);
            prop_assert!((pq - qp).abs() < EPSILON * pq.max(1.0));
        }

        #[test]
        fn prop_distance_is_bounded(p in point(), q in point()) {
            let d = distance(p, q, DistanceUnit::Kilometers);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= PI * DistanceUnit::Kilometers.earth_radius() + EPSILON);
        }

        #[test]
        fn prop_distance_to_self_is_zero(p in point()) {
            prop_assert!(distance(p, p, DistanceUnit::StatuteMiles).abs() < EPSILON);
        }
    }
}
