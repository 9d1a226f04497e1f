//! Tracked objects as they appear in one feed snapshot.

use std::fmt;

use crate::geo::GeoPoint;

/// Altitude below which the summary prints plain feet instead of a flight level.
const FLIGHT_LEVEL_THRESHOLD_FT: i32 = 10_000;

/// Barometric altitude, resolved once when the feed is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Altitude {
    /// Airborne at the given altitude in feet.
    Feet(i32),
    /// Reported on the ground (or no numeric altitude reported).
    Ground,
}

/// Converts feet to a flight level (hundreds of feet, truncated).
#[inline]
fn feet_to_flight_level(feet: i32) -> i32 {
    feet / 100
}

impl fmt::Display for Altitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Altitude::Ground => f.write_str("ground"),
            Altitude::Feet(ft) if *ft < FLIGHT_LEVEL_THRESHOLD_FT => write!(f, "{}ft", ft),
            Altitude::Feet(ft) => write!(f, "fl{}", feet_to_flight_level(*ft)),
        }
    }
}

/// One aircraft in a feed snapshot.
///
/// Exists only for the duration of a poll cycle; what survives between cycles
/// is a [`super::TrackedSpot`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedObject {
    /// ICAO 24-bit address in hex. Stable per airframe.
    pub id: String,
    /// Callsign (may be empty).
    pub label: String,
    /// ICAO type designator (may be empty).
    pub category: String,
    /// Registration / tail number (may be empty).
    pub registration: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Altitude,
    /// Ground speed in knots.
    pub speed: f64,
    /// Transponder code (may be empty).
    pub squawk: String,
}

impl TrackedObject {
    /// Creates an object with only identity and position set.
    ///
    /// Convenient for tests and synthetic feeds.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            category: String::new(),
            registration: String::new(),
            latitude,
            longitude,
            altitude: Altitude::Ground,
            speed: 0.0,
            squawk: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_altitude(mut self, altitude: Altitude) -> Self {
        self.altitude = altitude;
        self
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// One-line summary, as written to the log when an object enters a zone.
impl fmt::Display for TrackedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\": {} registration {} @ lat/long {:.6}/{:.6} squawking {} {:.1}kt @ {}",
            self.id,
            self.label,
            self.category,
            self.registration,
            self.latitude,
            self.longitude,
            self.squawk,
            self.speed,
            self.altitude
        )
    }
}
