//! Geographic value types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced when constructing geographic values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    #[error("Invalid radius: {0} (must be a non-negative number)")]
    InvalidRadius(f64),

    #[error("Unknown distance unit '{0}' (expected nm, km or mi)")]
    UnknownUnit(String),
}

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point without validation.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a point, rejecting out-of-range or non-finite coordinates.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}/{:.6}", self.latitude, self.longitude)
    }
}

/// Linear unit used for distances and watch radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    /// Nautical miles (aviation default).
    #[default]
    NauticalMiles,
    /// Kilometres.
    Kilometers,
    /// Statute miles.
    StatuteMiles,
}

impl DistanceUnit {
    /// Mean Earth radius expressed in this unit.
    pub const fn earth_radius(&self) -> f64 {
        match self {
            DistanceUnit::NauticalMiles => 3440.1,
            DistanceUnit::Kilometers => 6371.0,
            DistanceUnit::StatuteMiles => 3958.8,
        }
    }

    /// Short suffix used in config files and log output.
    pub const fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::NauticalMiles => "nm",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::StatuteMiles => "mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for DistanceUnit {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nm" | "nmi" => Ok(DistanceUnit::NauticalMiles),
            "km" => Ok(DistanceUnit::Kilometers),
            "mi" => Ok(DistanceUnit::StatuteMiles),
            other => Err(GeoError::UnknownUnit(other.to_string())),
        }
    }
}
