//! Decoding of the ADS-B Exchange v2 JSON payload.

use std::collections::HashSet;

use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::debug;

use super::FeedError;
use crate::model::{Altitude, TrackedObject};

/// Top-level response body: `{"ac": [...], ...}`.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    ac: Option<Vec<RawAircraft>>,
}

/// `alt_baro` is either a number of feet or the string `"ground"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAltitude {
    Feet(f64),
    Marker(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct RawAircraft {
    #[serde(default)]
    hex: String,
    #[serde(default)]
    flight: Option<String>,
    #[serde(default)]
    t: Option<String>,
    #[serde(default)]
    r: Option<String>,
    #[serde(default)]
    squawk: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    gs: Option<f64>,
    #[serde(default)]
    alt_baro: Option<RawAltitude>,
}

impl RawAircraft {
    /// Converts to a [`TrackedObject`], or `None` when no position is reported.
    fn into_tracked(self) -> Option<TrackedObject> {
        let (latitude, longitude) = (self.lat?, self.lon?);

        let altitude = match self.alt_baro {
            Some(RawAltitude::Feet(ft)) => Altitude::Feet(ft as i32),
            Some(RawAltitude::Marker(_)) | None => Altitude::Ground,
        };

        Some(TrackedObject {
            id: self.hex.trim().to_string(),
            label: trimmed(self.flight),
            category: trimmed(self.t),
            registration: trimmed(self.r),
            latitude,
            longitude,
            altitude,
            speed: self.gs.unwrap_or(0.0),
            squawk: trimmed(self.squawk),
        })
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Parses a feed response body into a snapshot.
///
/// Aircraft without a position are dropped. If the same identifier appears
/// more than once, the first occurrence wins.
pub fn parse_snapshot(body: &[u8]) -> Result<Vec<TrackedObject>, FeedError> {
    let response: FeedResponse =
        serde_json::from_slice(body).map_err(|e| FeedError::Decode(e.to_string()))?;

    let raw = response.ac.unwrap_or_default();
    let total = raw.len();

    let mut seen = HashSet::with_capacity(total);
    let snapshot: Vec<TrackedObject> = raw
        .into_iter()
        .filter_map(RawAircraft::into_tracked)
        .filter(|obj| !obj.id.is_empty() && seen.insert(obj.id.clone()))
        .collect();

    if snapshot.len() != total {
        debug!(
            received = total,
            kept = snapshot.len(),
            "Dropped aircraft without position or with duplicate hex"
        );
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "ac": [
            {"hex": "ae1234", "flight": "RCH123  ", "t": "C17", "r": "05-5140",
             "squawk": "4521", "lat": 32.9, "lon": -97.3, "gs": 412.3, "alt_baro": 24000},
            {"hex": "ae5678", "t": "H60", "lat": 32.77, "lon": -97.44, "alt_baro": "ground"},
            {"hex": "ae9999", "flight": "NOPOS", "t": "K35R"},
            {"hex": "ae1234", "flight": "DUPE", "lat": 1.0, "lon": 1.0}
        ],
        "msg": "No error",
        "now": 1700000000000,
        "total": 4
    }"#;

    #[test]
    fn test_parse_full_entry() {
        let snapshot = parse_snapshot(SAMPLE.as_bytes()).unwrap();
        let first = &snapshot[0];
        assert_eq!(first.id, "ae1234");
        assert_eq!(first.label, "RCH123");
        assert_eq!(first.category, "C17");
        assert_eq!(first.registration, "05-5140");
        assert_eq!(first.squawk, "4521");
        assert_eq!(first.altitude, Altitude::Feet(24000));
        assert!((first.speed - 412.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ground_marker_and_missing_fields() {
        let snapshot = parse_snapshot(SAMPLE.as_bytes()).unwrap();
        let helo = &snapshot[1];
        assert_eq!(helo.id, "ae5678");
        assert_eq!(helo.altitude, Altitude::Ground);
        assert_eq!(helo.label, "");
        assert_eq!(helo.registration, "");
        assert_eq!(helo.speed, 0.0);
    }

    #[test]
    fn test_drops_positionless_and_duplicates() {
        let snapshot = parse_snapshot(SAMPLE.as_bytes()).unwrap();
        let ids: Vec<&str> = snapshot.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["ae1234", "ae5678"]);
        assert_eq!(snapshot[0].label, "RCH123", "first occurrence wins");
    }

    #[test]
    fn test_null_or_missing_aircraft_list_is_empty() {
        assert!(parse_snapshot(br#"{"ac": null}"#).unwrap().is_empty());
        assert!(parse_snapshot(br#"{"msg": "No error"}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = parse_snapshot(b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }
}
