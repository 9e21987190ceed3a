//! Canonical geographic point and the adapters that normalise records into it.
//!
//! Every algorithm in the crate works on [`Point`]. Records arriving in other
//! shapes (JSON objects with legacy `lat`/`lon` keys, GPX waypoints, `geo`
//! points) are converted at the boundary so the core never has to look at
//! field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// WGS84 position with optional altitude and timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Degrees, -90..90.
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Degrees, -180..180.
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    /// Metres.
    #[serde(
        default,
        alias = "alt",
        alias = "ele",
        alias = "elevation",
        skip_serializing_if = "Option::is_none"
    )]
    pub altitude: Option<f64>,
    #[serde(
        default,
        alias = "time",
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Point {
            latitude,
            longitude,
            altitude: None,
            timestamp: None,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Normalise a JSON object into a point.
    ///
    /// Accepts the canonical `latitude`/`longitude` keys and the legacy
    /// `lat`/`lon`/`lng` keys. Returns `None` when the value is not an object
    /// with numeric coordinates.
    pub fn from_json(value: &Value) -> Option<Point> {
        if !value.is_object() {
            return None;
        }
        Point::deserialize(value).ok()
    }

    /// Same position, altitude and timestamp dropped.
    pub fn position(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }
}

impl From<[f64; 2]> for Point {
    /// `[latitude, longitude]`
    fn from(pair: [f64; 2]) -> Self {
        Point::new(pair[0], pair[1])
    }
}

impl From<(f64, f64)> for Point {
    /// `(latitude, longitude)`
    fn from(pair: (f64, f64)) -> Self {
        Point::new(pair.0, pair.1)
    }
}

impl From<&Point> for Point {
    fn from(point: &Point) -> Self {
        *point
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(point: Point) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

impl From<geo::Point<f64>> for Point {
    fn from(point: geo::Point<f64>) -> Self {
        Point::new(point.y(), point.x())
    }
}

// RFC 3339 strings or epoch milliseconds; anything else is treated as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }))
}
