//! Distance provider: great-circle (haversine) and ellipsoidal (Vincenty) metres.

use std::fmt;
use std::str::FromStr;

use geo::{HaversineDistance, VincentyDistance};
use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::point::Point;

pub const HAVERSINE: &str = "haversine";
pub const VINCENTY: &str = "vincenty";

const EXPECTED_NAMES: &str = "haversine or vincenty";

/// Selects the metric used by the filtering policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceFunction {
    /// Great-circle distance on a spherical earth.
    #[default]
    Haversine,
    /// Ellipsoidal (WGS84) distance; more accurate, more expensive.
    Vincenty,
}

impl DistanceFunction {
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        match self {
            DistanceFunction::Haversine => haversine(a, b),
            DistanceFunction::Vincenty => vincenty(a, b),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DistanceFunction::Haversine => HAVERSINE,
            DistanceFunction::Vincenty => VINCENTY,
        }
    }
}

impl fmt::Display for DistanceFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceFunction {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            HAVERSINE => Ok(DistanceFunction::Haversine),
            VINCENTY => Ok(DistanceFunction::Vincenty),
            other => Err(GeoError::UnknownDistanceFunction {
                name: other.to_string(),
                expected: EXPECTED_NAMES,
            }),
        }
    }
}

/// Great-circle distance in metres.
pub fn haversine(a: &Point, b: &Point) -> f64 {
    let pa: geo::Point<f64> = (*a).into();
    let pb: geo::Point<f64> = (*b).into();
    pa.haversine_distance(&pb)
}

/// Ellipsoidal distance in metres.
///
/// Vincenty's iteration does not converge for nearly antipodal points; the
/// haversine distance is returned for those.
pub fn vincenty(a: &Point, b: &Point) -> f64 {
    let pa: geo::Point<f64> = (*a).into();
    let pb: geo::Point<f64> = (*b).into();
    match pa.vincenty_distance(&pb) {
        Ok(metres) => metres,
        Err(_) => {
            tracing::warn!(
                from_lat = a.latitude,
                from_lon = a.longitude,
                to_lat = b.latitude,
                to_lon = b.longitude,
                "vincenty failed to converge, using haversine"
            );
            pa.haversine_distance(&pb)
        }
    }
}
