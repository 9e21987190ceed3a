//! Degree and radian conversion, plus the flat-earth factors used by the grid.

/// Kilometres per degree of latitude.
pub const KM_PER_DEGREE_LATITUDE: f64 = 110.574235;

/// Kilometres per degree of longitude at the equator; scaled by cos(latitude).
pub const KM_PER_DEGREE_LONGITUDE_EQUATOR: f64 = 110.572833;

/// Convert degrees to radians.
pub fn to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Convert radians to degrees.
pub fn to_deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}
