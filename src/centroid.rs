//! Spherical mean (centre of gravity) of a set of positions.

use crate::error::{GeoError, Result};
use crate::math::{to_deg, to_rad};
use crate::point::Point;

/// Centre of gravity of `points`.
///
/// Each position is turned into a unit vector, the vectors are averaged and
/// the mean vector is projected back to latitude/longitude, so clusters that
/// straddle the antimeridian do not average to the wrong side of the globe.
/// Altitude and timestamp are not carried into the result.
///
/// Fails with [`GeoError::EmptyInput`] for an empty slice.
pub fn centroid(points: &[Point]) -> Result<Point> {
    if points.is_empty() {
        return Err(GeoError::EmptyInput {
            operation: "centroid",
        });
    }

    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for p in points {
        let lat = to_rad(p.latitude);
        let lon = to_rad(p.longitude);
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
    }

    let n = points.len() as f64;
    x /= n;
    y /= n;
    z /= n;

    let longitude = y.atan2(x);
    let hyp = (x * x + y * y).sqrt();
    let latitude = z.atan2(hyp);

    Ok(Point::new(to_deg(latitude), to_deg(longitude)))
}
