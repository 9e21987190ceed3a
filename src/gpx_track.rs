//! GPX boundary adapter: flattens parsed GPX tracks into canonical points.

use chrono::{DateTime, Utc};
use gpx::{Gpx, Waypoint};

use crate::point::Point;

/// All track points of a parsed GPX document, in file order.
///
/// Tracks and segments are concatenated; routes and standalone waypoints are
/// not part of a recorded track and are skipped.
pub fn track_from_gpx(gpx: &Gpx) -> Vec<Point> {
    gpx.tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(waypoint_to_point)
        .collect()
}

/// Convert one GPX waypoint; elevation becomes altitude.
pub fn waypoint_to_point(waypoint: &Waypoint) -> Point {
    let position = waypoint.point();
    Point {
        latitude: position.y(),
        longitude: position.x(),
        altitude: waypoint.elevation,
        timestamp: waypoint.time.as_ref().and_then(|time| {
            time.format()
                .ok()
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|t| t.with_timezone(&Utc))
        }),
    }
}
