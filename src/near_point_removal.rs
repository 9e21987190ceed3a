//! Near point removal.
//!
//! Drops every record that lies closer than `threshold` metres to the record
//! immediately before it in the source track. Only the direct predecessor is
//! checked, never an earlier point or the last retained one.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceFunction;
use crate::error::Result;
use crate::locate::Locate;
use crate::neighbour_filter::{check_threshold, filter};
use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NearPointOptions {
    /// Metres; a record nearer than this to its predecessor is dropped.
    pub threshold: f64,
    pub distance_function: DistanceFunction,
    /// Always return the last record, however near it is.
    pub keep_last_point: bool,
}

impl Default for NearPointOptions {
    fn default() -> Self {
        NearPointOptions {
            threshold: 1.0,
            distance_function: DistanceFunction::Haversine,
            keep_last_point: true,
        }
    }
}

impl NearPointOptions {
    /// Select the metric by name (`"haversine"` or `"vincenty"`).
    pub fn with_distance_function(mut self, name: &str) -> Result<Self> {
        self.distance_function = name.parse()?;
        Ok(self)
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_keep_last_point(mut self, keep_last_point: bool) -> Self {
        self.keep_last_point = keep_last_point;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_threshold(self.threshold)
    }
}

/// Remove records closer than `options.threshold` to their source predecessor.
pub fn near_point_removal<R, L>(track: &[R], options: &NearPointOptions, locator: &L) -> Result<Vec<R>>
where
    R: Clone,
    L: Locate<R> + ?Sized,
{
    options.validate()?;
    let metric = options.distance_function;
    let threshold = options.threshold;
    filter(
        track,
        options.keep_last_point,
        locator,
        |prev: &Point, curr: &Point, _next: Option<&Point>| metric.distance(prev, curr) >= threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;
    use crate::locate::{FieldPath, Identity};
    use serde_json::json;

    // Degrees of latitude per metre along a meridian on the haversine sphere.
    const DEG_PER_METRE: f64 = 1.0 / 111_195.08;

    fn north(metres: f64) -> Point {
        Point::new(55.9 + metres * DEG_PER_METRE, -3.2)
    }

    #[test]
    fn test_defaults() {
        let o = NearPointOptions::default();
        assert_eq!(o.threshold, 1.0);
        assert_eq!(o.distance_function, DistanceFunction::Haversine);
        assert!(o.keep_last_point);
    }

    #[test]
    fn test_drops_point_near_predecessor() {
        let track = vec![north(0.0), north(2.0), north(12.0)];
        let options = NearPointOptions::default().with_threshold(5.0);
        let kept = near_point_removal(&track, &options, &Identity).unwrap();
        assert_eq!(kept, vec![track[0], track[2]]);
    }

    #[test]
    fn test_vincenty_metric() {
        let track = vec![north(0.0), north(2.0), north(12.0), north(30.0)];
        let options = NearPointOptions::default()
            .with_threshold(5.0)
            .with_distance_function("vincenty")
            .unwrap();
        let kept = near_point_removal(&track, &options, &Identity).unwrap();
        assert_eq!(kept, vec![track[0], track[2], track[3]]);
    }

    #[test]
    fn test_zero_threshold_keeps_everything() {
        let track = vec![north(0.0), north(0.0), north(0.1), north(0.1), north(3.0)];
        let options = NearPointOptions::default()
            .with_threshold(0.0)
            .with_keep_last_point(false);
        let kept = near_point_removal(&track, &options, &Identity).unwrap();
        assert_eq!(kept, track);
    }

    #[test]
    fn test_compares_with_source_predecessor_not_last_kept() {
        // 0.6 m steps: each point is near its own predecessor, so all but the
        // first go even though the walk ends 2.4 m away from it.
        let track: Vec<Point> = (0..5).map(|i| north(i as f64 * 0.6)).collect();
        let options = NearPointOptions::default().with_keep_last_point(false);
        let kept = near_point_removal(&track, &options, &Identity).unwrap();
        assert_eq!(kept, vec![track[0]]);
    }

    #[test]
    fn test_keep_last_point() {
        let track = vec![north(0.0), north(10.0), north(10.2)];
        let keep = near_point_removal(&track, &NearPointOptions::default(), &Identity).unwrap();
        assert_eq!(keep, track);

        let options = NearPointOptions::default().with_keep_last_point(false);
        let drop = near_point_removal(&track, &options, &Identity).unwrap();
        assert_eq!(drop, vec![track[0], track[1]]);
    }

    #[test]
    fn test_unknown_distance_function_fails_before_filtering() {
        let empty: Vec<Point> = Vec::new();
        let result = NearPointOptions::default()
            .with_distance_function("nonesuch")
            .and_then(|options| near_point_removal(&empty, &options, &Identity));
        assert!(matches!(
            result,
            Err(GeoError::UnknownDistanceFunction { ref name, .. }) if name == "nonesuch"
        ));
    }

    #[test]
    fn test_invalid_threshold_fails_even_for_empty_track() {
        let empty: Vec<Point> = Vec::new();
        let options = NearPointOptions::default().with_threshold(-1.0);
        assert_eq!(
            near_point_removal(&empty, &options, &Identity),
            Err(GeoError::InvalidThreshold(-1.0))
        );
    }

    #[test]
    fn test_empty_and_single_tracks() {
        let empty: Vec<Point> = Vec::new();
        assert!(near_point_removal(&empty, &NearPointOptions::default(), &Identity)
            .unwrap()
            .is_empty());

        let single = vec![north(0.0)];
        assert_eq!(
            near_point_removal(&single, &NearPointOptions::default(), &Identity).unwrap(),
            single
        );
    }

    #[test]
    fn test_records_with_path() {
        let track: Vec<_> = [0.0, 0.5, 4.0, 4.2, 9.0]
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                let p = north(m);
                json!({"seq": i, "coords": {"latitude": p.latitude, "longitude": p.longitude}})
            })
            .collect();
        let kept = near_point_removal(&track, &NearPointOptions::default(), &FieldPath::new(["coords"])).unwrap();
        let seqs: Vec<_> = kept.iter().map(|r| r["seq"].as_u64().unwrap()).collect();
        assert_eq!(seqs, vec![0, 2, 4]);
    }

    #[test]
    fn test_options_from_json() {
        let o: NearPointOptions =
            serde_json::from_value(json!({"threshold": 3.7, "distanceFunction": "vincenty"})).unwrap();
        assert_eq!(o.threshold, 3.7);
        assert_eq!(o.distance_function, DistanceFunction::Vincenty);
        assert!(o.keep_last_point);
    }
}
