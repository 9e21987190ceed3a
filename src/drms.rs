//! Spread statistics: distance of each point from a centre and their
//! root-mean-square (DRMS).

use serde::Serialize;

use crate::centroid::centroid;
use crate::distance::haversine;
use crate::error::{GeoError, Result};
use crate::point::Point;

/// A point together with its great-circle distance (metres) from a centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointDistance {
    #[serde(flatten)]
    pub point: Point,
    pub distance: f64,
}

/// Distance of every point from `center`, as new records in input order.
pub fn distances_from_center(points: &[Point], center: &Point) -> Vec<PointDistance> {
    points
        .iter()
        .map(|p| PointDistance {
            point: *p,
            distance: haversine(p, center),
        })
        .collect()
}

/// Root of the mean of the squared values.
pub fn drms(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(GeoError::EmptyInput { operation: "drms" });
    }
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    Ok((sum_sq / values.len() as f64).sqrt())
}

/// Spread of a cluster around its centroid, with the points farther than
/// `factor` × DRMS from the centre flagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSpread {
    pub center: Point,
    pub drms: f64,
    pub factor: f64,
    pub distances: Vec<PointDistance>,
    /// Indices into the analysed points.
    pub outliers: Vec<usize>,
}

impl ClusterSpread {
    pub fn analyze(points: &[Point], factor: f64) -> Result<Self> {
        let center = centroid(points)?;
        let distances = distances_from_center(points, &center);
        let values: Vec<f64> = distances.iter().map(|d| d.distance).collect();
        let drms = drms(&values)?;
        let limit = factor * drms;
        let outliers = distances
            .iter()
            .enumerate()
            .filter(|(_, d)| d.distance > limit)
            .map(|(i, _)| i)
            .collect();

        Ok(ClusterSpread {
            center,
            drms,
            factor,
            distances,
            outliers,
        })
    }

    /// The analysed points that were not flagged, in input order.
    pub fn inliers(&self) -> Vec<Point> {
        // outliers are collected in ascending order
        self.distances
            .iter()
            .enumerate()
            .filter(|(i, _)| self.outliers.binary_search(i).is_err())
            .map(|(_, d)| d.point)
            .collect()
    }
}
