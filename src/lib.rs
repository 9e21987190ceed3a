//! GPS track reduction and analysis
//!
//! Thins recorded tracks by dropping near-duplicate points and spatial
//! outliers, computes the spherical centroid and DRMS spread of a cluster of
//! fixes, and tiles a region into an equidistant lookup grid.
//!
//! All operations are pure functions over borrowed input; they return fresh
//! owned values and never modify the caller's records.

pub mod centroid;
pub mod distance;
pub mod drms;
pub mod error;
pub mod gpx_track;
pub mod grid;
pub mod locate;
pub mod math;
pub mod near_point_removal;
pub mod neighbour_filter;
pub mod outlier_point_removal;
pub mod point;

// Re-export commonly used types
pub use centroid::centroid;
pub use distance::{DistanceFunction, HAVERSINE, VINCENTY};
pub use drms::{distances_from_center, drms, ClusterSpread, PointDistance};
pub use error::{GeoError, Result};
pub use gpx_track::track_from_gpx;
pub use grid::{
    bounding_box_of, box_at_distance, build_grid, cell_for, expanded_cell, flatten_corners, grid_size, BoundingBox,
    Cell, CellIndex, Grid, GridSize, MAX_GRID_CELLS,
};
pub use locate::{FieldPath, FnLocator, Identity, Locate};
pub use near_point_removal::{near_point_removal, NearPointOptions};
pub use outlier_point_removal::{
    outlier_point_removal, outlier_point_removal_cascading, outlier_point_removal_multiple, OutlierOptions,
};
pub use point::Point;
