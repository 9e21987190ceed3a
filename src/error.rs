//! Error types for track reduction, statistics and grid building.

use thiserror::Error;

/// Errors raised by the reduction, statistics and grid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Distance function name is not one of the supported names.
    #[error("Unknown distance function {name}, expected {expected}")]
    UnknownDistanceFunction { name: String, expected: &'static str },

    /// Configured locator did not resolve a point on the first record.
    #[error("No path \"{path}\" in record")]
    PathNotFound { path: String },

    /// Configured locator resolved the first record but not a later one.
    #[error("Record {index} has no point at path \"{path}\"")]
    UnresolvedRecord { index: usize, path: String },

    /// Threshold is negative, NaN or infinite.
    #[error("Invalid threshold {0}: expected a finite, non-negative number of metres")]
    InvalidThreshold(f64),

    /// Grid spacing is zero, negative, NaN or infinite.
    #[error("Invalid grid spacing {0}: expected a finite, positive number of metres")]
    InvalidGridSpacing(f64),

    /// Box and spacing would give a grid with more cells than allowed.
    #[error("Grid of {rows} rows and {columns} columns exceeds the limit of {limit} cells")]
    GridTooLarge {
        rows: usize,
        columns: usize,
        limit: usize,
    },

    /// Operation needs at least one input value.
    #[error("{operation} requires at least one value")]
    EmptyInput { operation: &'static str },

    /// Cell coordinates outside the grid.
    #[error("Cell ({x}, {y}) is outside a grid of {columns} columns and {rows} rows")]
    CellOutOfRange {
        x: usize,
        y: usize,
        columns: usize,
        rows: usize,
    },
}

impl GeoError {
    /// True for errors caused by caller-supplied options.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GeoError::UnknownDistanceFunction { .. }
                | GeoError::PathNotFound { .. }
                | GeoError::UnresolvedRecord { .. }
                | GeoError::InvalidThreshold(_)
                | GeoError::InvalidGridSpacing(_)
                | GeoError::GridTooLarge { .. }
        )
    }

    /// True for errors caused by input that violates an operation's precondition.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GeoError::EmptyInput { .. } | GeoError::CellOutOfRange { .. }
        )
    }
}

/// Result type for reduction, statistics and grid operations.
pub type Result<T> = std::result::Result<T, GeoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_distance_function_message_names_value_and_allowed_set() {
        let err = GeoError::UnknownDistanceFunction {
            name: "nonesuch".to_string(),
            expected: "haversine or vincenty",
        };
        let msg = err.to_string();
        assert!(msg.contains("nonesuch"));
        assert!(msg.contains("haversine or vincenty"));
        assert!(err.is_configuration());
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_empty_input_is_precondition() {
        let err = GeoError::EmptyInput {
            operation: "centroid",
        };
        assert_eq!(err.to_string(), "centroid requires at least one value");
        assert!(err.is_precondition());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_grid_too_large_is_configuration() {
        let err = GeoError::GridTooLarge {
            rows: usize::MAX,
            columns: 2,
            limit: 10,
        };
        assert!(err.is_configuration());
        assert!(err.to_string().contains("limit of 10 cells"));
    }
}
