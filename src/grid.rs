//! Equidistant grid over a latitude/longitude box.
//!
//! Cells are laid out with a local flat-earth approximation: a fixed number of
//! kilometres per degree of latitude and a cos(latitude) scaled number of
//! kilometres per degree of longitude. Row and column counts come from the
//! ellipsoidal extent of the box. Each row is placed directly below the
//! previous one, so any error of the approximation accumulates from north to
//! south and from west to east.
//!
//! Every cell is clipped to the requested box, and the east edge of the last
//! column and the south edge of the last row are pinned to it, so the grid
//! covers exactly the box and never reaches outside it. At mid-latitudes the
//! flat-earth cells are slightly larger than the spacing; on boxes spanning
//! more than about a hundred cells the walk reaches the box edge early, and
//! the trailing row or column collapses to zero extent on that edge. For
//! city-scale boxes the last row and column are simply smaller than the
//! spacing.
//!
//! Boxes crossing the antimeridian are not supported.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::vincenty;
use crate::error::{GeoError, Result};
use crate::math::{to_rad, KM_PER_DEGREE_LATITUDE, KM_PER_DEGREE_LONGITUDE_EQUATOR};
use crate::point::Point;

/// Rectangle in latitude/longitude space.
///
/// `nw.latitude >= se.latitude` and `nw.longitude <= se.longitude`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub nw: Point,
    pub se: Point,
}

impl BoundingBox {
    /// Box spanned by two opposite corners given in any order.
    pub fn from_corners(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Self {
        BoundingBox {
            nw: Point::new(lat1.max(lat2), lon1.min(lon2)),
            se: Point::new(lat1.min(lat2), lon1.max(lon2)),
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.nw.latitude >= latitude
            && self.nw.longitude <= longitude
            && self.se.latitude <= latitude
            && self.se.longitude >= longitude
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.nw.latitude + self.se.latitude) / 2.0,
            (self.nw.longitude + self.se.longitude) / 2.0,
        )
    }
}

/// One grid tile.
pub type Cell = BoundingBox;

/// Column (`x`, west to east) and row (`y`, north to south) of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellIndex {
    pub x: usize,
    pub y: usize,
}

/// Row-major table of cells; row 0 is the northernmost, column 0 the westernmost.
///
/// Only [`build_grid`] creates grids, so `cells.len() == rows * columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.columns && y < self.rows {
            self.cells.get(y * self.columns + x)
        } else {
            None
        }
    }

    /// Rows from north to south, each from west to east.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        // chunks() panics on zero; an empty grid has no rows anyway
        self.cells.chunks(self.columns.max(1))
    }

    /// Cells with their indices, row by row.
    pub fn indexed_cells(&self) -> impl Iterator<Item = (CellIndex, &Cell)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(i, cell)| {
            (
                CellIndex {
                    x: i % columns,
                    y: i / columns,
                },
                cell,
            )
        })
    }

    /// Box covering every cell.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        bounding_box_of(self.cells.iter().flat_map(|c| [c.nw, c.se]))
    }
}

/// Box whose north-west corner is (`latitude`, `longitude`) and which extends
/// `distance` metres east and south.
pub fn box_at_distance(latitude: f64, longitude: f64, distance: f64) -> BoundingBox {
    let km = distance / 1000.0;
    let km_per_degree_longitude = KM_PER_DEGREE_LONGITUDE_EQUATOR * to_rad(latitude).cos();
    let delta_lat = km / KM_PER_DEGREE_LATITUDE;
    let delta_lon = km / km_per_degree_longitude;

    BoundingBox {
        nw: Point::new(latitude, longitude),
        se: Point::new(latitude - delta_lat, longitude + delta_lon),
    }
}

/// Most cells [`build_grid`] will allocate.
pub const MAX_GRID_CELLS: usize = 10_000_000;

/// Row and column count of the grid [`build_grid`] would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSize {
    pub rows: usize,
    pub columns: usize,
}

impl GridSize {
    /// `None` when the product overflows.
    pub fn cells(&self) -> Option<usize> {
        self.rows.checked_mul(self.columns)
    }
}

/// Row and column count for the box spanned by two corners without building
/// any cells.
///
/// Row count is `ceil(height / distance)` and column count
/// `ceil(width / distance)`, with height and width measured along the
/// eastern and northern edges with the ellipsoidal distance.
pub fn grid_size(lat1: f64, lon1: f64, lat2: f64, lon2: f64, distance: f64) -> Result<GridSize> {
    if !(distance.is_finite() && distance > 0.0) {
        return Err(GeoError::InvalidGridSpacing(distance));
    }

    let area = BoundingBox::from_corners(lat1, lon1, lat2, lon2);
    let north_east = Point::new(area.nw.latitude, area.se.longitude);
    let width = vincenty(&north_east, &area.nw);
    let height = vincenty(&north_east, &area.se);

    let size = GridSize {
        rows: (height / distance).ceil() as usize,
        columns: (width / distance).ceil() as usize,
    };
    debug!(rows = size.rows, height, columns = size.columns, width, distance, "grid size");
    Ok(size)
}

/// Tile the box spanned by two corners (in any order) into cells of about
/// `distance` metres.
///
/// Dimensions are those of [`grid_size`]. A box with no extent on either
/// axis gives an empty grid. Fails with [`GeoError::GridTooLarge`] when the
/// grid would hold more than [`MAX_GRID_CELLS`] cells.
pub fn build_grid(lat1: f64, lon1: f64, lat2: f64, lon2: f64, distance: f64) -> Result<Grid> {
    let GridSize { rows, columns } = grid_size(lat1, lon1, lat2, lon2, distance)?;

    if rows == 0 || columns == 0 {
        return Ok(Grid {
            rows: 0,
            columns: 0,
            cells: Vec::new(),
        });
    }

    let total = match rows.checked_mul(columns) {
        Some(total) if total <= MAX_GRID_CELLS => total,
        _ => {
            return Err(GeoError::GridTooLarge {
                rows,
                columns,
                limit: MAX_GRID_CELLS,
            })
        }
    };

    let area = BoundingBox::from_corners(lat1, lon1, lat2, lon2);
    let mut cells = Vec::with_capacity(total);
    let mut row_latitude = area.nw.latitude;
    for y in 0..rows {
        let mut cell_longitude = area.nw.longitude;
        let mut row_south = row_latitude;
        for x in 0..columns {
            let mut cell = box_at_distance(row_latitude, cell_longitude, distance);
            cell.se.longitude = if x == columns - 1 {
                area.se.longitude
            } else {
                cell.se.longitude.min(area.se.longitude)
            };
            cell.se.latitude = if y == rows - 1 {
                area.se.latitude
            } else {
                cell.se.latitude.max(area.se.latitude)
            };
            cell_longitude = cell.se.longitude;
            row_south = cell.se.latitude;
            cells.push(cell);
        }
        row_latitude = row_south;
    }

    Ok(Grid {
        rows,
        columns,
        cells,
    })
}

/// Box covering the cell at (`x`, `y`) and its direct neighbours. Missing
/// neighbours at the grid edge are not wrapped; the box stops at the edge.
pub fn expanded_cell(grid: &Grid, x: usize, y: usize) -> Result<BoundingBox> {
    let out_of_range = || GeoError::CellOutOfRange {
        x,
        y,
        columns: grid.columns(),
        rows: grid.rows(),
    };
    grid.cell(x, y).ok_or_else(out_of_range)?;

    let row1 = y.saturating_sub(1);
    let col1 = x.saturating_sub(1);
    let row2 = (y + 1).min(grid.rows() - 1);
    let col2 = (x + 1).min(grid.columns() - 1);

    let nw = grid.cell(col1, row1).ok_or_else(out_of_range)?.nw;
    let se = grid.cell(col2, row2).ok_or_else(out_of_range)?.se;
    Ok(BoundingBox {
        nw: nw.position(),
        se: se.position(),
    })
}

/// North-west and south-east corners of a set of positions.
pub fn bounding_box_of<I>(points: I) -> Result<BoundingBox>
where
    I: IntoIterator,
    I::Item: Into<Point>,
{
    let mut seen = false;
    let bbox = points.into_iter().map(Into::<Point>::into).fold(
        BoundingBox {
            nw: Point::new(-90.0, 181.0),
            se: Point::new(90.0, -181.0),
        },
        |mut acc, p: Point| {
            seen = true;
            acc.nw.latitude = acc.nw.latitude.max(p.latitude);
            acc.nw.longitude = acc.nw.longitude.min(p.longitude);
            acc.se.latitude = acc.se.latitude.min(p.latitude);
            acc.se.longitude = acc.se.longitude.max(p.longitude);
            acc
        },
    );

    if seen {
        Ok(bbox)
    } else {
        Err(GeoError::EmptyInput {
            operation: "bounding_box_of",
        })
    }
}

/// First cell, scanning row by row, whose box contains the position.
///
/// Linear in the number of cells.
pub fn cell_for(grid: &Grid, latitude: f64, longitude: f64) -> Option<CellIndex> {
    grid.indexed_cells()
        .find(|(_, cell)| cell.contains(latitude, longitude))
        .map(|(index, _)| index)
}

/// Corner coordinates of every cell as `[latitude, longitude]` pairs.
///
/// Each cell contributes its north-west and north-east corners; cells in the
/// last row also contribute their south-west and south-east corners so the
/// outline is closed.
pub fn flatten_corners(grid: &Grid) -> Vec<[f64; 2]> {
    let last_row = grid.rows().saturating_sub(1);
    let mut corners = Vec::new();
    for (y, row) in grid.rows_iter().enumerate() {
        for cell in row {
            corners.push([cell.nw.latitude, cell.nw.longitude]);
            corners.push([cell.nw.latitude, cell.se.longitude]);
            if y == last_row {
                corners.push([cell.se.latitude, cell.nw.longitude]);
                corners.push([cell.se.latitude, cell.se.longitude]);
            }
        }
    }
    corners
}
