//! The fixed global shortcut grid
//!
//! The resolution is part of the file format: the runtime computes a cell's
//! table slot from the query coordinates alone, so these constants must
//! never change independently of the reader.

use crate::geometry::BoundingBox;
use std::ops::RangeInclusive;

/// Grid columns per degree of longitude
pub const NR_SHORTCUTS_PER_LNG: u32 = 1;
/// Grid rows per degree of latitude
pub const NR_SHORTCUTS_PER_LAT: u32 = 2;

pub const GRID_COLUMNS: u32 = 360 * NR_SHORTCUTS_PER_LNG;
pub const GRID_ROWS: u32 = 180 * NR_SHORTCUTS_PER_LAT;
/// 129,600 with the shipped resolution
pub const CELL_COUNT: usize = (GRID_COLUMNS * GRID_ROWS) as usize;

/// Width of one column in degrees
pub const COLUMN_WIDTH: f64 = 1.0 / NR_SHORTCUTS_PER_LNG as f64;
/// Height of one row in degrees
pub const ROW_HEIGHT: f64 = 1.0 / NR_SHORTCUTS_PER_LAT as f64;

/// One shortcut cell. Ordering is column-major, which is also the order in
/// which the artifact stores its tables.
///
/// Coordinates are signed because the sweeps may name a neighbour just
/// outside the grid before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub column: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Cell containing the point (lng, lat)
    pub fn of(lng: f64, lat: f64) -> Self {
        Self::new(x_shortcut(lng), y_shortcut(lat))
    }

    pub fn in_grid(&self) -> bool {
        self.column >= 0
            && self.row >= 0
            && (self.column as u32) < GRID_COLUMNS
            && (self.row as u32) < GRID_ROWS
    }

    /// Slot of this cell in the artifact's per-cell tables
    pub fn grid_index(&self) -> Option<usize> {
        if !self.in_grid() {
            return None;
        }
        Some(self.column as usize * GRID_ROWS as usize + self.row as usize)
    }

    /// Centre of the cell in degrees
    pub fn center(&self) -> (f64, f64) {
        let lng = (self.column as f64 + 0.5) * COLUMN_WIDTH - 180.0;
        let lat = 90.0 - (self.row as f64 + 0.5) * ROW_HEIGHT;
        (lng, lat)
    }
}

/// Grid column of a longitude
#[inline]
pub fn x_shortcut(lng: f64) -> i32 {
    ((lng + 180.0) * NR_SHORTCUTS_PER_LNG as f64).floor() as i32
}

/// Grid row of a latitude (row 0 is the northernmost)
#[inline]
pub fn y_shortcut(lat: f64) -> i32 {
    ((90.0 - lat) * NR_SHORTCUTS_PER_LAT as f64).floor() as i32
}

/// A polygon is big when it could touch more than 4 cells: its bounds span
/// more than 2 cells along both axes
pub fn is_big_zone(bounds: &BoundingBox) -> bool {
    bounds.width() > 2.0 * COLUMN_WIDTH && bounds.height() > 2.0 * ROW_HEIGHT
}

/// The inclusive block of cells covered by a bounding box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub columns: RangeInclusive<i32>,
    pub rows: RangeInclusive<i32>,
}

impl CellRange {
    pub fn of_bounds(bounds: &BoundingBox) -> Self {
        Self {
            columns: x_shortcut(bounds.xmin)..=x_shortcut(bounds.xmax),
            rows: y_shortcut(bounds.ymax)..=y_shortcut(bounds.ymin),
        }
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.columns.contains(&cell.column) && self.rows.contains(&cell.row)
    }

    pub fn len(&self) -> usize {
        let columns = (self.columns.end() - self.columns.start() + 1).max(0) as usize;
        let rows = (self.rows.end() - self.rows.start() + 1).max(0) as usize;
        columns * rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cells of the block in column-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.columns
            .clone()
            .flat_map(move |column| self.rows.clone().map(move |row| Cell::new(column, row)))
    }
}

/// Grid-aligned lines between `min` and `max` spaced `step` apart,
/// always ending with the last grid line at or below `max`
fn grid_lines(max: f64, min: f64, per_degree: u32) -> Vec<f64> {
    let per_degree = per_degree as f64;
    let step = 1.0 / per_degree;
    let mut current = (min * per_degree).ceil() / per_degree;
    let end = (max * per_degree).floor() / per_degree;

    let mut lines = Vec::new();
    while current < end {
        lines.push(current);
        current += step;
    }
    lines.push(end);
    lines
}

/// Row boundaries (latitudes) crossing the vertical extent [min_lat, max_lat]
pub fn latitudes_to_check(max_lat: f64, min_lat: f64) -> Vec<f64> {
    grid_lines(max_lat, min_lat, NR_SHORTCUTS_PER_LAT)
}

/// Column boundaries (longitudes) crossing the horizontal extent [min_lng, max_lng]
pub fn longitudes_to_check(max_lng: f64, min_lng: f64) -> Vec<f64> {
    grid_lines(max_lng, min_lng, NR_SHORTCUTS_PER_LNG)
}
