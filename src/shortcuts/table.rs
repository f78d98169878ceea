//! Mapping from shortcut cell to the polygons registered under it

use super::grid::{Cell, GRID_COLUMNS, GRID_ROWS};
use std::collections::HashMap;
use tracing::warn;

/// Append-only table of polygon ids per cell.
///
/// Ids within a cell keep their registration order. Registering the same
/// polygon twice for one cell is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ShortcutTable {
    cells: HashMap<Cell, Vec<usize>>,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `polygon_id` under every cell in `cells`
    pub fn register<I>(&mut self, polygon_id: usize, cells: I)
    where
        I: IntoIterator<Item = Cell>,
    {
        for cell in cells {
            if !cell.in_grid() {
                // bounds touching +180° or -90° name a column/row past the edge
                warn!("polygon {} names off-grid cell {:?}, skipped", polygon_id, cell);
                continue;
            }
            let ids = self.cells.entry(cell).or_default();
            if !ids.contains(&polygon_id) {
                ids.push(polygon_id);
            }
        }
    }

    /// Polygons registered under `cell`, empty if none
    pub fn polygons_in(&self, cell: Cell) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of cells holding at least one polygon
    pub fn filled_cells(&self) -> usize {
        self.cells.values().filter(|ids| !ids.is_empty()).count()
    }

    /// Sum of all per-cell list lengths
    pub fn total_entries(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Every grid cell in artifact order (column-major), with its polygons
    pub fn iter_grid(&self) -> impl Iterator<Item = (Cell, &[usize])> + '_ {
        (0..GRID_COLUMNS as i32).flat_map(move |column| {
            (0..GRID_ROWS as i32).map(move |row| {
                let cell = Cell::new(column, row);
                (cell, self.polygons_in(cell))
            })
        })
    }

    /// Cells registered for a given polygon, sorted
    pub fn cells_of(&self, polygon_id: usize) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self
            .cells
            .iter()
            .filter(|(_, ids)| ids.contains(&polygon_id))
            .map(|(cell, _)| *cell)
            .collect();
        cells.sort();
        cells
    }
}
