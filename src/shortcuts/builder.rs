//! Shortcut grid construction
//!
//! Small polygons are registered under every cell of their bounding box.
//! Big polygons get an exact cell set from two scanline sweeps: one along
//! every row boundary (latitude) and one along every column boundary
//! (longitude) crossing the polygon. Each sweep pairs up the sorted ring
//! crossings into (entry, exit) spans and selects the cells on the line's
//! own side, plus the neighbour across the line when the polygon extends
//! into it.

use super::grid::{
    is_big_zone, latitudes_to_check, longitudes_to_check, x_shortcut, y_shortcut, Cell,
    CellRange, COLUMN_WIDTH, ROW_HEIGHT,
};
use super::table::ShortcutTable;
use crate::error::{CompileError, Result};
use crate::geometry::{
    fixed_f64_to_float, inside_polygon, to_fixed, x_intersections, y_intersections, BoundingBox,
    FixedRing, Polygon,
};
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

/// Samples from `from` to `to` spaced `step` apart, always including `to`
fn walk(mut from: f64, to: f64, step: f64) -> Vec<f64> {
    let mut samples = Vec::new();
    while from < to {
        samples.push(from);
        from += step;
    }
    samples.push(to);
    samples
}

fn sorted_degrees(mut fixed: Vec<f64>) -> Vec<f64> {
    for v in fixed.iter_mut() {
        *v = fixed_f64_to_float(*v);
    }
    fixed.sort_by(f64::total_cmp);
    fixed
}

/// Scanline state for one polygon: its closed fixed-point ring and the
/// candidate cells collected so far
pub struct SweepContext<'a> {
    ring: &'a FixedRing,
    cells: BTreeSet<Cell>,
}

impl<'a> SweepContext<'a> {
    pub fn new(ring: &'a FixedRing) -> Self {
        Self {
            ring,
            cells: BTreeSet::new(),
        }
    }

    /// Sweep the row boundary at `lat`. Cells on row `y_shortcut(lat)` (just
    /// south of the line) are always taken; the row above is taken where the
    /// polygon continues north of the line.
    pub fn sweep_latitude(&mut self, lat: f64) -> Result<()> {
        let lat_fixed = to_fixed(lat);
        let intersects = sorted_degrees(x_intersections(lat_fixed, self.ring)?);
        let row = y_shortcut(lat);
        trace!("latitude {}: {} crossings", lat, intersects.len());

        for span in intersects.chunks_exact(2) {
            let (entry, exit) = (span[0], span[1]);
            if entry == exit {
                // the ring touches the line in a single point
                let column = x_shortcut(entry);
                if inside_polygon(to_fixed(entry), lat_fixed + 1, self.ring) {
                    self.cells.insert(Cell::new(column, row - 1));
                }
                self.cells.insert(Cell::new(column, row));
                continue;
            }

            let middle = entry + (exit - entry) / 2.0;
            let straddles = inside_polygon(to_fixed(middle), lat_fixed + 1, self.ring);
            for lng in walk(entry, exit, COLUMN_WIDTH) {
                let column = x_shortcut(lng);
                self.cells.insert(Cell::new(column, row));
                if straddles {
                    self.cells.insert(Cell::new(column, row - 1));
                }
            }
        }
        Ok(())
    }

    /// Sweep the column boundary at `lng`. Mirrors [`Self::sweep_latitude`]:
    /// the column east of the line is always taken, the column west of it
    /// where the polygon continues past the line.
    pub fn sweep_longitude(&mut self, lng: f64) -> Result<()> {
        let lng_fixed = to_fixed(lng);
        let intersects = sorted_degrees(y_intersections(lng_fixed, self.ring)?);
        let column = x_shortcut(lng);
        trace!("longitude {}: {} crossings", lng, intersects.len());

        for span in intersects.chunks_exact(2) {
            let (entry, exit) = (span[0], span[1]);
            if entry == exit {
                let row = y_shortcut(entry);
                if inside_polygon(lng_fixed - 1, to_fixed(entry), self.ring) {
                    self.cells.insert(Cell::new(column - 1, row));
                }
                self.cells.insert(Cell::new(column, row));
                continue;
            }

            let middle = entry + (exit - entry) / 2.0;
            let straddles = inside_polygon(lng_fixed - 1, to_fixed(middle), self.ring);
            for lat in walk(entry, exit, ROW_HEIGHT) {
                let row = y_shortcut(lat);
                self.cells.insert(Cell::new(column, row));
                if straddles {
                    self.cells.insert(Cell::new(column - 1, row));
                }
            }
        }
        Ok(())
    }

    pub fn into_cells(self) -> BTreeSet<Cell> {
        self.cells
    }
}

/// Candidate cells of a big polygon from both sweeps, before clipping
pub fn compute_exact_shortcuts(ring: &FixedRing, bounds: &BoundingBox) -> Result<BTreeSet<Cell>> {
    let mut sweep = SweepContext::new(ring);
    for lat in latitudes_to_check(bounds.ymax, bounds.ymin) {
        sweep.sweep_latitude(lat)?;
    }
    for lng in longitudes_to_check(bounds.xmax, bounds.xmin) {
        sweep.sweep_longitude(lng)?;
    }
    Ok(sweep.into_cells())
}

/// The cells a polygon is registered under, in column-major order
pub fn polygon_shortcuts(polygon: &Polygon, bounds: &BoundingBox) -> Result<Vec<Cell>> {
    let range = CellRange::of_bounds(bounds);
    if !is_big_zone(bounds) {
        return Ok(range.cells().collect());
    }

    let ring = polygon.fixed_ring();
    let mut cells = compute_exact_shortcuts(&ring, bounds)?;

    // sampling at span ends can name a neighbour outside the bounds
    cells.retain(|cell| range.contains(cell));

    if cells.len() > range.len() {
        return Err(CompileError::AlgorithmInvariantViolation {
            polygon: polygon.id,
            reason: format!(
                "{} refined cells exceed the {} cells of the bounding box",
                cells.len(),
                range.len()
            ),
        });
    }
    if cells.len() < 3 {
        return Err(CompileError::AlgorithmInvariantViolation {
            polygon: polygon.id,
            reason: format!("only {} cells detected for a big polygon", cells.len()),
        });
    }

    debug!(
        "polygon {}: {} of {} bounding box cells kept",
        polygon.id,
        cells.len(),
        range.len()
    );
    Ok(cells.into_iter().collect())
}

/// Build the shortcut table for all polygons.
///
/// `bounds[i]` must be the bounding box of `polygons[i]`. With `parallel`
/// the per-polygon cell sets are computed on the rayon pool; registration
/// always happens in polygon order so the table is identical either way.
pub fn build_shortcut_table(
    polygons: &[Polygon],
    bounds: &[BoundingBox],
    parallel: bool,
) -> Result<ShortcutTable> {
    if polygons.len() != bounds.len() {
        return Err(CompileError::FormatConsistency(format!(
            "{} polygons but {} bounding boxes",
            polygons.len(),
            bounds.len()
        )));
    }
    info!("building shortcuts for {} polygons", polygons.len());

    let per_polygon: Vec<Vec<Cell>> = if parallel {
        polygons
            .par_iter()
            .zip(bounds.par_iter())
            .map(|(polygon, bounds)| polygon_shortcuts(polygon, bounds))
            .collect::<Result<Vec<_>>>()?
    } else {
        let mut all = Vec::with_capacity(polygons.len());
        for (i, (polygon, bounds)) in polygons.iter().zip(bounds).enumerate() {
            if i % 1000 == 0 {
                info!("polygon {}", i);
            }
            all.push(polygon_shortcuts(polygon, bounds)?);
        }
        all
    };

    let mut table = ShortcutTable::new();
    for (polygon, cells) in polygons.iter().zip(per_polygon) {
        table.register(polygon.id, cells);
    }
    Ok(table)
}
