//! Address computation for the timezone artifact
//!
//! Everything that ends up in the file is computed and checked here before
//! a single byte is written, so a failed check never leaves a partial file.
//!
//! File layout (all integers big-endian, N = polygon count):
//!
//! | offset            | content                                        |
//! |-------------------|------------------------------------------------|
//! | 0                 | N: u16                                         |
//! | 2                 | shortcut section start: u32                    |
//! | 6                 | N × zone id: u16                               |
//! | 6 + 2N            | N × point count: u16                           |
//! | 6 + 4N            | N × polygon data address: u32                  |
//! | 6 + 8N            | N × (xmax, xmin, ymax, ymin): i32 × 4          |
//! | 6 + 24N           | per polygon: all x then all y, i32 each        |
//! | shortcut start    | 129,600 × entry count per cell: u16            |
//! | + 259,200         | 129,600 × address of the cell's id list: u32   |
//! | + 518,400         | id lists of the non-empty cells: u16 each      |
//!
//! Cells are stored column-major: column 0..360 outer, row 0..360 inner.

use crate::error::{CompileError, Result};
use crate::geometry::{BoundingBox, Polygon};
use crate::shortcuts::{ShortcutTable, CELL_COUNT};

/// Highest number of polygons a single cell may list
pub const MAX_ENTRIES_PER_CELL: usize = 300;

/// Polygon count (u16) + shortcut section address (u32)
pub const HEADER_LEN: u64 = 6;
/// Bytes of per-polygon metadata: zone id, point count, address, bounds
pub const POLYGON_META_LEN: u64 = 2 + 2 + 4 + 16;
/// Size of the per-cell entry count table
pub const CELL_COUNT_TABLE_LEN: u64 = 2 * CELL_COUNT as u64;
/// Size of the per-cell address table
pub const CELL_ADDRESS_TABLE_LEN: u64 = 4 * CELL_COUNT as u64;

/// Every value the writer emits, apart from the raw coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub polygon_count: u16,
    pub shortcut_start: u32,
    pub zone_ids: Vec<u16>,
    pub point_counts: Vec<u16>,
    pub polygon_addresses: Vec<u32>,
    pub bounds: Vec<[i32; 4]>,
    /// One per grid cell, in artifact order
    pub cell_counts: Vec<u16>,
    /// One per grid cell, 0 for empty cells
    pub cell_addresses: Vec<u32>,
    /// All id lists concatenated in artifact order
    pub cell_entries: Vec<u16>,
    pub file_len: u64,
}

fn to_u32(value: u64, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        CompileError::FormatConsistency(format!("{} {} does not fit into 32 bits", what, value))
    })
}

impl Layout {
    /// Lay out `polygons` (with their `bounds`) and the shortcut `table`
    pub fn compute(
        polygons: &[Polygon],
        bounds: &[BoundingBox],
        table: &ShortcutTable,
    ) -> Result<Self> {
        let polygon_count = u16::try_from(polygons.len()).map_err(|_| {
            CompileError::FormatConsistency(format!(
                "{} polygons exceed the 16 bit polygon count",
                polygons.len()
            ))
        })?;
        if bounds.len() != polygons.len() {
            return Err(CompileError::FormatConsistency(format!(
                "{} polygons but {} bounding boxes",
                polygons.len(),
                bounds.len()
            )));
        }

        let n = polygons.len() as u64;
        let nr_of_floats: u64 = polygons.iter().map(|p| 2 * p.len() as u64).sum();

        // where the first polygon's coordinates start
        let mut polygon_address = HEADER_LEN + POLYGON_META_LEN * n;
        // 4 bytes per coordinate value
        let shortcut_start = polygon_address + 4 * nr_of_floats;

        let mut zone_ids = Vec::with_capacity(polygons.len());
        let mut point_counts = Vec::with_capacity(polygons.len());
        let mut polygon_addresses = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            zone_ids.push(polygon.zone_id);
            point_counts.push(u16::try_from(polygon.len()).map_err(|_| {
                CompileError::FormatConsistency(format!(
                    "polygon {} has {} points, more than a 16 bit count holds",
                    polygon.id,
                    polygon.len()
                ))
            })?);
            polygon_addresses.push(to_u32(polygon_address, "polygon address")?);
            // 2 values per point, 4 bytes per value
            polygon_address += 8 * polygon.len() as u64;
        }

        if polygon_address != shortcut_start {
            return Err(CompileError::FormatConsistency(format!(
                "polygon data ends at {} but the shortcut section starts at {}",
                polygon_address, shortcut_start
            )));
        }

        let bounds: Vec<[i32; 4]> = bounds.iter().map(BoundingBox::to_fixed).collect();

        let mut cell_counts = Vec::with_capacity(CELL_COUNT);
        let mut cell_lists: Vec<&[usize]> = Vec::new();
        for (cell, ids) in table.iter_grid() {
            if ids.len() > MAX_ENTRIES_PER_CELL {
                return Err(CompileError::FormatConsistency(format!(
                    "{} polygons in cell {:?}, at most {} are allowed",
                    ids.len(),
                    cell,
                    MAX_ENTRIES_PER_CELL
                )));
            }
            if let Some(&bad) = ids.iter().find(|&&id| id >= polygons.len()) {
                return Err(CompileError::FormatConsistency(format!(
                    "cell {:?} references polygon {} but there are only {}",
                    cell,
                    bad,
                    polygons.len()
                )));
            }
            cell_counts.push(ids.len() as u16);
            if !ids.is_empty() {
                cell_lists.push(ids);
            }
        }
        if cell_counts.len() != CELL_COUNT {
            return Err(CompileError::FormatConsistency(format!(
                "{} shortcut cells instead of {}",
                cell_counts.len(),
                CELL_COUNT
            )));
        }

        let mut cell_address = shortcut_start + CELL_COUNT_TABLE_LEN + CELL_ADDRESS_TABLE_LEN;
        let mut cell_addresses = Vec::with_capacity(CELL_COUNT);
        for &count in &cell_counts {
            if count == 0 {
                cell_addresses.push(0);
            } else {
                cell_addresses.push(to_u32(cell_address, "shortcut address")?);
                // 2 bytes per polygon id
                cell_address += 2 * count as u64;
            }
        }

        // ids were range-checked against a u16 polygon count above
        let cell_entries: Vec<u16> = cell_lists
            .iter()
            .flat_map(|ids| ids.iter().map(|&id| id as u16))
            .collect();

        Ok(Self {
            polygon_count,
            shortcut_start: to_u32(shortcut_start, "shortcut section start")?,
            zone_ids,
            point_counts,
            polygon_addresses,
            bounds,
            cell_counts,
            cell_addresses,
            cell_entries,
            file_len: cell_address,
        })
    }

    /// Start of the id list section
    pub fn entries_start(&self) -> u64 {
        self.shortcut_start as u64 + CELL_COUNT_TABLE_LEN + CELL_ADDRESS_TABLE_LEN
    }

    /// Number of non-empty cells
    pub fn filled_cells(&self) -> usize {
        self.cell_counts.iter().filter(|&&c| c > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::Cell;

    fn square(id: usize, x: f64, y: f64) -> Polygon {
        Polygon::new(id, id as u16, vec![(x, y), (x + 0.2, y), (x + 0.2, y + 0.2), (x, y + 0.2)]).unwrap()
    }

    #[test]
    fn test_addresses() {
        let polygons = vec![square(0, 1.1, 1.1), square(1, 3.1, 1.1)];
        let bounds: Vec<BoundingBox> = polygons.iter().map(Polygon::bounds).collect();
        let mut table = ShortcutTable::new();
        table.register(0, [Cell::of(1.2, 1.2)]);
        table.register(1, [Cell::of(3.2, 1.2), Cell::of(1.2, 1.2)]);

        let layout = Layout::compute(&polygons, &bounds, &table).unwrap();
        assert_eq!(layout.polygon_count, 2);
        // 6 + 24 * 2 header bytes, then 2 × 4 points × 8 bytes
        assert_eq!(layout.polygon_addresses, vec![54, 86]);
        assert_eq!(layout.shortcut_start, 118);
        assert_eq!(layout.filled_cells(), 2);
        assert_eq!(layout.cell_entries.len(), 3);
        assert_eq!(layout.file_len, 118 + 259_200 + 518_400 + 6);

        let shared = Cell::of(1.2, 1.2).grid_index().unwrap();
        assert_eq!(layout.cell_counts[shared], 2);
        assert_eq!(layout.cell_addresses[shared] as u64, layout.entries_start());
    }

    #[test]
    fn test_too_many_entries_in_one_cell() {
        let polygons: Vec<Polygon> = (0..301).map(|i| square(i, 1.1, 1.1)).collect();
        let bounds: Vec<BoundingBox> = polygons.iter().map(Polygon::bounds).collect();
        let mut table = ShortcutTable::new();
        for i in 0..301 {
            table.register(i, [Cell::of(1.2, 1.2)]);
        }
        let err = Layout::compute(&polygons, &bounds, &table).unwrap_err();
        assert!(matches!(err, CompileError::FormatConsistency(_)));
    }

    #[test]
    fn test_unknown_polygon_id() {
        let polygons = vec![square(0, 1.1, 1.1)];
        let bounds: Vec<BoundingBox> = polygons.iter().map(Polygon::bounds).collect();
        let mut table = ShortcutTable::new();
        table.register(1, [Cell::of(1.2, 1.2)]);
        let err = Layout::compute(&polygons, &bounds, &table).unwrap_err();
        assert!(matches!(err, CompileError::FormatConsistency(_)));
    }
}
