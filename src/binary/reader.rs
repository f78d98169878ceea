//! Read-back of a compiled artifact
//!
//! Used to verify a freshly written file and by the tests. It resolves the
//! same fixed offsets the runtime uses, but does no point location.

use super::layout::{CELL_COUNT_TABLE_LEN, HEADER_LEN};
use crate::error::{CompileError, Result};
use crate::shortcuts::Cell;
use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;

/// The two header fields of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtifactHeader {
    pub polygon_count: u16,
    pub shortcut_start: u32,
}

/// Bounds-checked view over artifact bytes
#[derive(Debug, Clone, Copy)]
pub struct ArtifactReader<'a> {
    bytes: &'a [u8],
    header: ArtifactHeader,
}

fn truncated(offset: u64, len: usize) -> CompileError {
    CompileError::FormatConsistency(format!(
        "read at byte {} runs past the end of a {} byte artifact",
        offset, len
    ))
}

impl<'a> ArtifactReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let mut head = bytes.get(..HEADER_LEN as usize).ok_or_else(|| truncated(0, bytes.len()))?;
        let polygon_count = head.read_u16::<BigEndian>()?;
        let shortcut_start = head.read_u32::<BigEndian>()?;
        Ok(Self {
            bytes,
            header: ArtifactHeader {
                polygon_count,
                shortcut_start,
            },
        })
    }

    pub fn header(&self) -> ArtifactHeader {
        self.header
    }

    fn at(&self, offset: u64, len: usize) -> Result<&'a [u8]> {
        let start = usize::try_from(offset).map_err(|_| truncated(offset, self.bytes.len()))?;
        start
            .checked_add(len)
            .and_then(|end| self.bytes.get(start..end))
            .ok_or_else(|| truncated(offset, self.bytes.len()))
    }

    fn u16_at(&self, offset: u64) -> Result<u16> {
        Ok(self.at(offset, 2)?.read_u16::<BigEndian>()?)
    }

    fn u32_at(&self, offset: u64) -> Result<u32> {
        Ok(self.at(offset, 4)?.read_u32::<BigEndian>()?)
    }

    fn i32_at(&self, offset: u64) -> Result<i32> {
        Ok(self.at(offset, 4)?.read_i32::<BigEndian>()?)
    }

    fn check_polygon(&self, index: usize) -> Result<u64> {
        if index >= self.header.polygon_count as usize {
            return Err(CompileError::FormatConsistency(format!(
                "polygon {} requested from an artifact with {} polygons",
                index, self.header.polygon_count
            )));
        }
        Ok(index as u64)
    }

    fn n(&self) -> u64 {
        self.header.polygon_count as u64
    }

    pub fn zone_id(&self, index: usize) -> Result<u16> {
        let i = self.check_polygon(index)?;
        self.u16_at(HEADER_LEN + 2 * i)
    }

    pub fn point_count(&self, index: usize) -> Result<u16> {
        let i = self.check_polygon(index)?;
        self.u16_at(HEADER_LEN + 2 * self.n() + 2 * i)
    }

    pub fn polygon_address(&self, index: usize) -> Result<u32> {
        let i = self.check_polygon(index)?;
        self.u32_at(HEADER_LEN + 4 * self.n() + 4 * i)
    }

    /// (xmax, xmin, ymax, ymin) in fixed-point
    pub fn bounds(&self, index: usize) -> Result<[i32; 4]> {
        let i = self.check_polygon(index)?;
        let base = HEADER_LEN + 8 * self.n() + 16 * i;
        Ok([
            self.i32_at(base)?,
            self.i32_at(base + 4)?,
            self.i32_at(base + 8)?,
            self.i32_at(base + 12)?,
        ])
    }

    /// Fixed-point (x, y) points of a polygon
    pub fn polygon_points(&self, index: usize) -> Result<Vec<(i32, i32)>> {
        let count = self.point_count(index)? as u64;
        let address = self.polygon_address(index)? as u64;
        (0..count)
            .map(|k| Ok((self.i32_at(address + 4 * k)?, self.i32_at(address + 4 * (count + k))?)))
            .collect()
    }

    /// Polygon ids listed for a cell
    pub fn cell_polygons(&self, cell: Cell) -> Result<Vec<u16>> {
        let index = cell.grid_index().ok_or_else(|| {
            CompileError::FormatConsistency(format!("cell {:?} is outside the grid", cell))
        })? as u64;
        let start = self.header.shortcut_start as u64;
        let count = self.u16_at(start + 2 * index)? as u64;
        if count == 0 {
            return Ok(Vec::new());
        }
        let address = self.u32_at(start + CELL_COUNT_TABLE_LEN + 4 * index)? as u64;
        (0..count).map(|k| self.u16_at(address + 2 * k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_from_bytes() {
        let bytes = [0x00, 0x03, 0x00, 0x01, 0x00, 0x02];
        let reader = ArtifactReader::new(&bytes).unwrap();
        assert_eq!(
            reader.header(),
            ArtifactHeader {
                polygon_count: 3,
                shortcut_start: 0x0001_0002
            }
        );
        // the metadata section is missing entirely
        assert!(reader.zone_id(0).is_err());
        assert!(reader.zone_id(3).is_err());
    }

    #[test]
    fn test_short_input() {
        assert!(ArtifactReader::new(&[0, 1, 0]).is_err());
    }
}
