//! Compilation pipeline
//!
//! `Compiler` owns the polygons and their bounding boxes and runs the
//! stages in order: shortcut table, layout, write. Any stage failing aborts
//! the run before the artifact reaches its final path.

use crate::binary::{artifact_bytes, write_artifact_file, Layout};
use crate::error::{CompileError, Result};
use crate::geometry::{BoundingBox, Polygon};
use crate::parsing::RawPolygon;
use crate::shortcuts::{build_shortcut_table, ShortcutTable};
use crate::zones::ZoneNames;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Summary of a written artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactStats {
    pub polygon_count: usize,
    pub point_count: usize,
    pub filled_cells: usize,
    pub total_entries: usize,
    pub file_len: u64,
    /// Percentage of the file taken by the shortcut section
    pub shortcut_share: f64,
    /// Percentage of the file taken by polygon coordinates
    pub polygon_share: f64,
}

impl ArtifactStats {
    fn new(polygons: &[Polygon], layout: &Layout, table: &ShortcutTable) -> Self {
        let point_count: usize = polygons.iter().map(Polygon::len).sum();
        let file_len = layout.file_len;
        let shortcut_space = file_len - layout.shortcut_start as u64;
        let polygon_space = 8 * point_count as u64;
        let percent = |part: u64| (part as f64 / file_len as f64 * 10_000.0).round() / 100.0;

        Self {
            polygon_count: polygons.len(),
            point_count,
            filled_cells: layout.filled_cells(),
            total_entries: table.total_entries(),
            file_len,
            shortcut_share: percent(shortcut_space),
            polygon_share: percent(polygon_space),
        }
    }
}

pub struct Compiler {
    polygons: Vec<Polygon>,
    bounds: Vec<BoundingBox>,
}

impl Compiler {
    /// Take ownership of `polygons`; their ids must equal their positions
    pub fn new(polygons: Vec<Polygon>) -> Result<Self> {
        if let Some((i, p)) = polygons.iter().enumerate().find(|(i, p)| p.id != *i) {
            return Err(CompileError::MalformedInput(format!(
                "polygon at position {} carries id {}",
                i, p.id
            )));
        }
        let bounds = polygons.iter().map(Polygon::bounds).collect();
        Ok(Self { polygons, bounds })
    }

    /// Assign zone ids to parsed polygons and build a compiler from them
    pub fn from_raw(raw: Vec<RawPolygon>) -> Result<(Self, ZoneNames)> {
        let names: Vec<&str> = raw.iter().map(|p| p.zone_name.as_str()).collect();
        let zones = ZoneNames::assign(&names)?;
        let polygons = raw
            .into_iter()
            .zip(&zones.ids)
            .enumerate()
            .map(|(id, (polygon, &zone_id))| Polygon::new(id, zone_id, polygon.points))
            .collect::<Result<Vec<_>>>()?;
        Ok((Self::new(polygons)?, zones))
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn bounds(&self) -> &[BoundingBox] {
        &self.bounds
    }

    pub fn build_shortcuts(&self, parallel: bool) -> Result<ShortcutTable> {
        let start = Instant::now();
        let table = build_shortcut_table(&self.polygons, &self.bounds, parallel)?;
        info!(
            "computing the shortcuts took {:.3}s ({} filled cells, {} entries)",
            start.elapsed().as_secs_f64(),
            table.filled_cells(),
            table.total_entries()
        );
        Ok(table)
    }

    pub fn layout(&self, table: &ShortcutTable) -> Result<Layout> {
        Layout::compute(&self.polygons, &self.bounds, table)
    }

    /// The complete artifact in memory
    pub fn to_bytes(&self, parallel: bool) -> Result<Vec<u8>> {
        let table = self.build_shortcuts(parallel)?;
        let layout = self.layout(&table)?;
        artifact_bytes(&layout, &self.polygons)
    }

    /// Build the artifact and write it to `path`
    pub fn compile<P: AsRef<Path>>(&self, path: P, parallel: bool) -> Result<ArtifactStats> {
        let table = self.build_shortcuts(parallel)?;
        let layout = self.layout(&table)?;
        info!(
            "{} polygons, {} coordinate values, shortcut section at byte {}",
            layout.polygon_count,
            self.polygons.iter().map(|p| 2 * p.len()).sum::<usize>(),
            layout.shortcut_start
        );

        write_artifact_file(path.as_ref(), &layout, &self.polygons)?;

        let stats = ArtifactStats::new(&self.polygons, &layout, &table);
        info!("the shortcuts make up {}% of the file", stats.shortcut_share);
        info!("the polygon data makes up {}% of the file", stats.polygon_share);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_must_match_positions() {
        let p = Polygon::new(1, 0, vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
        assert!(matches!(Compiler::new(vec![p]), Err(CompileError::MalformedInput(_))));
    }

    #[test]
    fn test_from_raw_assigns_zone_ids() {
        let raw = vec![
            RawPolygon { zone_name: "B/Zone".to_string(), points: vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] },
            RawPolygon { zone_name: "A/Zone".to_string(), points: vec![(2.0, 0.0), (3.0, 0.0), (3.0, 1.0)] },
        ];
        let (compiler, zones) = Compiler::from_raw(raw).unwrap();
        assert_eq!(zones.names, vec!["A/Zone", "B/Zone"]);
        assert_eq!(compiler.polygons()[0].zone_id, 1);
        assert_eq!(compiler.polygons()[1].zone_id, 0);
        assert_eq!(compiler.bounds()[1].xmin, 2.0);
    }
}
