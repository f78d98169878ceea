//! Polygon source reader
//!
//! The source is a feature collection written one feature per line, e.g.
//!
//! ```text
//! { "type": "Feature", "properties": { "TZID": "Europe/Berlin" }, "geometry": { "type": "Polygon", "coordinates": [ [ [ 13.0, 52.0 ], ... ] ] } },
//! ```
//!
//! Lines without a `TZID` (the collection's opening and closing lines) are
//! skipped. Every number inside `coordinates` is taken in document order and
//! paired up as (longitude, latitude).

use crate::error::{CompileError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// A polygon as read from the source, before zone ids are assigned
#[derive(Debug, Clone, PartialEq)]
pub struct RawPolygon {
    pub zone_name: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Deserialize)]
struct FeatureLine {
    properties: FeatureProperties,
    geometry: FeatureGeometry,
}

#[derive(Deserialize)]
struct FeatureProperties {
    #[serde(rename = "TZID")]
    tzid: String,
}

#[derive(Deserialize)]
struct FeatureGeometry {
    coordinates: Value,
}

fn collect_numbers(value: &Value, out: &mut Vec<f64>, line_nr: usize) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_numbers(item, out, line_nr)?;
            }
            Ok(())
        }
        Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| {
                CompileError::MalformedInput(format!("line {}: coordinate {} is not a float", line_nr, n))
            })?;
            out.push(v);
            Ok(())
        }
        other => Err(CompileError::MalformedInput(format!(
            "line {}: unexpected {} inside coordinates",
            line_nr, other
        ))),
    }
}

/// Parse a single source line. `Ok(None)` for lines that carry no feature.
pub fn parse_line(line: &str, line_nr: usize) -> Result<Option<RawPolygon>> {
    if !line.contains("\"TZID\"") {
        return Ok(None);
    }
    let trimmed = line.trim().trim_end_matches(',');
    let feature: FeatureLine = serde_json::from_str(trimmed).map_err(|e| {
        CompileError::MalformedInput(format!("line {}: invalid feature: {}", line_nr, e))
    })?;

    let mut floats = Vec::new();
    collect_numbers(&feature.geometry.coordinates, &mut floats, line_nr)?;
    if floats.len() % 2 != 0 {
        return Err(CompileError::MalformedInput(format!(
            "{} floats in line {}, should be even (pairs of x,y)",
            floats.len(),
            line_nr
        )));
    }
    let points: Vec<(f64, f64)> = floats.chunks_exact(2).map(|p| (p[0], p[1])).collect();
    if points.len() < 3 {
        return Err(CompileError::MalformedInput(format!(
            "line {}: zone {} has only {} points",
            line_nr,
            feature.properties.tzid,
            points.len()
        )));
    }

    Ok(Some(RawPolygon {
        zone_name: feature.properties.tzid,
        points,
    }))
}

/// Parse every feature line of `reader`
pub fn parse_polygons<R: BufRead>(reader: R) -> Result<Vec<RawPolygon>> {
    let mut polygons = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if i % 1000 == 0 {
            debug!("line {}", i);
        }
        if let Some(polygon) = parse_line(&line, i + 1)? {
            polygons.push(polygon);
        }
    }
    Ok(polygons)
}

pub fn parse_polygon_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawPolygon>> {
    info!("parsing polygons from {}", path.as_ref().display());
    let file = File::open(&path)?;
    let polygons = parse_polygons(BufReader::new(file))?;
    info!("parsed {} polygons", polygons.len());
    Ok(polygons)
}
