//! Core geometry types for timezone polygons
//!
//! A polygon is an implicitly closed ring of (longitude, latitude) pairs in
//! float degrees. Everything the shortcut builder does happens on the
//! fixed-point [`FixedRing`] derived from it.

use super::codec::to_fixed;
use crate::error::{CompileError, Result};
use std::collections::HashSet;

/// A timezone boundary polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Position in input order
    pub id: usize,
    pub zone_id: u16,
    /// (lon, lat) in degrees, first point is not repeated at the end
    pub points: Vec<(f64, f64)>,
}

impl Polygon {
    /// Create a polygon, rejecting rings with fewer than 3 distinct points
    pub fn new(id: usize, zone_id: u16, points: Vec<(f64, f64)>) -> Result<Self> {
        let distinct: HashSet<(i32, i32)> = points
            .iter()
            .map(|&(x, y)| (to_fixed(x), to_fixed(y)))
            .collect();
        if distinct.len() < 3 {
            return Err(CompileError::MalformedInput(format!(
                "polygon {} has {} distinct points, at least 3 are required",
                id,
                distinct.len()
            )));
        }
        Ok(Self { id, zone_id, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// The ring in fixed-point, closed by repeating the first point
    pub fn fixed_ring(&self) -> FixedRing {
        FixedRing::closed_from(&self.points)
    }
}

/// Axis-aligned bounds of a polygon in float degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmax: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub ymin: f64,
}

impl BoundingBox {
    /// Compute bounds from a ring, starting from the inverted world extent
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut xmax = -180.0f64;
        let mut xmin = 180.0f64;
        let mut ymax = -90.0f64;
        let mut ymin = 90.0f64;

        for &(x, y) in points {
            xmax = xmax.max(x);
            xmin = xmin.min(x);
            ymax = ymax.max(y);
            ymin = ymin.min(y);
        }

        Self { xmax, xmin, ymax, ymin }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Bounds in the artifact's field order (xmax, xmin, ymax, ymin)
    pub fn to_fixed(&self) -> [i32; 4] {
        [
            to_fixed(self.xmax),
            to_fixed(self.xmin),
            to_fixed(self.ymax),
            to_fixed(self.ymin),
        ]
    }
}

/// A polygon ring in fixed-point coordinates, stored as parallel x and y
/// arrays. The last point equals the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedRing {
    pub xs: Vec<i32>,
    pub ys: Vec<i32>,
}

impl FixedRing {
    pub fn closed_from(points: &[(f64, f64)]) -> Self {
        let mut xs: Vec<i32> = points.iter().map(|&(x, _)| to_fixed(x)).collect();
        let mut ys: Vec<i32> = points.iter().map(|&(_, y)| to_fixed(y)).collect();
        if let (Some(&x0), Some(&y0)) = (xs.first(), ys.first()) {
            xs.push(x0);
            ys.push(y0);
        }
        Self { xs, ys }
    }

    /// Number of edges (one less than the number of stored points)
    pub fn edge_count(&self) -> usize {
        self.ys.len().saturating_sub(1)
    }

    /// Iterate edges as ((x1, y1), (x2, y2))
    pub fn edges(&self) -> impl Iterator<Item = ((i32, i32), (i32, i32))> + '_ {
        (0..self.edge_count()).map(move |i| {
            (
                (self.xs[i], self.ys[i]),
                (self.xs[i + 1], self.ys[i + 1]),
            )
        })
    }
}
