//! Scanline intersections of a polygon ring with grid lines
//!
//! Both sweeps use the half-open crossing rule of the winding test: an edge
//! crosses the line at `v` when one endpoint is <= v and the other is > v.
//! Intersections are returned in fixed-point units as `f64`, unsorted.

use super::types::FixedRing;
use crate::error::{CompileError, Result};

/// x where the segment (x1,y1)-(x2,y2) meets the horizontal line at y
fn compute_x_intersection(y: i32, x1: i32, x2: i32, y1: i32, y2: i32) -> f64 {
    let delta_y = y2 as i64 - y1 as i64;
    if delta_y == 0 {
        return x1 as f64;
    }
    ((y as i64 - y1 as i64) * (x2 as i64 - x1 as i64)) as f64 / delta_y as f64 + x1 as f64
}

/// y where the segment (x1,y1)-(x2,y2) meets the vertical line at x
fn compute_y_intersection(x: i32, x1: i32, x2: i32, y1: i32, y2: i32) -> f64 {
    let delta_x = x2 as i64 - x1 as i64;
    if delta_x == 0 {
        return y1 as f64;
    }
    ((x as i64 - x1 as i64) * (y2 as i64 - y1 as i64)) as f64 / delta_x as f64 + y1 as f64
}

#[inline]
fn crosses(a: i32, b: i32, v: i32) -> bool {
    if a <= v {
        b > v
    } else {
        b <= v
    }
}

fn ensure_even(count: usize, axis: &str, line: i32) -> Result<()> {
    if count % 2 != 0 {
        return Err(CompileError::MalformedInput(format!(
            "ring crosses the {} line at {} an odd number of times ({})",
            axis, line, count
        )));
    }
    Ok(())
}

/// Crossings of the ring with the horizontal line at latitude `y`
pub fn x_intersections(y: i32, ring: &FixedRing) -> Result<Vec<f64>> {
    let intersects: Vec<f64> = ring
        .edges()
        .filter(|&((_, y1), (_, y2))| crosses(y1, y2, y))
        .map(|((x1, y1), (x2, y2))| compute_x_intersection(y, x1, x2, y1, y2))
        .collect();
    ensure_even(intersects.len(), "latitude", y)?;
    Ok(intersects)
}

/// Crossings of the ring with the vertical line at longitude `x`
pub fn y_intersections(x: i32, ring: &FixedRing) -> Result<Vec<f64>> {
    let intersects: Vec<f64> = ring
        .edges()
        .filter(|&((x1, _), (x2, _))| crosses(x1, x2, x))
        .map(|((x1, y1), (x2, y2))| compute_y_intersection(x, x1, x2, y1, y2))
        .collect();
    ensure_even(intersects.len(), "longitude", x)?;
    Ok(intersects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(i32, i32)]) -> FixedRing {
        let mut xs: Vec<i32> = points.iter().map(|p| p.0).collect();
        let mut ys: Vec<i32> = points.iter().map(|p| p.1).collect();
        xs.push(points[0].0);
        ys.push(points[0].1);
        FixedRing { xs, ys }
    }

    #[test]
    fn test_square_crossings() {
        let square = ring(&[(0, 0), (100, 0), (100, 100), (0, 100)]);

        let mut xs = x_intersections(50, &square).unwrap();
        xs.sort_by(f64::total_cmp);
        assert_eq!(xs, vec![0.0, 100.0]);

        let mut ys = y_intersections(25, &square).unwrap();
        ys.sort_by(f64::total_cmp);
        assert_eq!(ys, vec![0.0, 100.0]);
    }

    #[test]
    fn test_interpolates_slanted_edges() {
        let triangle = ring(&[(0, 0), (100, 0), (0, 100)]);
        let mut xs = x_intersections(50, &triangle).unwrap();
        xs.sort_by(f64::total_cmp);
        assert_eq!(xs, vec![0.0, 50.0]);
    }

    #[test]
    fn test_line_through_bottom_edge_uses_half_open_rule() {
        // The bottom edge lies on y = 0; only the two vertical edges count
        let square = ring(&[(0, 0), (100, 0), (100, 100), (0, 100)]);
        assert_eq!(x_intersections(0, &square).unwrap().len(), 2);
        // Above the top edge nothing crosses
        assert!(x_intersections(100, &square).unwrap().is_empty());
    }

    #[test]
    fn test_odd_crossings_are_malformed() {
        // An unclosed ring: the dangling edge leaves one crossing unmatched
        let open = FixedRing {
            xs: vec![0, 100, 100],
            ys: vec![0, 0, 100],
        };
        let err = x_intersections(50, &open).unwrap_err();
        assert!(matches!(err, CompileError::MalformedInput(_)));
        assert!(y_intersections(100, &open).is_ok());
    }
}
