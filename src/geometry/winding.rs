//! Winding-number point-in-polygon test
//!
//! Only used by the shortcut builder to resolve which side of a grid line a
//! polygon extends to. Works entirely in fixed-point.

use super::types::FixedRing;

/// Sign of the cross product of (p2 - p1) and (p - p1).
/// Positive when p lies left of the directed edge p1 -> p2.
#[inline]
fn is_left_of(x: i32, y: i32, x1: i32, x2: i32, y1: i32, y2: i32) -> i128 {
    (x2 as i128 - x1 as i128) * (y as i128 - y1 as i128)
        - (x as i128 - x1 as i128) * (y2 as i128 - y1 as i128)
}

/// Compute the winding number of `ring` around (x, y)
pub fn winding_number(x: i32, y: i32, ring: &FixedRing) -> i32 {
    let mut wn = 0;
    for ((x1, y1), (x2, y2)) in ring.edges() {
        if y1 <= y {
            // upward crossing
            if y2 > y && is_left_of(x, y, x1, x2, y1, y2) > 0 {
                wn += 1;
            }
        } else if y2 <= y && is_left_of(x, y, x1, x2, y1, y2) < 0 {
            // downward crossing
            wn -= 1;
        }
    }
    wn
}

/// True if (x, y) is enclosed by `ring` (non-zero winding number)
pub fn inside_polygon(x: i32, y: i32, ring: &FixedRing) -> bool {
    winding_number(x, y, ring) != 0
}
