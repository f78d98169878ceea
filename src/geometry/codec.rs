//! Fixed-point coordinate codec
//!
//! Coordinates are stored as degrees × 10^7 in an `i32`, which keeps about
//! 1 cm of precision at the equator and makes every geometric test exact
//! integer arithmetic.

/// Scale between degrees and fixed-point units
pub const FIXED_SCALE: f64 = 10_000_000.0;

/// Convert an angle in degrees to fixed-point, rounding to the nearest unit
#[inline]
pub fn to_fixed(angle: f64) -> i32 {
    (angle * FIXED_SCALE).round() as i32
}

/// Convert a fixed-point value back to degrees
#[inline]
pub fn to_float(fixed: i32) -> f64 {
    fixed as f64 / FIXED_SCALE
}

/// Same as [`to_float`] for an intersection that was interpolated in
/// fixed-point space and therefore is not integral
#[inline]
pub fn fixed_f64_to_float(fixed: f64) -> f64 {
    fixed / FIXED_SCALE
}
