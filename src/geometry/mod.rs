//! Geometry module for timezone polygons
//!
//! # Submodules
//! - `codec` - Float degrees <-> fixed-point conversion
//! - `types` - Polygon, bounding box and fixed-point ring
//! - `winding` - Winding-number point-in-polygon test
//! - `intersect` - Scanline intersections with grid lines

mod codec;
mod types;
mod winding;
mod intersect;

pub use codec::{
    FIXED_SCALE,
    to_fixed,
    to_float,
    fixed_f64_to_float,
};

pub use types::{
    Polygon,
    BoundingBox,
    FixedRing,
};

pub use winding::{
    inside_polygon,
    winding_number,
};

pub use intersect::{
    x_intersections,
    y_intersections,
};
