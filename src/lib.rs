//! # tz_compiler
//!
//! Compiles timezone boundary polygons into a single seekable binary file
//! that a runtime can use to answer "which timezone contains (lon, lat)?"
//! without scanning every polygon.
//!
//! The file carries, next to the polygons and their bounding boxes, a
//! uniform grid index ("shortcuts"): for every cell of a fixed 1° × 0.5°
//! global grid, the list of polygons that may contain points in that cell.
//! Because the grid resolution is fixed, the runtime computes a cell's table
//! slot from the query coordinates alone.
//!
//! ## Pipeline
//!
//! ```rust,ignore
//! use tz_compiler::{parse_polygon_file, Compiler};
//!
//! let raw = parse_polygon_file("tz_world.json")?;
//! let (compiler, zones) = Compiler::from_raw(raw)?;
//! zones.write_json("timezone_names.json")?;
//! let stats = compiler.compile("timezone_data.bin", true)?;
//! println!("{} bytes", stats.file_len);
//! ```
//!
//! All coordinates are converted to fixed-point (degrees × 10^7 in an
//! `i32`) before any geometric test, so the resulting shortcut sets do not
//! depend on platform floating point behaviour.

pub mod binary;
pub mod compiler;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod parsing;
pub mod shortcuts;
pub mod zones;

pub use binary::{ArtifactHeader, ArtifactReader, Layout};
pub use compiler::{ArtifactStats, Compiler};
pub use config::CompilerConfig;
pub use error::{CompileError, Result};
pub use geometry::{BoundingBox, Polygon};
pub use parsing::{parse_polygon_file, parse_polygons, RawPolygon};
pub use shortcuts::{Cell, ShortcutTable};
pub use zones::ZoneNames;
