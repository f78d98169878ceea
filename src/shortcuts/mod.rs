//! Shortcut grid index over the timezone polygons
//!
//! # Submodules
//! - `grid` - Fixed global grid resolution and cell formulas
//! - `builder` - Per-polygon cell selection (bounding box or exact sweeps)
//! - `table` - Cell to polygon-id mapping consumed by the serializer

mod grid;
mod builder;
mod table;

pub use grid::{
    NR_SHORTCUTS_PER_LNG,
    NR_SHORTCUTS_PER_LAT,
    GRID_COLUMNS,
    GRID_ROWS,
    CELL_COUNT,
    COLUMN_WIDTH,
    ROW_HEIGHT,
    Cell,
    CellRange,
    x_shortcut,
    y_shortcut,
    is_big_zone,
    latitudes_to_check,
    longitudes_to_check,
};

pub use builder::{
    SweepContext,
    compute_exact_shortcuts,
    polygon_shortcuts,
    build_shortcut_table,
};

pub use table::ShortcutTable;
