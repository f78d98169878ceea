//! Binary artifact format
//!
//! # Submodules
//! - `layout` - Address computation and format checks
//! - `writer` - Big-endian emission with temp file + rename
//! - `reader` - Bounds-checked read-back for verification

mod layout;
mod writer;
mod reader;

pub use layout::{
    Layout,
    MAX_ENTRIES_PER_CELL,
    HEADER_LEN,
    POLYGON_META_LEN,
    CELL_COUNT_TABLE_LEN,
    CELL_ADDRESS_TABLE_LEN,
};

pub use writer::{
    write_artifact,
    write_artifact_file,
    artifact_bytes,
};

pub(crate) use writer::write_file_atomically;

pub use reader::{
    ArtifactHeader,
    ArtifactReader,
};
