//! Zone name table
//!
//! Zone ids are indices into the sorted list of distinct zone names. The
//! table is written next to the artifact so the runtime can map an id back
//! to its name.

use crate::binary::write_file_atomically;
use crate::error::{CompileError, Result};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Sorted distinct zone names plus the zone id of every input polygon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneNames {
    pub names: Vec<String>,
    pub ids: Vec<u16>,
}

impl ZoneNames {
    /// Dedupe and sort `polygon_zones`, then assign every polygon the index
    /// of its name
    pub fn assign<S: AsRef<str>>(polygon_zones: &[S]) -> Result<Self> {
        let unique: BTreeSet<&str> = polygon_zones.iter().map(|zone| zone.as_ref()).collect();
        let names: Vec<String> = unique.into_iter().map(str::to_string).collect();
        if names.len() > u16::MAX as usize + 1 {
            return Err(CompileError::FormatConsistency(format!(
                "{} distinct zones do not fit 16 bit zone ids",
                names.len()
            )));
        }

        let ids = polygon_zones
            .iter()
            .map(|zone| {
                names
                    .binary_search_by(|n| n.as_str().cmp(zone.as_ref()))
                    .map(|i| i as u16)
                    .map_err(|_| {
                        CompileError::FormatConsistency(format!("zone {} missing", zone.as_ref()))
                    })
            })
            .collect::<Result<Vec<u16>>>()?;

        Ok(Self { names, ids })
    }

    pub fn name(&self, id: u16) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// Write the sorted names as a JSON array, replacing `path` atomically
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_file_atomically(path.as_ref(), |writer| {
            serde_json::to_writer_pretty(&mut *writer, &self.names)?;
            writer.write_all(b"\n")?;
            Ok(())
        })?;
        info!("wrote {} zone names to {}", self.names.len(), path.as_ref().display());
        Ok(())
    }
}
