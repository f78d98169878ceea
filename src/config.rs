//! Compiler configuration
//!
//! Defaults, optionally overridden by a JSON file, optionally overridden by
//! command line flags. The grid resolution is not configurable: it is
//! part of the file format.

use crate::error::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Line-oriented polygon source
    pub input: PathBuf,
    /// Compiled artifact
    pub output: PathBuf,
    /// Sorted zone-name table (JSON array)
    pub zone_names: PathBuf,
    /// Compute per-polygon shortcuts on the rayon pool
    pub parallel: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("tz_world.json"),
            output: PathBuf::from("timezone_data.bin"),
            zone_names: PathBuf::from("timezone_names.json"),
            parallel: true,
        }
    }
}

impl CompilerConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CompilerConfig::from_json(r#"{ "output": "out.bin", "parallel": false }"#).unwrap();
        assert_eq!(config.output, PathBuf::from("out.bin"));
        assert!(!config.parallel);
        assert_eq!(config.input, CompilerConfig::default().input);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(CompilerConfig::from_json(r#"{ "shortcuts_per_lng": 2 }"#).is_err());
    }
}
