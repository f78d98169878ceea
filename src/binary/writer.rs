//! Big-endian emission of a computed [`Layout`]

use super::layout::Layout;
use crate::error::{CompileError, Result};
use crate::geometry::{to_fixed, Polygon};
use byteorder::{BigEndian, WriteBytesExt};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writer adapter that tracks how many bytes went through it
struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn check_position(actual: u64, expected: u64, section: &str) -> Result<()> {
    if actual != expected {
        return Err(CompileError::FormatConsistency(format!(
            "{} starts at byte {} but the layout expects {}",
            section, actual, expected
        )));
    }
    Ok(())
}

/// Write the artifact for `layout` and `polygons` to `out`.
/// Returns the number of bytes written.
pub fn write_artifact<W: Write>(out: W, layout: &Layout, polygons: &[Polygon]) -> Result<u64> {
    let mut out = CountingWriter { inner: out, written: 0 };

    out.write_u16::<BigEndian>(layout.polygon_count)?;
    out.write_u32::<BigEndian>(layout.shortcut_start)?;
    for &zone_id in &layout.zone_ids {
        out.write_u16::<BigEndian>(zone_id)?;
    }
    for &count in &layout.point_counts {
        out.write_u16::<BigEndian>(count)?;
    }
    for &address in &layout.polygon_addresses {
        out.write_u32::<BigEndian>(address)?;
    }
    for bounds in &layout.bounds {
        for &value in bounds {
            out.write_i32::<BigEndian>(value)?;
        }
    }

    for (polygon, &address) in polygons.iter().zip(&layout.polygon_addresses) {
        check_position(out.written, address as u64, "polygon data")?;
        for &(x, _) in &polygon.points {
            out.write_i32::<BigEndian>(to_fixed(x))?;
        }
        for &(_, y) in &polygon.points {
            out.write_i32::<BigEndian>(to_fixed(y))?;
        }
    }
    check_position(out.written, layout.shortcut_start as u64, "shortcut section")?;

    for &count in &layout.cell_counts {
        out.write_u16::<BigEndian>(count)?;
    }
    for &address in &layout.cell_addresses {
        out.write_u32::<BigEndian>(address)?;
    }
    check_position(out.written, layout.entries_start(), "shortcut entries")?;
    for &id in &layout.cell_entries {
        out.write_u16::<BigEndian>(id)?;
    }
    check_position(out.written, layout.file_len, "end of file")?;

    out.flush()?;
    Ok(out.written)
}

/// Serialize into memory
pub fn artifact_bytes(layout: &Layout, polygons: &[Polygon]) -> Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(layout.file_len as usize);
    write_artifact(&mut buffer, layout, polygons)?;
    Ok(buffer)
}

/// `<path>.tmp`, next to the final file so the rename stays on one filesystem
fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Run `write` against a buffered `<path>.tmp`, sync it, then rename it onto
/// `path`. On any failure the temp file is removed and `path` is untouched.
pub(crate) fn write_file_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T>,
{
    let tmp = temp_path(path);
    debug!("writing {}", tmp.display());

    let result = (|| -> Result<T> {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        let value = write(&mut writer)?;
        let file = writer.into_inner().map_err(|e| CompileError::Io(e.into_error()))?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(value)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Write the artifact to `path` without ever leaving a partial file there
pub fn write_artifact_file(path: &Path, layout: &Layout, polygons: &[Polygon]) -> Result<u64> {
    let written = write_file_atomically(path, |writer| write_artifact(writer, layout, polygons))?;
    info!("wrote {} bytes to {}", written, path.display());
    Ok(written)
}
