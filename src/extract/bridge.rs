//! Per-entry extraction and conversion
//!
//! The bridge between raw byte ranges and the format collaborators: read
//! the entry's range out of the section cache, write it verbatim as a
//! `.nud` file, hand it to the NUD loader, merge redundant polygon
//! groups, derive a display name, and write the COLLADA scene.

use std::fs;
use std::path::{Path, PathBuf};

use crate::container::BinaryCache;
use crate::error::{Error, Result};
use crate::formats::{dae, nud::NudFile};
use crate::index::FileEntry;

/// Extract and convert one file entry into `out_dir`.
///
/// The raw sub-file is written even when conversion fails afterwards.
/// Returns the path of the written scene file.
///
/// # Errors
/// Any failed step (range read, raw write, parse, scene write) is
/// returned attributed to this entry; the caller decides isolation.
pub fn process_entry(entry: &FileEntry, cache: &BinaryCache, out_dir: &Path) -> Result<PathBuf> {
    tracing::debug!(
        "processing {} at {}, length {}",
        entry.name,
        entry.start,
        entry.length
    );

    let bytes = cache.read(entry.start, entry.length)?;

    let raw_path = out_dir.join(format!("{}.nud", entry.name));
    if let Some(parent) = raw_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&raw_path, &bytes)?;

    let mut model = NudFile::from_bytes(&bytes)
        .map_err(|e| Error::Conversion(format!("failed to parse {}: {e}", raw_path.display())))?;
    model.merge_poly();

    let display_name = model.display_name(&entry.name);
    let scene_path = out_dir.join(format!("{display_name}.dae"));
    dae::write_dae(&scene_path, &model, &display_name)
        .map_err(|e| Error::Conversion(format!("failed to write {}: {e}", scene_path.display())))?;

    tracing::debug!("saved {}", scene_path.display());
    Ok(scene_path)
}
