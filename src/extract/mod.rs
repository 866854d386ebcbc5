//! Archive extraction orchestration
//!
//! Fans out one task per section on the rayon pool. Sections share
//! nothing except the read-only [`ArchiveIndex`]; each task resolves its
//! own BIN container, loads it into a [`BinaryCache`], and processes its
//! entries sequentially in descriptor order. This is a best-effort batch
//! job: a failing entry is recorded and its siblings keep going, and the
//! run completes only once every section task has finished.

mod bridge;

pub use bridge::process_entry;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;

use crate::container::BinaryCache;
use crate::error::{Error, Result};
use crate::index::{ArchiveIndex, Section};

/// Options for an extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Root directory for extracted output. Defaults to
    /// `extracted_files/` next to the descriptor.
    pub output_root: Option<PathBuf>,
}

/// Progress update for an extraction run, one per attempted entry.
#[derive(Debug, Clone)]
pub struct ExtractProgress {
    /// Entries attempted so far, across all sections.
    pub current: usize,
    /// Total entries in the index.
    pub total: usize,
    /// The entry just attempted.
    pub entry_name: String,
    /// The section it belongs to.
    pub section_id: u32,
}

/// Summary of an extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Number of file entries attempted.
    pub attempted: usize,
    /// Number of file entries that failed.
    pub failed: usize,
    /// One message per entry or section-level failure, grouped by section
    /// in index order.
    pub results: Vec<String>,
}

impl ExtractionReport {
    /// Whether every attempted entry succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Extract and convert every file entry of every section.
///
/// Sections run concurrently; the call returns once all of them have
/// finished, successfully or not. There is no early exit on failure.
pub fn extract_archive<F>(
    index: &ArchiveIndex,
    descriptor_path: &Path,
    options: &ExtractOptions,
    progress: F,
) -> ExtractionReport
where
    F: Fn(&ExtractProgress) + Send + Sync,
{
    let base_dir = descriptor_path.parent().unwrap_or_else(|| Path::new("."));
    let output_root = options
        .output_root
        .clone()
        .unwrap_or_else(|| base_dir.join("extracted_files"));

    let attempted = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let total = index.total_entries();

    let ctx = SectionContext {
        base_dir,
        output_root: &output_root,
        attempted: &attempted,
        failed: &failed,
        total,
        progress: &progress,
    };

    let per_section: Vec<Vec<String>> = index
        .sections
        .par_iter()
        .map(|section| process_section(section, &ctx))
        .collect();

    ExtractionReport {
        attempted: attempted.load(Ordering::SeqCst),
        failed: failed.load(Ordering::SeqCst),
        results: per_section.into_iter().flatten().collect(),
    }
}

/// Resolve a section's BIN container on disk.
///
/// Prefers the path as configured in the descriptor (relative to the
/// descriptor's directory), then falls back to the `bin/` sibling
/// directory convention.
fn resolve_container(base_dir: &Path, bin_path: &str) -> Result<PathBuf> {
    let primary = base_dir.join(bin_path);
    if primary.is_file() {
        return Ok(primary);
    }

    let file_name = Path::new(bin_path)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(bin_path));
    let fallback = base_dir.join("bin").join(file_name);
    if fallback.is_file() {
        return Ok(fallback);
    }

    Err(Error::ContainerNotFound { primary, fallback })
}

struct SectionContext<'a> {
    base_dir: &'a Path,
    output_root: &'a Path,
    attempted: &'a AtomicUsize,
    failed: &'a AtomicUsize,
    total: usize,
    progress: &'a (dyn Fn(&ExtractProgress) + Send + Sync),
}

fn process_section(section: &Section, ctx: &SectionContext<'_>) -> Vec<String> {
    let section_dir = ctx.output_root.join(format!("section_{}", section.id));

    // A section that cannot produce a cache fails as a unit: all of its
    // entries were attempted by intent and none succeeded.
    let cache = match prepare_section(section, ctx.base_dir, &section_dir) {
        Ok(cache) => cache,
        Err(e) => {
            // Progress still ticks once per entry so the bar reaches its
            // total even when a whole section is skipped.
            for (_, entries) in section.categories() {
                for entry in entries {
                    let current = ctx.attempted.fetch_add(1, Ordering::SeqCst) + 1;
                    (ctx.progress)(&ExtractProgress {
                        current,
                        total: ctx.total,
                        entry_name: entry.name.clone(),
                        section_id: section.id,
                    });
                }
            }
            ctx.failed
                .fetch_add(section.entry_count(), Ordering::SeqCst);
            tracing::warn!("section {}: {e}", section.id);
            return vec![format!("section {}: {e}", section.id)];
        }
    };

    let mut results = Vec::with_capacity(section.entry_count());
    for (category, entries) in section.categories() {
        if entries.is_empty() {
            continue;
        }
        tracing::debug!(
            "section {}: processing {} {category} entries",
            section.id,
            entries.len()
        );

        for entry in entries {
            let current = ctx.attempted.fetch_add(1, Ordering::SeqCst) + 1;
            (ctx.progress)(&ExtractProgress {
                current,
                total: ctx.total,
                entry_name: entry.name.clone(),
                section_id: section.id,
            });

            match bridge::process_entry(entry, &cache, &section_dir) {
                Ok(scene_path) => {
                    results.push(format!(
                        "section {}: {} -> {}",
                        section.id,
                        entry.name,
                        scene_path.display()
                    ));
                }
                Err(e) => {
                    ctx.failed.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!("section {}: entry {} failed: {e}", section.id, entry.name);
                    results.push(format!(
                        "section {}: {} failed: {e}",
                        section.id, entry.name
                    ));
                }
            }
        }
    }

    // The cache drops here, with the section task that owned it.
    results
}

fn prepare_section(section: &Section, base_dir: &Path, section_dir: &Path) -> Result<BinaryCache> {
    let container_path = resolve_container(base_dir, &section.bin_path)?;
    tracing::debug!(
        "section {}: container {}",
        section.id,
        container_path.display()
    );
    let cache = BinaryCache::open(&container_path)?;
    std::fs::create_dir_all(section_dir)?;
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn resolve_prefers_the_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c1.bin"), b"x").unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin/c1.bin"), b"y").unwrap();

        let resolved = resolve_container(dir.path(), "c1.bin").unwrap();
        assert_eq!(resolved, dir.path().join("c1.bin"));
    }

    #[test]
    fn resolve_falls_back_to_the_bin_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin/c1.bin"), b"y").unwrap();

        let resolved = resolve_container(dir.path(), "data/c1.bin").unwrap();
        assert_eq!(resolved, dir.path().join("bin").join("c1.bin"));
    }

    #[test]
    fn resolve_names_both_candidates_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_container(dir.path(), "c9.bin").unwrap_err();
        match err {
            Error::ContainerNotFound { primary, fallback } => {
                assert_eq!(primary, dir.path().join("c9.bin"));
                assert_eq!(fallback, dir.path().join("bin").join("c9.bin"));
            }
            other => panic!("expected ContainerNotFound, got {other:?}"),
        }
    }
}
