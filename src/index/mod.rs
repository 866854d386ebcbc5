//! Archive index model
//!
//! The descriptor's `MODELLIST` is turned into a typed [`ArchiveIndex`]:
//! an ordered list of [`Section`]s, each pairing a BIN container path with
//! the file entries of ten fixed categories. The index is built once per
//! run and is read-only afterwards, so section tasks can share it by
//! reference.

mod builder;
mod types;

pub use types::{ArchiveIndex, Category, FileEntry, Section};
