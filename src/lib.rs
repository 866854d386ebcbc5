//! # wangantools
//!
//! A pure-Rust library for working with Wangan Midnight Maximum Tune
//! track archives.
//!
//! ## Pipeline
//!
//! A track ships as a Lua descriptor plus monolithic BIN containers
//! (optionally gzip-compressed). The descriptor enumerates texture names
//! and, per section, the offset/length of every packed NUD mesh. This
//! crate evaluates the descriptor, builds a typed index, extracts each
//! sub-file, and converts it to a COLLADA scene.
//!
//! ## Quick Start
//!
//! ```no_run
//! use wangantools::descriptor::DescriptorScript;
//! use wangantools::extract::{ExtractOptions, extract_archive};
//! use wangantools::index::ArchiveIndex;
//! use std::path::Path;
//!
//! let descriptor_path = Path::new("c1_model.lua");
//! let script = DescriptorScript::from_file(descriptor_path)?;
//! let index = ArchiveIndex::from_descriptor(&script)?;
//!
//! let report = extract_archive(&index, descriptor_path, &ExtractOptions::default(), |_| {});
//! println!("{} attempted, {} failed", report.attempted, report.failed);
//! # Ok::<(), wangantools::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `wangantools` command-line binary

pub mod container;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod formats;
pub mod index;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::container::BinaryCache;
    pub use crate::descriptor::{DescriptorScript, MODEL_LIST, TEXTURE_LIST};
    pub use crate::error::{Error, Result};
    pub use crate::extract::{ExtractOptions, ExtractProgress, ExtractionReport, extract_archive};
    pub use crate::formats::dae::{serialize_dae, write_dae};
    pub use crate::formats::nud::{NudFile, NudMesh, NudPoly};
    pub use crate::index::{ArchiveIndex, Category, FileEntry, Section};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
