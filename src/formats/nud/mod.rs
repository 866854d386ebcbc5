//! NUD mesh containers
//!
//! The sub-files packed into a track BIN are NUD mesh containers
//! (big-endian, `NDP3` magic). The layout this tool reads and writes:
//!
//! - `0x30` header: magic, file size, version, mesh count, clump sizes,
//!   bounding sphere
//! - `0x20` mesh headers: bounding sphere, name offset, poly count, first
//!   poly index
//! - `0x10` poly records: vertex offset/count/stride, index offset/count,
//!   material flags
//! - index clump (u16 triangle indices), vertex clump (position is the
//!   first 12 bytes of each stride), NUL-terminated name table
//!
//! Only positions and triangle indices are decoded; the remainder of each
//! vertex stride is skipped.

mod reader;
mod writer;

pub use writer::to_bytes;

use std::fs;
use std::path::Path;

use crate::error::Result;

/// One polygon group of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct NudPoly {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Triangle-list indices into `positions`.
    pub indices: Vec<u16>,
    /// Material flags, carried through untouched.
    pub material: u16,
}

/// A named mesh and its polygon groups.
#[derive(Debug, Clone, PartialEq)]
pub struct NudMesh {
    /// Mesh name from the container's name table (may be empty).
    pub name: String,
    /// Mesh bounding sphere `(x, y, z, radius)`.
    pub bounding_sphere: [f32; 4],
    /// Polygon groups in container order.
    pub polys: Vec<NudPoly>,
}

/// A parsed NUD mesh container.
#[derive(Debug, Clone, PartialEq)]
pub struct NudFile {
    /// Container format version.
    pub version: u16,
    /// Whole-container bounding sphere.
    pub bounding_sphere: [f32; 4],
    /// Meshes in container order.
    pub meshes: Vec<NudMesh>,
}

impl NudFile {
    /// Parse a NUD container from a byte slice.
    ///
    /// # Errors
    /// Returns an error if the magic, a record, or a referenced clump
    /// range is invalid.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        reader::parse(data)
    }

    /// Read and parse a NUD container file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Merge meshes that share a non-empty name into one mesh.
    ///
    /// Polygon groups of later duplicates are appended to the first
    /// occurrence; first-occurrence order is preserved. Unnamed meshes are
    /// never merged.
    pub fn merge_poly(&mut self) {
        let mut merged: Vec<NudMesh> = Vec::with_capacity(self.meshes.len());
        for mesh in self.meshes.drain(..) {
            if !mesh.name.is_empty() {
                if let Some(existing) = merged.iter_mut().find(|m| m.name == mesh.name) {
                    existing.polys.extend(mesh.polys);
                    continue;
                }
            }
            merged.push(mesh);
        }
        self.meshes = merged;
    }

    /// Human-readable name for this container.
    ///
    /// Scans the mesh list in order and takes the last non-empty name,
    /// falling back to `fallback` when every mesh is unnamed.
    #[must_use]
    pub fn display_name(&self, fallback: &str) -> String {
        let mut name = fallback.to_string();
        for mesh in &self.meshes {
            if !mesh.name.is_empty() {
                name.clone_from(&mesh.name);
            }
        }
        name
    }

    /// Total polygon group count across all meshes.
    #[must_use]
    pub fn poly_count(&self) -> usize {
        self.meshes.iter().map(|m| m.polys.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn poly(material: u16) -> NudPoly {
        NudPoly {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2],
            material,
        }
    }

    fn mesh(name: &str, polys: Vec<NudPoly>) -> NudMesh {
        NudMesh {
            name: name.to_string(),
            bounding_sphere: [0.0; 4],
            polys,
        }
    }

    #[test]
    fn merge_poly_concatenates_same_named_meshes_in_first_occurrence_order() {
        let mut file = NudFile {
            version: 2,
            bounding_sphere: [0.0; 4],
            meshes: vec![
                mesh("guardrail", vec![poly(0)]),
                mesh("tunnel", vec![poly(1)]),
                mesh("guardrail", vec![poly(2), poly(3)]),
            ],
        };
        file.merge_poly();

        assert_eq!(file.meshes.len(), 2);
        assert_eq!(file.meshes[0].name, "guardrail");
        assert_eq!(file.meshes[0].polys.len(), 3);
        assert_eq!(file.meshes[0].polys[2].material, 3);
        assert_eq!(file.meshes[1].name, "tunnel");
    }

    #[test]
    fn merge_poly_leaves_unnamed_meshes_alone() {
        let mut file = NudFile {
            version: 2,
            bounding_sphere: [0.0; 4],
            meshes: vec![mesh("", vec![poly(0)]), mesh("", vec![poly(1)])],
        };
        file.merge_poly();
        assert_eq!(file.meshes.len(), 2);
    }

    #[test]
    fn display_name_takes_the_last_non_empty_name() {
        let file = NudFile {
            version: 2,
            bounding_sphere: [0.0; 4],
            meshes: vec![
                mesh("first", vec![]),
                mesh("", vec![]),
                mesh("last", vec![]),
            ],
        };
        assert_eq!(file.display_name("fallback"), "last");
    }

    #[test]
    fn display_name_falls_back_when_all_names_are_empty() {
        let file = NudFile {
            version: 2,
            bounding_sphere: [0.0; 4],
            meshes: vec![mesh("", vec![])],
        };
        assert_eq!(file.display_name("mesh0"), "mesh0");
    }

    #[test]
    fn encode_then_parse_preserves_the_model() {
        let original = NudFile {
            version: 2,
            bounding_sphere: [1.0, 2.0, 3.0, 4.0],
            meshes: vec![
                mesh("road_main", vec![poly(5)]),
                mesh("", vec![poly(0), poly(7)]),
            ],
        };
        let bytes = to_bytes(&original);
        let parsed = NudFile::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, original);
    }
}
