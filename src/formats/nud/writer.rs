//! NUD container encoding
//!
//! Inverse of the reader, used to repack meshes and to build test
//! fixtures. Positions are written with a bare 12-byte stride.

use super::NudFile;
use super::reader::{HEADER_SIZE, MAGIC, MESH_HEADER_SIZE, POLY_RECORD_SIZE};

/// Encode a model as a NUD container.
#[must_use]
pub fn to_bytes(file: &NudFile) -> Vec<u8> {
    let mut index_clump = Vec::new();
    let mut vertex_clump = Vec::new();
    let mut name_table = Vec::new();
    let mut poly_records = Vec::new();
    let mut mesh_headers = Vec::new();

    let mut next_poly = 0u32;
    for mesh in &file.meshes {
        let name_offset = name_table.len() as u32;
        name_table.extend_from_slice(mesh.name.as_bytes());
        name_table.push(0);

        mesh_headers.extend(mesh.bounding_sphere.iter().flat_map(|f| f.to_be_bytes()));
        mesh_headers.extend_from_slice(&name_offset.to_be_bytes());
        mesh_headers.extend_from_slice(&(mesh.polys.len() as u16).to_be_bytes());
        mesh_headers.extend_from_slice(&0u16.to_be_bytes()); // flags
        mesh_headers.extend_from_slice(&next_poly.to_be_bytes());
        mesh_headers.extend_from_slice(&0u32.to_be_bytes()); // reserved
        next_poly += mesh.polys.len() as u32;

        for poly in &mesh.polys {
            let vertex_offset = vertex_clump.len() as u32;
            for position in &poly.positions {
                for component in position {
                    vertex_clump.extend_from_slice(&component.to_be_bytes());
                }
            }

            let index_offset = index_clump.len() as u32;
            for index in &poly.indices {
                index_clump.extend_from_slice(&index.to_be_bytes());
            }

            poly_records.extend_from_slice(&vertex_offset.to_be_bytes());
            poly_records.extend_from_slice(&(poly.positions.len() as u16).to_be_bytes());
            poly_records.push(12); // stride: position only
            poly_records.push(0); // uv size
            poly_records.extend_from_slice(&index_offset.to_be_bytes());
            poly_records.extend_from_slice(&(poly.indices.len() as u16).to_be_bytes());
            poly_records.extend_from_slice(&poly.material.to_be_bytes());
        }
    }

    debug_assert_eq!(mesh_headers.len(), file.meshes.len() * MESH_HEADER_SIZE);
    debug_assert_eq!(poly_records.len(), next_poly as usize * POLY_RECORD_SIZE);

    let poly_clump_size = (poly_records.len() + index_clump.len()) as u32;
    let file_size = HEADER_SIZE
        + mesh_headers.len()
        + poly_records.len()
        + index_clump.len()
        + vertex_clump.len()
        + name_table.len();

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&(file_size as u32).to_be_bytes());
    out.extend_from_slice(&file.version.to_be_bytes());
    out.extend_from_slice(&(file.meshes.len() as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // bone type
    out.extend_from_slice(&0u16.to_be_bytes()); // bone count
    out.extend_from_slice(&poly_clump_size.to_be_bytes());
    out.extend_from_slice(&(vertex_clump.len() as u32).to_be_bytes());
    out.extend_from_slice(&(name_table.len() as u32).to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // reserved
    out.extend(file.bounding_sphere.iter().flat_map(|f| f.to_be_bytes()));

    out.extend_from_slice(&mesh_headers);
    out.extend_from_slice(&poly_records);
    out.extend_from_slice(&index_clump);
    out.extend_from_slice(&vertex_clump);
    out.extend_from_slice(&name_table);

    out
}
