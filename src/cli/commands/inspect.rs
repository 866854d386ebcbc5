//! CLI command for inspecting an extracted NUD container

use std::path::Path;

use crate::formats::nud::NudFile;

pub fn execute(model: &Path) -> anyhow::Result<()> {
    let file = NudFile::open(model)?;

    println!("{}", model.display());
    println!("  version: {}", file.version);
    println!(
        "  bounding sphere: ({}, {}, {}) r={}",
        file.bounding_sphere[0],
        file.bounding_sphere[1],
        file.bounding_sphere[2],
        file.bounding_sphere[3]
    );
    println!("  {} meshes, {} polys", file.meshes.len(), file.poly_count());

    for (i, mesh) in file.meshes.iter().enumerate() {
        let name = if mesh.name.is_empty() {
            "<unnamed>"
        } else {
            mesh.name.as_str()
        };
        let vertices: usize = mesh.polys.iter().map(|p| p.positions.len()).sum();
        println!(
            "  [{i}] {name}: {} polys, {vertices} vertices",
            mesh.polys.len()
        );
    }

    Ok(())
}
