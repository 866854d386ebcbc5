//! CLI command for listing descriptor texture names

use std::path::Path;

use crate::descriptor::{DescriptorScript, TEXTURE_LIST};

pub fn execute(descriptor: &Path) -> anyhow::Result<()> {
    let script = DescriptorScript::from_file(descriptor)?;
    let textures = script.string_list(TEXTURE_LIST)?;

    for texture in &textures {
        println!("{texture}");
    }
    println!("{} textures", textures.len());

    Ok(())
}
