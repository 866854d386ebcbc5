//! COLLADA (.dae) writing
//!
//! Serializes a parsed NUD model as a COLLADA 1.4.1 scene: one geometry
//! per polygon group, one node per mesh instancing its geometries.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::formats::nud::{NudFile, NudPoly};

const COLLADA_NS: &str = "http://www.collada.org/2005/11/COLLADASchema";

/// Write a model to a COLLADA file.
///
/// # Errors
/// Returns an error if serialization or file writing fails.
pub fn write_dae<P: AsRef<Path>>(path: P, model: &NudFile, scene_name: &str) -> Result<()> {
    let xml = serialize_dae(model, scene_name)?;
    fs::write(path, xml)?;
    Ok(())
}

/// Serialize a model to a COLLADA document string.
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_dae(model: &NudFile, scene_name: &str) -> Result<String> {
    let mut output = Vec::new();
    let mut writer = Writer::new_with_indent(&mut output, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut collada = BytesStart::new("COLLADA");
    collada.push_attribute(("xmlns", COLLADA_NS));
    collada.push_attribute(("version", "1.4.1"));
    writer.write_event(Event::Start(collada))?;

    write_asset(&mut writer)?;
    write_geometries(&mut writer, model)?;
    write_visual_scene(&mut writer, model, scene_name)?;

    // <scene>
    writer.write_event(Event::Start(BytesStart::new("scene")))?;
    let mut instance = BytesStart::new("instance_visual_scene");
    instance.push_attribute(("url", "#scene"));
    writer.write_event(Event::Empty(instance))?;
    writer.write_event(Event::End(BytesEnd::new("scene")))?;

    writer.write_event(Event::End(BytesEnd::new("COLLADA")))?;

    Ok(String::from_utf8(output)?)
}

fn write_asset(writer: &mut Writer<&mut Vec<u8>>) -> Result<()> {
    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    writer.write_event(Event::Start(BytesStart::new("asset")))?;

    writer.write_event(Event::Start(BytesStart::new("contributor")))?;
    writer.write_event(Event::Start(BytesStart::new("authoring_tool")))?;
    writer.write_event(Event::Text(BytesText::new(concat!(
        "wangantools ",
        env!("CARGO_PKG_VERSION")
    ))))?;
    writer.write_event(Event::End(BytesEnd::new("authoring_tool")))?;
    writer.write_event(Event::End(BytesEnd::new("contributor")))?;

    for tag in ["created", "modified"] {
        writer.write_event(Event::Start(BytesStart::new(tag)))?;
        writer.write_event(Event::Text(BytesText::new(&stamp)))?;
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }

    let mut unit = BytesStart::new("unit");
    unit.push_attribute(("meter", "1"));
    unit.push_attribute(("name", "meter"));
    writer.write_event(Event::Empty(unit))?;

    writer.write_event(Event::Start(BytesStart::new("up_axis")))?;
    writer.write_event(Event::Text(BytesText::new("Y_UP")))?;
    writer.write_event(Event::End(BytesEnd::new("up_axis")))?;

    writer.write_event(Event::End(BytesEnd::new("asset")))?;
    Ok(())
}

fn write_geometries(writer: &mut Writer<&mut Vec<u8>>, model: &NudFile) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("library_geometries")))?;

    for (mesh_idx, mesh) in model.meshes.iter().enumerate() {
        for (poly_idx, poly) in mesh.polys.iter().enumerate() {
            write_geometry(writer, &geometry_id(mesh_idx, poly_idx), &mesh.name, poly)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("library_geometries")))?;
    Ok(())
}

fn write_geometry(
    writer: &mut Writer<&mut Vec<u8>>,
    id: &str,
    name: &str,
    poly: &NudPoly,
) -> Result<()> {
    let mut geometry = BytesStart::new("geometry");
    geometry.push_attribute(("id", id));
    if !name.is_empty() {
        geometry.push_attribute(("name", name));
    }
    writer.write_event(Event::Start(geometry))?;
    writer.write_event(Event::Start(BytesStart::new("mesh")))?;

    // <source> with the position float array
    let source_id = format!("{id}-positions");
    let array_id = format!("{id}-positions-array");

    let mut source = BytesStart::new("source");
    source.push_attribute(("id", source_id.as_str()));
    writer.write_event(Event::Start(source))?;

    let mut float_array = BytesStart::new("float_array");
    float_array.push_attribute(("id", array_id.as_str()));
    float_array.push_attribute(("count", (poly.positions.len() * 3).to_string().as_str()));
    writer.write_event(Event::Start(float_array))?;
    writer.write_event(Event::Text(BytesText::new(&positions_text(poly))))?;
    writer.write_event(Event::End(BytesEnd::new("float_array")))?;

    writer.write_event(Event::Start(BytesStart::new("technique_common")))?;
    let mut accessor = BytesStart::new("accessor");
    accessor.push_attribute(("source", format!("#{array_id}").as_str()));
    accessor.push_attribute(("count", poly.positions.len().to_string().as_str()));
    accessor.push_attribute(("stride", "3"));
    writer.write_event(Event::Start(accessor))?;
    for axis in ["X", "Y", "Z"] {
        let mut param = BytesStart::new("param");
        param.push_attribute(("name", axis));
        param.push_attribute(("type", "float"));
        writer.write_event(Event::Empty(param))?;
    }
    writer.write_event(Event::End(BytesEnd::new("accessor")))?;
    writer.write_event(Event::End(BytesEnd::new("technique_common")))?;
    writer.write_event(Event::End(BytesEnd::new("source")))?;

    // <vertices>
    let vertices_id = format!("{id}-vertices");
    let mut vertices = BytesStart::new("vertices");
    vertices.push_attribute(("id", vertices_id.as_str()));
    writer.write_event(Event::Start(vertices))?;
    let mut input = BytesStart::new("input");
    input.push_attribute(("semantic", "POSITION"));
    input.push_attribute(("source", format!("#{source_id}").as_str()));
    writer.write_event(Event::Empty(input))?;
    writer.write_event(Event::End(BytesEnd::new("vertices")))?;

    // <triangles>
    let mut triangles = BytesStart::new("triangles");
    triangles.push_attribute(("count", (poly.indices.len() / 3).to_string().as_str()));
    writer.write_event(Event::Start(triangles))?;
    let mut input = BytesStart::new("input");
    input.push_attribute(("semantic", "VERTEX"));
    input.push_attribute(("source", format!("#{vertices_id}").as_str()));
    input.push_attribute(("offset", "0"));
    writer.write_event(Event::Empty(input))?;
    writer.write_event(Event::Start(BytesStart::new("p")))?;
    writer.write_event(Event::Text(BytesText::new(&indices_text(poly))))?;
    writer.write_event(Event::End(BytesEnd::new("p")))?;
    writer.write_event(Event::End(BytesEnd::new("triangles")))?;

    writer.write_event(Event::End(BytesEnd::new("mesh")))?;
    writer.write_event(Event::End(BytesEnd::new("geometry")))?;
    Ok(())
}

fn write_visual_scene(
    writer: &mut Writer<&mut Vec<u8>>,
    model: &NudFile,
    scene_name: &str,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("library_visual_scenes")))?;
    let mut scene = BytesStart::new("visual_scene");
    scene.push_attribute(("id", "scene"));
    scene.push_attribute(("name", scene_name));
    writer.write_event(Event::Start(scene))?;

    for (mesh_idx, mesh) in model.meshes.iter().enumerate() {
        let node_id = format!("node{mesh_idx}");
        let mut node = BytesStart::new("node");
        node.push_attribute(("id", node_id.as_str()));
        let node_name = if mesh.name.is_empty() {
            node_id.as_str()
        } else {
            mesh.name.as_str()
        };
        node.push_attribute(("name", node_name));
        writer.write_event(Event::Start(node))?;

        for poly_idx in 0..mesh.polys.len() {
            let mut instance = BytesStart::new("instance_geometry");
            let url = format!("#{}", geometry_id(mesh_idx, poly_idx));
            instance.push_attribute(("url", url.as_str()));
            writer.write_event(Event::Empty(instance))?;
        }

        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("visual_scene")))?;
    writer.write_event(Event::End(BytesEnd::new("library_visual_scenes")))?;
    Ok(())
}

fn geometry_id(mesh_idx: usize, poly_idx: usize) -> String {
    format!("geom{mesh_idx}_{poly_idx}")
}

fn positions_text(poly: &NudPoly) -> String {
    let mut text = String::new();
    for position in &poly.positions {
        for component in position {
            if !text.is_empty() {
                text.push(' ');
            }
            let _ = write!(text, "{component}");
        }
    }
    text
}

fn indices_text(poly: &NudPoly) -> String {
    let mut text = String::new();
    for index in &poly.indices {
        if !text.is_empty() {
            text.push(' ');
        }
        let _ = write!(text, "{index}");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::nud::{NudMesh, NudPoly};

    fn sample() -> NudFile {
        NudFile {
            version: 2,
            bounding_sphere: [0.0; 4],
            meshes: vec![NudMesh {
                name: "guardrail".to_string(),
                bounding_sphere: [0.0; 4],
                polys: vec![
                    NudPoly {
                        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                        indices: vec![0, 1, 2],
                        material: 0,
                    },
                    NudPoly {
                        positions: vec![[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]],
                        indices: vec![0, 1, 2],
                        material: 1,
                    },
                ],
            }],
        }
    }

    #[test]
    fn one_geometry_per_poly() {
        let xml = serialize_dae(&sample(), "c1_section_1").unwrap();
        assert_eq!(xml.matches("<geometry").count(), 2);
        assert!(xml.contains("geom0_0"));
        assert!(xml.contains("geom0_1"));
    }

    #[test]
    fn scene_carries_the_display_name_and_mesh_nodes() {
        let xml = serialize_dae(&sample(), "c1_section_1").unwrap();
        assert!(xml.contains(r#"<visual_scene id="scene" name="c1_section_1">"#));
        assert!(xml.contains(r#"name="guardrail""#));
        assert!(xml.contains(r##"<instance_geometry url="#geom0_1"/>"##));
    }

    #[test]
    fn geometry_payload_round_trips_positions_and_indices() {
        let xml = serialize_dae(&sample(), "s").unwrap();
        assert!(xml.contains("0 0 0 1 0 0 0 1 0"));
        assert!(xml.contains("<p>0 1 2</p>"));
    }
}
