//! NUD container parsing

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

use super::{NudFile, NudMesh, NudPoly};

pub(super) const MAGIC: [u8; 4] = *b"NDP3";
pub(super) const HEADER_SIZE: usize = 0x30;
pub(super) const MESH_HEADER_SIZE: usize = 0x20;
pub(super) const POLY_RECORD_SIZE: usize = 0x10;

struct MeshHeader {
    bounding_sphere: [f32; 4],
    name_offset: usize,
    poly_count: usize,
    first_poly: usize,
}

struct PolyRecord {
    vertex_offset: usize,
    vertex_count: usize,
    vertex_stride: usize,
    index_offset: usize,
    index_count: usize,
    material: u16,
}

pub(super) fn parse(data: &[u8]) -> Result<NudFile> {
    let header = take(data, 0, HEADER_SIZE)?;

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&header[0..4]);
    if magic != MAGIC {
        return Err(Error::InvalidNudMagic(magic));
    }

    let file_size = BigEndian::read_u32(&header[0x04..]) as usize;
    if file_size > data.len() {
        return Err(Error::InvalidNud {
            message: format!(
                "declared size {file_size} exceeds available {} bytes",
                data.len()
            ),
        });
    }

    let version = BigEndian::read_u16(&header[0x08..]);
    let mesh_count = BigEndian::read_u16(&header[0x0A..]) as usize;
    let poly_clump_size = BigEndian::read_u32(&header[0x10..]) as usize;
    let vertex_clump_size = BigEndian::read_u32(&header[0x14..]) as usize;
    let name_table_size = BigEndian::read_u32(&header[0x18..]) as usize;
    let bounding_sphere = read_sphere(&header[0x20..0x30]);

    // Region layout: mesh headers, poly records, index clump, vertex
    // clump, name table. The poly record area is implied by the highest
    // poly index any mesh references.
    let mesh_headers = (0..mesh_count)
        .map(|i| read_mesh_header(data, HEADER_SIZE + i * MESH_HEADER_SIZE))
        .collect::<Result<Vec<_>>>()?;

    let poly_total = mesh_headers
        .iter()
        .map(|m| m.first_poly + m.poly_count)
        .max()
        .unwrap_or(0);
    let poly_area = poly_total * POLY_RECORD_SIZE;
    if poly_clump_size < poly_area {
        return Err(Error::InvalidNud {
            message: format!(
                "poly clump size {poly_clump_size} too small for {poly_total} poly records"
            ),
        });
    }

    let poly_records_start = HEADER_SIZE + mesh_count * MESH_HEADER_SIZE;
    let index_clump_start = poly_records_start + poly_area;
    let index_clump_size = poly_clump_size - poly_area;
    let vertex_clump_start = index_clump_start + index_clump_size;
    let name_table_start = vertex_clump_start + vertex_clump_size;

    let index_clump = take(data, index_clump_start, index_clump_size)?;
    let vertex_clump = take(data, vertex_clump_start, vertex_clump_size)?;
    let name_table = take(data, name_table_start, name_table_size)?;

    let poly_records = (0..poly_total)
        .map(|i| read_poly_record(data, poly_records_start + i * POLY_RECORD_SIZE))
        .collect::<Result<Vec<_>>>()?;

    let mut meshes = Vec::with_capacity(mesh_count);
    for mesh in &mesh_headers {
        let name = read_name(name_table, mesh.name_offset)?;
        let polys = poly_records
            .get(mesh.first_poly..mesh.first_poly + mesh.poly_count)
            .ok_or_else(|| Error::InvalidNud {
                message: format!(
                    "mesh '{name}' references poly records {}..{} of {poly_total}",
                    mesh.first_poly,
                    mesh.first_poly + mesh.poly_count
                ),
            })?
            .iter()
            .map(|record| decode_poly(record, index_clump, vertex_clump))
            .collect::<Result<Vec<_>>>()?;

        meshes.push(NudMesh {
            name,
            bounding_sphere: mesh.bounding_sphere,
            polys,
        });
    }

    Ok(NudFile {
        version,
        bounding_sphere,
        meshes,
    })
}

fn read_mesh_header(data: &[u8], offset: usize) -> Result<MeshHeader> {
    let record = take(data, offset, MESH_HEADER_SIZE)?;
    Ok(MeshHeader {
        bounding_sphere: read_sphere(&record[0x00..0x10]),
        name_offset: BigEndian::read_u32(&record[0x10..]) as usize,
        poly_count: BigEndian::read_u16(&record[0x14..]) as usize,
        first_poly: BigEndian::read_u32(&record[0x18..]) as usize,
    })
}

fn read_poly_record(data: &[u8], offset: usize) -> Result<PolyRecord> {
    let record = take(data, offset, POLY_RECORD_SIZE)?;
    Ok(PolyRecord {
        vertex_offset: BigEndian::read_u32(&record[0x00..]) as usize,
        vertex_count: BigEndian::read_u16(&record[0x04..]) as usize,
        vertex_stride: record[0x06] as usize,
        index_offset: BigEndian::read_u32(&record[0x08..]) as usize,
        index_count: BigEndian::read_u16(&record[0x0C..]) as usize,
        material: BigEndian::read_u16(&record[0x0E..]),
    })
}

fn decode_poly(record: &PolyRecord, index_clump: &[u8], vertex_clump: &[u8]) -> Result<NudPoly> {
    if record.vertex_stride < 12 {
        return Err(Error::InvalidNud {
            message: format!("vertex stride {} is below position size", record.vertex_stride),
        });
    }

    let mut positions = Vec::with_capacity(record.vertex_count);
    for v in 0..record.vertex_count {
        let base = record.vertex_offset + v * record.vertex_stride;
        let bytes = take(vertex_clump, base, 12)?;
        positions.push([
            BigEndian::read_f32(&bytes[0..4]),
            BigEndian::read_f32(&bytes[4..8]),
            BigEndian::read_f32(&bytes[8..12]),
        ]);
    }

    let index_bytes = take(index_clump, record.index_offset, record.index_count * 2)?;
    let indices = index_bytes
        .chunks_exact(2)
        .map(BigEndian::read_u16)
        .collect();

    Ok(NudPoly {
        positions,
        indices,
        material: record.material,
    })
}

fn read_name(name_table: &[u8], offset: usize) -> Result<String> {
    let tail = name_table.get(offset..).ok_or_else(|| Error::InvalidNud {
        message: format!("name offset {offset} outside name table"),
    })?;
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::InvalidNud {
            message: format!("unterminated name at offset {offset}"),
        })?;
    Ok(String::from_utf8(tail[..end].to_vec())?)
}

fn read_sphere(bytes: &[u8]) -> [f32; 4] {
    [
        BigEndian::read_f32(&bytes[0..4]),
        BigEndian::read_f32(&bytes[4..8]),
        BigEndian::read_f32(&bytes[8..12]),
        BigEndian::read_f32(&bytes[12..16]),
    ]
}

fn take(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset.checked_add(len).ok_or(Error::UnexpectedEof)?;
    data.get(offset..end).ok_or(Error::UnexpectedEof)
}
