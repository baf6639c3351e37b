// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GLTF/GLB exporter
//!
//! One mesh with a body primitive and, when present, a cap primitive.
//! Both share the `POSITION`, `NORMAL`, `COLOR_0` and `TEXCOORD_0`
//! accessors and differ only in their index accessor.

use crate::geometry::MeshData;
use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const TRIANGLES: u32 = 4;

/// How the binary payload is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GltfLayout {
    /// Single `.glb` container
    Binary,
    /// `.gltf` JSON next to a `.bin` file
    Separate,
    /// `.gltf` JSON with the buffer inlined as a base64 data URI
    Embedded,
}

impl GltfLayout {
    /// `.glb` paths become binary containers, anything else separate files
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("glb") => Self::Binary,
            _ => Self::Separate,
        }
    }
}

/// Export mesh to GLTF or GLB format, chosen by extension
pub fn export(mesh: &MeshData, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    export_with_layout(mesh, path, GltfLayout::from_path(path))
}

pub fn export_with_layout(mesh: &MeshData, path: impl AsRef<Path>, layout: GltfLayout) -> Result<()> {
    let path = path.as_ref();
    if mesh.triangle_count() == 0 {
        bail!("Cannot export {:?}: mesh has no triangles", path);
    }
    mesh.validate_indices()
        .with_context(|| format!("Cannot export {:?}", path))?;

    match layout {
        GltfLayout::Binary => export_glb(mesh, path),
        GltfLayout::Separate => export_gltf_separate(mesh, path),
        GltfLayout::Embedded => export_gltf_embedded(mesh, path),
    }
}

/// Export mesh to GLB (binary GLTF)
fn export_glb(mesh: &MeshData, path: &Path) -> Result<()> {
    let (buffer_data, layout) = write_buffer(mesh);
    let gltf_json_val = create_gltf_json(mesh, &layout, buffer_data.len(), None);

    let json_string = serde_json::to_string(&gltf_json_val)?;
    let json_offset = align_to_multiple_of_four(json_string.len());
    let json_padding = json_offset - json_string.len();

    let buffer_offset = align_to_multiple_of_four(buffer_data.len());
    let buffer_padding = buffer_offset - buffer_data.len();

    let total_length = 12 + 8 + json_offset + 8 + buffer_offset;

    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
    );

    // GLB header
    file.write_all(&0x46546C67u32.to_le_bytes())?; // magic: "glTF"
    file.write_all(&2u32.to_le_bytes())?; // version
    file.write_all(&(total_length as u32).to_le_bytes())?;

    // JSON chunk
    file.write_all(&(json_offset as u32).to_le_bytes())?;
    file.write_all(&0x4E4F534Au32.to_le_bytes())?; // type: "JSON"
    file.write_all(json_string.as_bytes())?;
    file.write_all(&vec![b' '; json_padding])?;

    // BIN chunk
    file.write_all(&(buffer_offset as u32).to_le_bytes())?;
    file.write_all(&0x004E4942u32.to_le_bytes())?; // type: "BIN\0"
    file.write_all(&buffer_data)?;
    file.write_all(&vec![0; buffer_padding])?;

    file.flush()?;
    Ok(())
}

/// Export mesh to GLTF with separate .bin file
fn export_gltf_separate(mesh: &MeshData, path: &Path) -> Result<()> {
    let (buffer_data, layout) = write_buffer(mesh);
    let bin_path = path.with_extension("bin");
    let uri = bin_path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid buffer path derived from {:?}", path))?
        .to_string();
    let gltf_json_val = create_gltf_json(mesh, &layout, buffer_data.len(), Some(uri));

    let json_string = serde_json::to_string_pretty(&gltf_json_val)?;
    std::fs::write(path, json_string).with_context(|| format!("Failed to write {:?}", path))?;
    std::fs::write(&bin_path, buffer_data)
        .with_context(|| format!("Failed to write {:?}", bin_path))?;

    Ok(())
}

fn export_gltf_embedded(mesh: &MeshData, path: &Path) -> Result<()> {
    let (buffer_data, layout) = write_buffer(mesh);
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        STANDARD.encode(&buffer_data)
    );
    let gltf_json_val = create_gltf_json(mesh, &layout, buffer_data.len(), Some(uri));

    let json_string = serde_json::to_string_pretty(&gltf_json_val)?;
    std::fs::write(path, json_string).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

/// Byte range of one buffer view
#[derive(Debug, Clone, Copy)]
struct View {
    offset: usize,
    length: usize,
}

/// Placement of every attribute and index list inside the binary buffer
#[derive(Debug)]
struct BufferLayout {
    positions: View,
    normals: View,
    colors: View,
    uvs: View,
    /// Non-empty index lists with their submesh name and index count
    submeshes: Vec<(&'static str, View, usize)>,
}

fn write_buffer(mesh: &MeshData) -> (Vec<u8>, BufferLayout) {
    let vertices = &mesh.vertices;
    let mut buffer_data = Vec::with_capacity(vertices.len() * 48 + (mesh.body.len() + mesh.cap.len()) * 4);

    let positions = write_view(&mut buffer_data, |buffer| {
        for p in vertices.positions() {
            extend_f32(buffer, &[p.x, p.y, p.z]);
        }
    });
    let normals = write_view(&mut buffer_data, |buffer| {
        for n in vertices.normals() {
            extend_f32(buffer, &[n.x, n.y, n.z]);
        }
    });
    let colors = write_view(&mut buffer_data, |buffer| {
        for color in vertices.colors() {
            extend_f32(buffer, color);
        }
    });
    let uvs = write_view(&mut buffer_data, |buffer| {
        for uv in vertices.uvs() {
            extend_f32(buffer, &[uv.x, uv.y]);
        }
    });
    let submeshes = [("body", &mesh.body), ("cap", &mesh.cap)]
        .into_iter()
        .filter(|(_, indices)| !indices.is_empty())
        .map(|(name, indices)| {
            let view = write_view(&mut buffer_data, |buffer| extend_indices(buffer, indices));
            (name, view, indices.len())
        })
        .collect();

    let layout = BufferLayout {
        positions,
        normals,
        colors,
        uvs,
        submeshes,
    };
    (buffer_data, layout)
}

fn write_view(buffer: &mut Vec<u8>, write: impl FnOnce(&mut Vec<u8>)) -> View {
    let offset = buffer.len();
    write(buffer);
    View {
        offset,
        length: buffer.len() - offset,
    }
}

fn extend_f32(buffer: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        buffer.extend_from_slice(&value.to_le_bytes());
    }
}

fn extend_indices(buffer: &mut Vec<u8>, indices: &[usize]) {
    for &index in indices {
        buffer.extend_from_slice(&(index as u32).to_le_bytes());
    }
}

fn create_gltf_json(
    mesh: &MeshData,
    layout: &BufferLayout,
    byte_length: usize,
    uri: Option<String>,
) -> Value {
    let vertex_count = mesh.vertex_count();
    let bbox = mesh.bounding_box();

    let mut views = vec![
        buffer_view(layout.positions, ARRAY_BUFFER),
        buffer_view(layout.normals, ARRAY_BUFFER),
        buffer_view(layout.colors, ARRAY_BUFFER),
        buffer_view(layout.uvs, ARRAY_BUFFER),
    ];

    let mut accessors = vec![
        json!({
            "bufferView": 0,
            "byteOffset": 0,
            "componentType": FLOAT,
            "count": vertex_count,
            "type": "VEC3",
            "min": [bbox.min.x, bbox.min.y, bbox.min.z],
            "max": [bbox.max.x, bbox.max.y, bbox.max.z]
        }),
        accessor(1, FLOAT, vertex_count, "VEC3"),
        accessor(2, FLOAT, vertex_count, "VEC4"),
        accessor(3, FLOAT, vertex_count, "VEC2"),
    ];

    let attributes = json!({
        "POSITION": 0,
        "NORMAL": 1,
        "COLOR_0": 2,
        "TEXCOORD_0": 3
    });
    let mut primitives = Vec::with_capacity(layout.submeshes.len());
    for &(name, view, count) in &layout.submeshes {
        // Views and accessors are numbered in lockstep
        let index = accessors.len();
        views.push(buffer_view(view, ELEMENT_ARRAY_BUFFER));
        accessors.push(accessor(index, UNSIGNED_INT, count, "SCALAR"));
        primitives.push(json!({
            "attributes": attributes,
            "indices": index,
            "mode": TRIANGLES,
            "extras": { "submesh": name }
        }));
    }

    let mut buffer = json!({ "byteLength": byte_length });
    if let Some(uri) = uri {
        buffer["uri"] = Value::String(uri);
    }

    json!({
        "asset": {
            "generator": "dissect",
            "version": "2.0"
        },
        "scene": 0,
        "scenes": [
            {
                "nodes": [0]
            }
        ],
        "nodes": [
            {
                "mesh": 0
            }
        ],
        "meshes": [
            {
                "primitives": primitives
            }
        ],
        "accessors": accessors,
        "bufferViews": views,
        "buffers": [buffer]
    })
}

fn buffer_view(view: View, target: u32) -> Value {
    json!({
        "buffer": 0,
        "byteOffset": view.offset,
        "byteLength": view.length,
        "target": target
    })
}

fn accessor(view: usize, component_type: u32, count: usize, kind: &str) -> Value {
    json!({
        "bufferView": view,
        "byteOffset": 0,
        "componentType": component_type,
        "count": count,
        "type": kind
    })
}

fn align_to_multiple_of_four(n: usize) -> usize {
    (n + 3) & !3
}
