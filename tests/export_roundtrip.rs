// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! glTF export of sliced meshes

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use dissect::io::{self, GltfLayout};
use dissect::{Plane, Primitive, Slicer};
use nalgebra::Vector3;
use serde_json::Value;
use tempfile::TempDir;

fn sliced_cube() -> Result<dissect::SlicedMesh> {
    let mesh = Primitive::cube(Vector3::new(10.0, 10.0, 10.0), true).to_mesh();
    let plane = Plane::new(1.0, 1.0, 0.0, -1.0)?;
    Ok(Slicer::new(2)?.slice(&mesh, &plane)?)
}

fn read_json(path: &std::path::Path) -> Result<Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

#[test]
fn test_half_exports_body_and_cap_primitives() -> Result<()> {
    let sliced = sliced_cube()?;
    let dir = TempDir::new()?;
    let path = dir.path().join("left.gltf");
    io::export_gltf(&sliced.left, &path)?;

    let json = read_json(&path)?;
    let primitives = json["meshes"][0]["primitives"]
        .as_array()
        .expect("primitives array");
    assert_eq!(primitives.len(), 2);
    assert_eq!(primitives[0]["extras"]["submesh"], "body");
    assert_eq!(primitives[1]["extras"]["submesh"], "cap");
    for attribute in ["POSITION", "NORMAL", "COLOR_0", "TEXCOORD_0"] {
        assert!(primitives[0]["attributes"][attribute].is_u64(), "missing {attribute}");
    }

    let accessors = json["accessors"].as_array().expect("accessors array");
    let vertex_count = sliced.left.vertex_count() as u64;
    assert_eq!(accessors[0]["count"], vertex_count);
    assert_eq!(accessors[2]["type"], "VEC4");
    assert_eq!(accessors[3]["type"], "VEC2");

    let body = primitives[0]["indices"].as_u64().expect("body indices") as usize;
    let cap = primitives[1]["indices"].as_u64().expect("cap indices") as usize;
    assert_eq!(accessors[body]["count"], sliced.left.body.len() as u64);
    assert_eq!(accessors[cap]["count"], sliced.left.cap.len() as u64);

    // Attributes: 12 + 12 + 16 + 8 bytes per vertex, then 4 bytes per index
    let indices = (sliced.left.body.len() + sliced.left.cap.len()) as u64;
    let bin = std::fs::metadata(dir.path().join("left.bin"))?;
    assert_eq!(bin.len(), vertex_count * 48 + indices * 4);
    Ok(())
}

#[test]
fn test_embedded_buffer_decodes() -> Result<()> {
    let sliced = sliced_cube()?;
    let dir = TempDir::new()?;
    let path = dir.path().join("right.gltf");
    io::export_gltf_with_layout(&sliced.right, &path, GltfLayout::Embedded)?;

    let json = read_json(&path)?;
    let uri = json["buffers"][0]["uri"].as_str().expect("data uri");
    let payload = uri
        .strip_prefix("data:application/octet-stream;base64,")
        .expect("base64 data uri");
    let bytes = STANDARD.decode(payload)?;
    assert_eq!(json["buffers"][0]["byteLength"], bytes.len() as u64);

    // First position in the buffer is vertex 0
    let x = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_eq!(x, sliced.right.vertices.position(0).x);
    assert!(!dir.path().join("right.bin").exists());
    Ok(())
}

#[test]
fn test_glb_chunks_are_aligned() -> Result<()> {
    let sliced = sliced_cube()?;
    let dir = TempDir::new()?;
    let path = dir.path().join("left.glb");
    io::export_gltf(&sliced.left, &path)?;

    let bytes = std::fs::read(&path)?;
    assert_eq!(&bytes[0..4], b"glTF");
    let json_length = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
    assert_eq!(json_length % 4, 0);
    assert_eq!(&bytes[16..20], b"JSON");

    let json: Value = serde_json::from_slice(&bytes[20..20 + json_length])?;
    assert!(json["buffers"][0].get("uri").is_none());
    let bin_header = 20 + json_length;
    assert_eq!(&bytes[bin_header + 4..bin_header + 8], b"BIN\0");
    Ok(())
}
