// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Closed primitive meshes used as cut targets

use super::{MeshData, VertexAttributeBuffer, OUTER_COLOR};
use nalgebra::{Point2, Point3, Vector3};
use std::f32::consts::PI;

/// Geometric primitives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Cube { size: Vector3<f32>, center: bool },
    Sphere { r: f32, segments: u32 },
}

impl Primitive {
    pub fn cube(size: Vector3<f32>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn sphere(r: f32, segments: u32) -> Self {
        let segments = if segments >= 3 { segments } else { 32 };
        Self::Sphere { r, segments }
    }

    /// Generate the mesh; every face lands in the body submesh
    pub fn to_mesh(&self) -> MeshData {
        match self {
            Self::Cube { size, center } => generate_cube_mesh(*size, *center),
            Self::Sphere { r, segments } => generate_sphere_mesh(*r, *segments),
        }
    }
}

fn generate_cube_mesh(size: Vector3<f32>, center: bool) -> MeshData {
    let min = if center {
        Point3::from(-size / 2.0)
    } else {
        Point3::origin()
    };
    let max = min + size;

    // 8 corners of the cube
    let positions = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];

    // 6 faces as counter-clockwise quads seen from outside
    let faces = [
        ([4, 5, 6, 7], Vector3::new(0.0, 0.0, 1.0)),
        ([1, 0, 3, 2], Vector3::new(0.0, 0.0, -1.0)),
        ([5, 1, 2, 6], Vector3::new(1.0, 0.0, 0.0)),
        ([0, 4, 7, 3], Vector3::new(-1.0, 0.0, 0.0)),
        ([7, 6, 2, 3], Vector3::new(0.0, 1.0, 0.0)),
        ([0, 1, 5, 4], Vector3::new(0.0, -1.0, 0.0)),
    ];
    let corner_uvs = [
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];

    let mut vertices = VertexAttributeBuffer::with_capacity(24);
    let mut body = Vec::with_capacity(36);
    for (corners, normal) in faces {
        let base = vertices.len();
        for (corner, uv) in corners.iter().zip(corner_uvs) {
            vertices.push(positions[*corner], normal, OUTER_COLOR, uv);
        }
        body.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::new(vertices, body, Vec::new())
}

fn generate_sphere_mesh(radius: f32, segments: u32) -> MeshData {
    let stacks = segments as usize;
    let slices = segments as usize;
    let mut vertices = VertexAttributeBuffer::with_capacity((stacks + 1) * (slices + 1));

    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        let y = radius * phi.cos();
        let r = radius * phi.sin();

        for j in 0..=slices {
            let theta = 2.0 * PI * j as f32 / slices as f32;
            let position = Point3::new(r * theta.cos(), y, r * theta.sin());
            let normal = position.coords.normalize();
            let uv = Point2::new(j as f32 / slices as f32, 1.0 - i as f32 / stacks as f32);
            vertices.push(position, normal, OUTER_COLOR, uv);
        }
    }

    // Quads between rings; the pole rows only get their non-degenerate half
    let mut body = Vec::with_capacity(stacks * slices * 6);
    for i in 0..stacks {
        for j in 0..slices {
            let first = i * (slices + 1) + j;
            let second = first + slices + 1;

            if i != 0 {
                body.extend_from_slice(&[first, first + 1, second]);
            }
            if i != stacks - 1 {
                body.extend_from_slice(&[second, first + 1, second + 1]);
            }
        }
    }

    MeshData::new(vertices, body, Vec::new())
}
