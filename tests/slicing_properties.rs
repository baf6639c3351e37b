// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric properties of complete cuts

use anyhow::Result;
use approx::assert_relative_eq;
use dissect::geometry::{MeshData, Plane, Primitive, VertexAttributeBuffer, OUTER_COLOR};
use dissect::Slicer;
use nalgebra::{Point2, Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Volume enclosed by a closed mesh, positive for outward winding
fn signed_volume(mesh: &MeshData) -> f64 {
    mesh.combined_indices()
        .chunks_exact(3)
        .map(|t| {
            let p = |i: usize| mesh.vertices.position(t[i]).cast::<f64>().coords;
            p(0).dot(&p(1).cross(&p(2))) / 6.0
        })
        .sum()
}

fn cube() -> MeshData {
    Primitive::cube(Vector3::new(2.0, 2.0, 2.0), true).to_mesh()
}

#[test]
fn test_concrete_scenario() -> Result<()> {
    let mut vertices = VertexAttributeBuffer::new();
    for p in [[-2.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 2.0, 0.0]] {
        vertices.push(Point3::from(p), Vector3::z(), OUTER_COLOR, Point2::origin());
    }
    let mesh = MeshData::new(vertices, vec![0, 1, 2], Vec::new());
    let plane = Plane::new(1.0, 0.0, 0.0, 0.0)?;

    let sliced = Slicer::new(1)?.slice(&mesh, &plane)?;

    assert_eq!(sliced.crossing_count, 1);
    assert_eq!(sliced.left.body_triangle_count(), 1);
    assert_eq!(sliced.right.body_triangle_count(), 2);
    // Two body vertices plus their cap copies
    assert_eq!(sliced.left.vertex_count(), 3 + 4);

    let left = &sliced.left;
    assert_eq!(left.body[1], 0, "lone vertex A keeps its place");
    assert_relative_eq!(*left.vertices.position(left.body[0]), Point3::new(0.0, 1.0, 0.0));
    assert_relative_eq!(*left.vertices.position(left.body[2]), Point3::new(0.0, 0.0, 0.0));
    Ok(())
}

#[test]
fn test_triangle_conservation_and_index_validity() -> Result<()> {
    let slicer = Slicer::new(4)?;
    let mesh = Primitive::sphere(1.0, 24).to_mesh();
    let original = mesh.body_triangle_count();

    for plane in [
        Plane::new(1.0, 0.0, 0.0, 0.0)?,
        Plane::new(0.0, 1.0, 0.0, -0.7)?,
        Plane::new(1.0, 1.0, 1.0, 0.3)?,
    ] {
        let sliced = slicer.slice(&mesh, &plane)?;
        sliced.left.validate_indices()?;
        sliced.right.validate_indices()?;

        let body = sliced.left.body_triangle_count() + sliced.right.body_triangle_count();
        assert_eq!(body, original - sliced.crossing_count + 3 * sliced.crossing_count);
        assert_eq!(
            sliced.left.vertex_count(),
            mesh.vertex_count() + 4 * sliced.crossing_count
        );
    }
    Ok(())
}

#[test]
fn test_plane_outside_mesh_changes_nothing() -> Result<()> {
    let slicer = Slicer::new(3)?;
    let mesh = cube();

    let below = slicer.slice(&mesh, &Plane::new(0.0, 0.0, 1.0, 10.0)?)?;
    assert!(below.is_noop());
    assert_eq!(below.right, mesh);
    assert_eq!(below.left.triangle_count(), 0);

    let above = slicer.slice(&mesh, &Plane::new(0.0, 0.0, 1.0, -10.0)?)?;
    assert_eq!(above.left, mesh);
    assert_eq!(above.right.triangle_count(), 0);
    Ok(())
}

#[test]
fn test_caps_close_both_halves() -> Result<()> {
    let slicer = Slicer::new(4)?;
    let mesh = cube();
    assert_relative_eq!(signed_volume(&mesh), 8.0, epsilon = 1e-5);

    for offset in [-0.5f32, 0.0, 0.3] {
        let plane = Plane::new(1.0, 0.0, 0.0, -offset)?;
        let sliced = slicer.slice(&mesh, &plane)?;

        let expected_left = 4.0 * (f64::from(offset) + 1.0);
        assert_relative_eq!(signed_volume(&sliced.left), expected_left, epsilon = 1e-4);
        assert_relative_eq!(signed_volume(&sliced.right), 8.0 - expected_left, epsilon = 1e-4);
    }
    Ok(())
}

#[test]
fn test_cap_attributes() -> Result<()> {
    let slicer = Slicer::new(2)?;
    let plane = Plane::new(0.0, 3.0, 4.0, -1.0)?;
    let sliced = slicer.slice(&Primitive::sphere(2.0, 20).to_mesh(), &plane)?;
    let unit = Vector3::new(0.0, 0.6, 0.8);

    assert!(!sliced.boundary.is_empty());
    for index in sliced.boundary.vertices() {
        assert!(index >= sliced.first_new_vertex);
        let uv = sliced.left.vertices.uv(index);
        assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        assert!(sliced.left.vertices.is_section(index));
        assert_relative_eq!(*sliced.left.vertices.normal(index), unit, epsilon = 1e-6);
        assert_relative_eq!(*sliced.right.vertices.normal(index), -unit, epsilon = 1e-6);
    }
    Ok(())
}

#[test]
fn test_shard_count_does_not_change_output() -> Result<()> {
    let mesh = Primitive::sphere(1.0, 18).to_mesh();
    let plane = Plane::new(0.4, -1.0, 0.2, 0.1)?;
    let reference = Slicer::new(1)?.slice(&mesh, &plane)?;

    for shards in 2..=8 {
        let sliced = Slicer::new(shards)?.slice(&mesh, &plane)?;
        assert_eq!(sliced.crossing_count, reference.crossing_count);
        assert_eq!(sliced.left, reference.left, "left half differs with {shards} shards");
        assert_eq!(sliced.right, reference.right, "right half differs with {shards} shards");
    }
    Ok(())
}

#[test]
fn test_recutting_routes_old_cap_to_cap_lists() -> Result<()> {
    let slicer = Slicer::new(4)?;
    let first = slicer.slice(&cube(), &Plane::new(1.0, 0.0, 0.0, 0.0)?)?;
    let piece = first.left;

    let second = slicer.slice(&piece, &Plane::new(0.0, 1.0, 0.0, -0.1)?)?;
    for half in [&second.left, &second.right] {
        let vertices = &half.vertices;
        assert!(half.body.iter().all(|&i| !vertices.is_section(i)));
        assert!(half.cap.iter().all(|&i| vertices.is_section(i)));
    }

    // Fragments of the first cap on top of the new fan
    let fan = second.boundary.len() - 1;
    assert!(second.left.cap_triangle_count() > fan);
    assert!(second.right.cap_triangle_count() > fan);

    // Quarter of the cube below y = 0.1 on the x < 0 side
    assert_relative_eq!(signed_volume(&second.left), 2.2, epsilon = 1e-4);
    Ok(())
}

#[test]
fn test_random_planes_keep_volume() -> Result<()> {
    let slicer = Slicer::new(4)?;
    let mesh = Primitive::sphere(1.0, 24).to_mesh();
    let total = signed_volume(&mesh);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..25 {
        let normal = Vector3::new(
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
            rng.gen_range(-1.0f32..1.0),
        );
        if normal.norm() < 1e-2 {
            continue;
        }
        let point = Point3::new(
            rng.gen_range(-0.5f32..0.5),
            rng.gen_range(-0.5f32..0.5),
            rng.gen_range(-0.5f32..0.5),
        );
        let plane = Plane::from_normal_and_point(&normal, &point)?;
        let sliced = slicer.slice(&mesh, &plane)?;

        let left = signed_volume(&sliced.left);
        let right = signed_volume(&sliced.right);
        assert!(left > -1e-4 && right > -1e-4, "negative volume for {plane:?}");
        assert_relative_eq!(left + right, total, epsilon = 1e-3);
    }
    Ok(())
}

#[test]
fn test_near_parallel_edge_fails_the_cut() -> Result<()> {
    let mut vertices = VertexAttributeBuffer::new();
    for p in [[-1e-8, 0.0, 0.0], [1e-8, 0.0, 0.0], [0.0, 1.0, 1.0]] {
        vertices.push(Point3::from(p), Vector3::z(), OUTER_COLOR, Point2::origin());
    }
    let mesh = MeshData::new(vertices, vec![0, 1, 2], Vec::new());
    let result = Slicer::new(1)?.slice(&mesh, &Plane::new(1.0, 0.0, 0.0, 0.0)?);
    assert!(matches!(result, Err(dissect::SliceError::InvalidPlane(_))));
    Ok(())
}

#[test]
fn test_plane_scale_does_not_change_output() -> Result<()> {
    let slicer = Slicer::new(4)?;
    let mesh = Primitive::sphere(1.0, 32).to_mesh();

    for (a, b, c, d) in [(1.0f32, 0.0, 0.0, -0.1), (0.5, 1.0, -0.25, 0.2)] {
        let reference = slicer.slice(&mesh, &Plane::new(a, b, c, d)?)?;
        assert!(reference.crossing_count > 0);

        // Powers of two keep every scaled product exact
        for k in [2f32.powi(-17), 2f32.powi(-12), 2f32.powi(12)] {
            let scaled = Plane::new(k * a, k * b, k * c, k * d)?;
            let sliced = slicer.slice(&mesh, &scaled)?;
            assert_eq!(sliced.crossing_count, reference.crossing_count);
            assert_eq!(sliced.left, reference.left, "left half differs at scale {k}");
            assert_eq!(sliced.right, reference.right, "right half differs at scale {k}");
        }
    }
    Ok(())
}
