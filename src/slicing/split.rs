// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Splitting of triangles that straddle the cutting plane

use super::shard::{ShardResult, VertexRef};
use crate::error::Result;
use crate::geometry::{Plane, Side, VertexAttributeBuffer, SECTION_COLOR};
use nalgebra::{Point2, Point3, Vector3};

/// Split a crossing triangle into one minority and two majority triangles
///
/// The triangle is rotated (winding kept) until the lone vertex sits in
/// the middle, giving `(m0, lone, m1)`. The plane hits `m0 → lone` at `n0`
/// and `m1 → lone` at `n1`; sub-triangles are `(n0, lone, n1)` for the
/// minority side and `(m0, n0, m1)`, `(m1, n0, n1)` for the majority side.
///
/// Four vertices are appended to the shard: `n0` and `n1` carrying the
/// lone vertex's normal and color for the body faces, then section-colored
/// copies of both for the cap, linked as one directed boundary segment.
pub(crate) fn split_crossing_triangle(
    mut triangle: [usize; 3],
    mut sides: [Side; 3],
    vertices: &VertexAttributeBuffer,
    plane: &Plane,
    out: &mut ShardResult,
) -> Result<()> {
    while !(sides[0] != sides[1] && sides[1] != sides[2]) {
        triangle.rotate_left(1);
        sides.rotate_left(1);
    }
    let [m0, lone, m1] = triangle;
    let majority = sides[0];
    let minority = sides[1];

    let lone_position = vertices.position(lone);
    let p0 = plane.intersect_edge(vertices.position(m0), lone_position)?;
    let p1 = plane.intersect_edge(vertices.position(m1), lone_position)?;

    let normal = *vertices.normal(lone);
    let color = *vertices.color(lone);
    let cap = vertices.is_section(lone);

    let uv0 = interpolate_uv(vertices, m0, lone, &p0);
    let uv1 = interpolate_uv(vertices, m1, lone, &p1);
    let n0 = out.new_vertices.push(p0, normal, color, uv0);
    let n1 = out.new_vertices.push(p1, normal, color, uv1);

    let (m0, lone, m1) = (
        VertexRef::Existing(m0),
        VertexRef::Existing(lone),
        VertexRef::Existing(m1),
    );
    let (n0, n1) = (VertexRef::Local(n0), VertexRef::Local(n1));

    let majority_list = out.list_mut(majority, cap);
    majority_list.push_triangle([m0, n0, m1]);
    majority_list.push_triangle([m1, n0, n1]);
    out.list_mut(minority, cap).push_triangle([n0, lone, n1]);

    let c0 = out
        .new_vertices
        .push(p0, Vector3::zeros(), SECTION_COLOR, Point2::origin());
    let c1 = out
        .new_vertices
        .push(p1, Vector3::zeros(), SECTION_COLOR, Point2::origin());
    let segment = match majority {
        Side::Left => (c1, c0),
        Side::Right => (c0, c1),
    };
    out.boundary_pairs.push(segment);

    Ok(())
}

/// UV of a point on the edge `from → to`, by distance ratio along the edge
fn interpolate_uv(
    vertices: &VertexAttributeBuffer,
    from: usize,
    to: usize,
    point: &Point3<f32>,
) -> Point2<f32> {
    let start = *vertices.position(from);
    let ratio = (point - start).norm() / (vertices.position(to) - start).norm();
    let uv_from = *vertices.uv(from);
    uv_from + (vertices.uv(to) - uv_from) * ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::OUTER_COLOR;
    use crate::slicing::shard::classify_shard;
    use approx::assert_relative_eq;

    fn crossing_buffer() -> VertexAttributeBuffer {
        let mut vertices = VertexAttributeBuffer::new();
        let red = [1.0, 0.0, 0.0, 1.0];
        vertices.push(Point3::new(-2.0, 0.0, 0.0), Vector3::z(), red, Point2::new(0.0, 0.0));
        vertices.push(Point3::new(2.0, 0.0, 0.0), Vector3::z(), OUTER_COLOR, Point2::new(1.0, 0.0));
        vertices.push(Point3::new(2.0, 2.0, 0.0), Vector3::z(), OUTER_COLOR, Point2::new(1.0, 1.0));
        vertices
    }

    #[test]
    fn test_single_crossing_triangle() {
        let vertices = crossing_buffer();
        let plane = Plane::new(1.0, 0.0, 0.0, 0.0).unwrap();
        let result = classify_shard(&[0, 1, 2], &vertices, &plane).unwrap();

        assert_eq!(result.crossing_count, 1);
        assert_eq!(result.new_vertices.len(), 4);
        assert_relative_eq!(*result.new_vertices.position(0), Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(*result.new_vertices.position(1), Point3::new(0.0, 0.0, 0.0));

        // A is alone on the left: (n0, A, n1)
        assert_eq!(result.left_body.indices, vec![0, 0, 1]);
        assert_eq!(result.left_body.to_adjust, vec![0, 2]);
        // Quad C, n0, B, n1 on the right
        assert_eq!(result.right_body.indices, vec![2, 0, 1, 1, 0, 1]);
        assert_eq!(result.right_body.to_adjust, vec![1, 4, 5]);
        // Right is the majority
        assert_eq!(result.boundary_pairs, vec![(2, 3)]);
    }

    #[test]
    fn test_new_vertices_inherit_lone_attributes() {
        let vertices = crossing_buffer();
        let plane = Plane::new(1.0, 0.0, 0.0, 0.0).unwrap();
        let result = classify_shard(&[0, 1, 2], &vertices, &plane).unwrap();
        let new = &result.new_vertices;

        assert_eq!(new.color(0), &[1.0, 0.0, 0.0, 1.0]);
        assert_eq!(new.normal(1), &Vector3::z());
        // Halfway along C -> A and B -> A
        assert_relative_eq!(*new.uv(0), Point2::new(0.5, 0.5), epsilon = 1e-6);
        assert_relative_eq!(*new.uv(1), Point2::new(0.5, 0.0), epsilon = 1e-6);

        assert!(new.is_section(2) && new.is_section(3));
        assert_eq!(new.normal(2), &Vector3::zeros());
        assert_eq!(new.position(2), new.position(0));
        assert_eq!(new.position(3), new.position(1));
    }

    #[test]
    fn test_split_preserves_winding() {
        let vertices = crossing_buffer();
        let plane = Plane::new(1.0, 0.0, 0.0, 0.0).unwrap();
        let result = classify_shard(&[0, 1, 2], &vertices, &plane).unwrap();

        let position = |list: &[usize], adjust: &[usize], k: usize| {
            if adjust.contains(&k) {
                *result.new_vertices.position(list[k])
            } else {
                *vertices.position(list[k])
            }
        };
        let face_z = |list: &[usize], adjust: &[usize], t: usize| {
            let a = position(list, adjust, t * 3);
            let b = position(list, adjust, t * 3 + 1);
            let c = position(list, adjust, t * 3 + 2);
            (b - a).cross(&(c - a)).z
        };

        // Source triangle is counter-clockwise around +z
        let left = &result.left_body;
        let right = &result.right_body;
        assert!(face_z(&left.indices, &left.to_adjust, 0) > 0.0);
        assert!(face_z(&right.indices, &right.to_adjust, 0) > 0.0);
        assert!(face_z(&right.indices, &right.to_adjust, 1) > 0.0);
    }

    #[test]
    fn test_left_majority_reverses_segment() {
        let mut vertices = VertexAttributeBuffer::new();
        for p in [[-1.0, -1.0, 1.0], [1.0, 0.0, 1.0], [-1.0, 1.0, 1.0]] {
            vertices.push(Point3::from(p), Vector3::z(), OUTER_COLOR, Point2::origin());
        }
        let plane = Plane::new(1.0, 0.0, 0.0, 0.0).unwrap();
        let result = classify_shard(&[0, 1, 2], &vertices, &plane).unwrap();

        assert_eq!(result.left_body.triangle_count(), 2);
        assert_eq!(result.right_body.triangle_count(), 1);
        assert_eq!(result.boundary_pairs, vec![(3, 2)]);
    }

    #[test]
    fn test_section_colored_lone_vertex_routes_to_cap() {
        let mut vertices = VertexAttributeBuffer::new();
        for p in [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [1.0, 1.0, 0.0]] {
            vertices.push(Point3::from(p), Vector3::zeros(), SECTION_COLOR, Point2::origin());
        }
        let plane = Plane::new(1.0, 0.0, 0.0, 0.0).unwrap();
        let result = classify_shard(&[0, 1, 2], &vertices, &plane).unwrap();

        assert!(result.left_body.indices.is_empty());
        assert!(result.right_body.indices.is_empty());
        assert_eq!(result.left_cap.triangle_count(), 1);
        assert_eq!(result.right_cap.triangle_count(), 2);
    }
}
