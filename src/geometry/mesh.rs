// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation: one vertex buffer, a body submesh and a cap submesh

use super::{BoundingBox, VertexAttributeBuffer};
use crate::error::{Result, SliceError};
use serde::{Deserialize, Serialize};

/// Number of indices per triangle
pub const TRIANGLE_INDICES: usize = 3;

/// Triangular mesh split into the outer surface (`body`) and the sealed
/// cross-sections of earlier cuts (`cap`)
///
/// Both index lists are flat triples into `vertices`; winding decides the
/// face direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: VertexAttributeBuffer,
    pub body: Vec<usize>,
    pub cap: Vec<usize>,
}

impl MeshData {
    pub fn new(vertices: VertexAttributeBuffer, body: Vec<usize>, cap: Vec<usize>) -> Self {
        Self {
            vertices,
            body,
            cap,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn body_triangle_count(&self) -> usize {
        self.body.len() / TRIANGLE_INDICES
    }

    pub fn cap_triangle_count(&self) -> usize {
        self.cap.len() / TRIANGLE_INDICES
    }

    pub fn triangle_count(&self) -> usize {
        self.body_triangle_count() + self.cap_triangle_count()
    }

    /// Body indices followed by cap indices, the order the slicer consumes
    pub fn combined_indices(&self) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.body.len() + self.cap.len());
        indices.extend_from_slice(&self.body);
        indices.extend_from_slice(&self.cap);
        indices
    }

    /// Check that both lists hold whole triangles and stay inside the buffer
    pub fn validate_indices(&self) -> Result<()> {
        let len = self.vertices.len();
        for list in [&self.body, &self.cap] {
            if list.len() % TRIANGLE_INDICES != 0 {
                return Err(SliceError::MalformedTriangleList(list.len()));
            }
            if let Some(&index) = list.iter().find(|&&index| index >= len) {
                return Err(SliceError::IndexOutOfRange { index, len });
            }
        }
        Ok(())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.positions())
    }

    /// Move every vertex no triangle references onto the first referenced one
    ///
    /// Collision meshes built as convex hulls read every vertex in the
    /// buffer, so stale vertices from earlier cuts have to be folded away.
    /// Returns the number of vertices moved.
    pub fn collapse_unused_vertices(&mut self) -> usize {
        let Some(&anchor) = self.body.first().or_else(|| self.cap.first()) else {
            return 0;
        };
        let mut used = vec![false; self.vertices.len()];
        for &index in self.body.iter().chain(self.cap.iter()) {
            used[index] = true;
        }

        let target = *self.vertices.position(anchor);
        let mut moved = 0;
        for (index, referenced) in used.into_iter().enumerate() {
            if !referenced {
                self.vertices.set_position(index, target);
                moved += 1;
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::OUTER_COLOR;
    use nalgebra::{Point2, Point3, Vector3};

    fn quad_with_stray_vertex() -> MeshData {
        let mut vertices = VertexAttributeBuffer::new();
        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(9.0, 9.0, 9.0),
        ] {
            vertices.push(p, Vector3::z(), OUTER_COLOR, Point2::origin());
        }
        MeshData::new(vertices, vec![0, 1, 2], vec![0, 2, 3])
    }

    #[test]
    fn test_validate_indices() {
        let mut mesh = quad_with_stray_vertex();
        assert!(mesh.validate_indices().is_ok());

        mesh.cap.push(7);
        assert!(matches!(
            mesh.validate_indices(),
            Err(SliceError::MalformedTriangleList(4))
        ));

        mesh.cap.extend_from_slice(&[1, 2]);
        assert!(matches!(
            mesh.validate_indices(),
            Err(SliceError::IndexOutOfRange { index: 7, len: 5 })
        ));
    }

    #[test]
    fn test_combined_indices_put_body_first() {
        let mesh = quad_with_stray_vertex();
        assert_eq!(mesh.combined_indices(), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_collapse_unused_vertices() {
        let mut mesh = quad_with_stray_vertex();
        assert_eq!(mesh.collapse_unused_vertices(), 1);
        assert_eq!(mesh.vertices.position(4), &Point3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.vertices.position(2), &Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_collapse_on_empty_mesh_is_noop() {
        let mut mesh = MeshData::empty();
        assert_eq!(mesh.collapse_unused_vertices(), 0);
    }
}
