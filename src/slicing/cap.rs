// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Sealing the cross-section: boundary loop, fan triangulation, cap UVs

use crate::geometry::{BoundingBox, VertexAttributeBuffer};
use nalgebra::Vector3;
use std::collections::btree_map::{self, BTreeMap};

/// Directed cut segments around the cross-section, keyed by start vertex
///
/// Each key has exactly one successor. Keys are global vertex indices, so
/// iteration order (and with it the fan anchor) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryLoop {
    edges: BTreeMap<usize, usize>,
}

impl BoundaryLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record segment `from → to`; returns the previous successor of `from`, if any
    pub fn insert(&mut self, from: usize, to: usize) -> Option<usize> {
        self.edges.insert(from, to)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Fan apex: the first boundary vertex
    pub fn anchor(&self) -> Option<usize> {
        self.edges.keys().next().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, usize, usize> {
        self.edges.iter()
    }

    /// Every vertex on the loop, segment starts and ends alike
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().flat_map(|(&from, &to)| [from, to])
    }
}

/// Fan triangulation and attribute assignment for cut caps
pub struct CapTriangulator;

impl CapTriangulator {
    /// Fan-triangulate the loop from its anchor
    ///
    /// Returns `(left, right)` index lists: `(anchor, a, b)` for the left
    /// cap and `(anchor, b, a)` for the right one, for every segment
    /// `a → b` not starting at the anchor. Only star-shaped loops are
    /// sealed correctly.
    pub fn triangulate(boundary: &BoundaryLoop) -> (Vec<usize>, Vec<usize>) {
        let Some(anchor) = boundary.anchor() else {
            return (Vec::new(), Vec::new());
        };

        let capacity = boundary.len().saturating_sub(1) * 3;
        let mut left = Vec::with_capacity(capacity);
        let mut right = Vec::with_capacity(capacity);
        for (&a, &b) in boundary.iter().filter(|&(&a, _)| a != anchor) {
            left.extend_from_slice(&[anchor, a, b]);
            right.extend_from_slice(&[anchor, b, a]);
        }
        (left, right)
    }

    /// Planar UVs for every loop vertex from the box around the new vertices
    ///
    /// The box spans `first_new_vertex..vertices.len()`; see
    /// [`BoundingBox::planar_uv`] for the projection.
    pub fn project_uvs(
        vertices: &mut VertexAttributeBuffer,
        boundary: &BoundaryLoop,
        first_new_vertex: usize,
    ) {
        if boundary.is_empty() {
            return;
        }
        let bbox = BoundingBox::from_points(&vertices.positions()[first_new_vertex..]);
        for index in boundary.vertices() {
            let uv = bbox.planar_uv(vertices.position(index));
            vertices.set_uv(index, uv);
        }
    }

    /// Point every loop vertex's normal along `normal`
    pub fn assign_normals(
        vertices: &mut VertexAttributeBuffer,
        boundary: &BoundaryLoop,
        normal: Vector3<f32>,
    ) {
        for index in boundary.vertices() {
            vertices.set_normal(index, normal);
        }
    }
}
