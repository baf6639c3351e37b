// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-shard triangle classification
//!
//! A shard is a contiguous, triangle-aligned range of the index list. Each
//! shard reads the original vertex buffer and writes only into its own
//! [`ShardResult`], so shards never synchronize with each other.

use super::split::split_crossing_triangle;
use crate::error::Result;
use crate::geometry::{Plane, Side, VertexAttributeBuffer, TRIANGLE_INDICES};
use std::ops::Range;

/// Vertex reference emitted by a shard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexRef {
    /// Index into the original buffer, already global
    Existing(usize),
    /// Index into the shard's private `new_vertices`
    Local(usize),
}

/// Triangle index list that remembers which entries are shard-local
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexList {
    pub indices: Vec<usize>,
    /// Positions in `indices` that refer to shard-local vertices
    pub to_adjust: Vec<usize>,
}

impl IndexList {
    pub fn push(&mut self, vertex: VertexRef) {
        match vertex {
            VertexRef::Existing(index) => self.indices.push(index),
            VertexRef::Local(index) => {
                self.to_adjust.push(self.indices.len());
                self.indices.push(index);
            }
        }
    }

    pub fn push_triangle(&mut self, triangle: [VertexRef; 3]) {
        for vertex in triangle {
            self.push(vertex);
        }
    }

    /// Rebase every shard-local entry onto `offset`
    pub fn apply_offset(&mut self, offset: usize) {
        for &position in &self.to_adjust {
            self.indices[position] += offset;
        }
        self.to_adjust.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / TRIANGLE_INDICES
    }
}

/// Private output of one classification worker
#[derive(Debug, Clone, Default)]
pub struct ShardResult {
    pub new_vertices: VertexAttributeBuffer,
    pub left_body: IndexList,
    pub right_body: IndexList,
    pub left_cap: IndexList,
    pub right_cap: IndexList,
    /// Directed cut segments between cap vertices, in local indices
    pub boundary_pairs: Vec<(usize, usize)>,
    pub crossing_count: usize,
}

impl ShardResult {
    pub fn list_mut(&mut self, side: Side, cap: bool) -> &mut IndexList {
        match (side, cap) {
            (Side::Left, false) => &mut self.left_body,
            (Side::Right, false) => &mut self.right_body,
            (Side::Left, true) => &mut self.left_cap,
            (Side::Right, true) => &mut self.right_cap,
        }
    }

    /// Shift every local reference by `offset`
    pub fn apply_offset(&mut self, offset: usize) {
        self.left_body.apply_offset(offset);
        self.right_body.apply_offset(offset);
        self.left_cap.apply_offset(offset);
        self.right_cap.apply_offset(offset);
        for (from, to) in &mut self.boundary_pairs {
            *from += offset;
            *to += offset;
        }
    }
}

/// Split `index_count` indices into at most `shard_count` triangle-aligned ranges
///
/// Trailing shards that would be empty are omitted.
pub fn shard_ranges(index_count: usize, shard_count: usize) -> Vec<Range<usize>> {
    let triangle_count = index_count / TRIANGLE_INDICES;
    if triangle_count == 0 {
        return Vec::new();
    }
    let per_shard = triangle_count.div_ceil(shard_count.max(1)) * TRIANGLE_INDICES;
    let end = triangle_count * TRIANGLE_INDICES;
    (0..end)
        .step_by(per_shard)
        .map(|start| start..(start + per_shard).min(end))
        .collect()
}

/// Classify every triangle of one shard against `plane`
///
/// `indices` must hold whole triangles whose entries are valid for
/// `vertices`. A whole triangle is routed to a cap list when its first
/// vertex carries the section color.
pub fn classify_shard(
    indices: &[usize],
    vertices: &VertexAttributeBuffer,
    plane: &Plane,
) -> Result<ShardResult> {
    let mut result = ShardResult::default();

    for triangle in indices.chunks_exact(TRIANGLE_INDICES) {
        let triangle = [triangle[0], triangle[1], triangle[2]];
        let sides = triangle.map(|index| plane.side(vertices.position(index)));

        if sides.iter().all(|&side| side == sides[0]) {
            let cap = vertices.is_section(triangle[0]);
            result
                .list_mut(sides[0], cap)
                .push_triangle(triangle.map(VertexRef::Existing));
        } else {
            split_crossing_triangle(triangle, sides, vertices, plane, &mut result)?;
            result.crossing_count += 1;
        }
    }

    Ok(result)
}
