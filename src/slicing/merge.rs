// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Fork-join shard execution and deterministic merging using rayon

use super::cap::BoundaryLoop;
use super::shard::{classify_shard, shard_ranges, ShardResult};
use crate::error::Result;
use crate::geometry::{MeshData, Plane, VertexAttributeBuffer};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::debug;

/// Merged output of all shards of one mesh
#[derive(Debug, Clone)]
pub struct MergedSlice {
    /// Original vertices followed by every shard's new vertices
    pub vertices: VertexAttributeBuffer,
    pub left_body: Vec<usize>,
    pub right_body: Vec<usize>,
    pub left_cap: Vec<usize>,
    pub right_cap: Vec<usize>,
    pub boundary: BoundaryLoop,
    /// Index of the first vertex created by this cut
    pub first_new_vertex: usize,
    pub crossing_count: usize,
}

/// Runs the shard workers of one mesh on a pool and joins their results
pub struct ShardMerger<'a> {
    pool: &'a ThreadPool,
    shard_count: usize,
}

impl<'a> ShardMerger<'a> {
    pub fn new(pool: &'a ThreadPool, shard_count: usize) -> Self {
        Self { pool, shard_count }
    }

    /// Classify `mesh` against `plane` in parallel and merge in shard order
    pub fn run(&self, mesh: &MeshData, plane: &Plane) -> Result<MergedSlice> {
        let indices = mesh.combined_indices();
        let shards = self.fork_join(&indices, &mesh.vertices, plane)?;
        Ok(Self::merge(mesh.vertices.clone(), shards))
    }

    /// Run one worker per shard and wait for all of them
    ///
    /// Results come back in shard order regardless of completion order.
    /// The first failing shard fails the whole round.
    pub fn fork_join(
        &self,
        indices: &[usize],
        vertices: &VertexAttributeBuffer,
        plane: &Plane,
    ) -> Result<Vec<ShardResult>> {
        let ranges = shard_ranges(indices.len(), self.shard_count);
        debug!(
            shards = ranges.len(),
            triangles = indices.len() / 3,
            "classifying shards"
        );

        self.pool.install(|| {
            ranges
                .into_par_iter()
                .map(|range| classify_shard(&indices[range], vertices, plane))
                .collect::<Result<Vec<_>>>()
        })
    }

    /// Concatenate shard outputs onto `vertices`, rebasing local indices
    pub fn merge(mut vertices: VertexAttributeBuffer, shards: Vec<ShardResult>) -> MergedSlice {
        let first_new_vertex = vertices.len();
        let mut merged = MergedSlice {
            vertices: VertexAttributeBuffer::new(),
            left_body: Vec::new(),
            right_body: Vec::new(),
            left_cap: Vec::new(),
            right_cap: Vec::new(),
            boundary: BoundaryLoop::new(),
            first_new_vertex,
            crossing_count: 0,
        };

        let mut offset = first_new_vertex;
        for mut shard in shards {
            shard.apply_offset(offset);

            merged.left_body.append(&mut shard.left_body.indices);
            merged.right_body.append(&mut shard.right_body.indices);
            merged.left_cap.append(&mut shard.left_cap.indices);
            merged.right_cap.append(&mut shard.right_cap.indices);
            for (from, to) in shard.boundary_pairs {
                merged.boundary.insert(from, to);
            }
            merged.crossing_count += shard.crossing_count;

            vertices.append(&shard.new_vertices);
            offset += shard.new_vertices.len();
        }

        merged.vertices = vertices;
        merged
    }
}
