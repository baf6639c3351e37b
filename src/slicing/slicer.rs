// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end plane cut of one mesh: classify, merge, seal

use super::cap::{BoundaryLoop, CapTriangulator};
use super::merge::{MergedSlice, ShardMerger};
use crate::config::SlicingConfig;
use crate::error::{Result, SliceError};
use crate::geometry::{MeshData, Plane};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::{debug, error};

/// Both halves of one mesh after a cut
#[derive(Debug, Clone)]
pub struct SlicedMesh {
    /// Geometry with `s <= 0`, cap facing along the plane normal
    pub left: MeshData,
    /// Geometry with `s > 0`, cap facing against the plane normal
    pub right: MeshData,
    pub boundary: BoundaryLoop,
    pub crossing_count: usize,
    pub first_new_vertex: usize,
}

impl SlicedMesh {
    /// True when the plane missed the mesh and nothing was split
    pub fn is_noop(&self) -> bool {
        self.crossing_count == 0
    }
}

/// Render and collision cuts of one object by the same plane
#[derive(Debug, Clone)]
pub struct CutResult {
    pub plane: Plane,
    pub render: SlicedMesh,
    pub collision: SlicedMesh,
}

/// Owns the shard worker pool and runs complete cuts on it
pub struct Slicer {
    pool: ThreadPool,
    shard_count: usize,
}

impl Slicer {
    /// Create a slicer with one pool thread per shard
    pub fn new(shard_count: usize) -> Result<Self> {
        if shard_count == 0 {
            return Err(SliceError::InvalidConfig(
                "shard count must be at least 1".into(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(shard_count)
            .thread_name(|index| format!("dissect-shard-{index}"))
            .panic_handler(|_| error!("slicing worker panicked"))
            .build()?;
        Ok(Self { pool, shard_count })
    }

    pub fn from_config(config: &SlicingConfig) -> Result<Self> {
        Self::new(config.shard_count)
    }

    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }

    /// Cut `mesh` by `plane` and seal both halves
    pub fn slice(&self, mesh: &MeshData, plane: &Plane) -> Result<SlicedMesh> {
        plane.validate()?;
        mesh.validate_indices()?;

        let start = Instant::now();
        let MergedSlice {
            mut vertices,
            left_body,
            right_body,
            mut left_cap,
            mut right_cap,
            boundary,
            first_new_vertex,
            crossing_count,
        } = ShardMerger::new(&self.pool, self.shard_count).run(mesh, plane)?;

        let (left_fan, right_fan) = CapTriangulator::triangulate(&boundary);
        left_cap.extend(left_fan);
        right_cap.extend(right_fan);
        CapTriangulator::project_uvs(&mut vertices, &boundary, first_new_vertex);

        let normal = plane.unit_normal();
        let mut left_vertices = vertices.clone();
        CapTriangulator::assign_normals(&mut left_vertices, &boundary, normal);
        let mut right_vertices = vertices;
        CapTriangulator::assign_normals(&mut right_vertices, &boundary, -normal);

        let sliced = SlicedMesh {
            left: MeshData::new(left_vertices, left_body, left_cap),
            right: MeshData::new(right_vertices, right_body, right_cap),
            boundary,
            crossing_count,
            first_new_vertex,
        };

        debug!(
            crossing = crossing_count,
            left_triangles = sliced.left.triangle_count(),
            right_triangles = sliced.right.triangle_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "mesh sliced"
        );

        Ok(sliced)
    }

    /// Cut an object's render and collision meshes, one fork-join round each
    pub fn cut(&self, render: &MeshData, collision: &MeshData, plane: &Plane) -> Result<CutResult> {
        let render = self.slice(render, plane)?;
        let collision = self.slice(collision, plane)?;
        Ok(CutResult {
            plane: *plane,
            render,
            collision,
        })
    }
}
