// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Dissect mesh slicing engine
//!
//! Cuts closed triangle meshes along arbitrary planes into two sealed
//! halves. Triangle classification runs in parallel shards, the
//! cross-section is capped with a fan, and a tick-driven lifecycle hands
//! the halves to pre-spawned objects without blocking the caller.

pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod lifecycle;
pub mod slicing;
pub mod trigger;

pub use config::SlicingConfig;
pub use error::{Result, SliceError};
pub use geometry::{MeshData, Plane, Primitive, Side, VertexAttributeBuffer};
pub use io::export_gltf;
pub use lifecycle::{CutPhase, CutRequest, Dissector, LifecycleEvent, MeshObject, ObjectId};
pub use slicing::{CutResult, SlicedMesh, Slicer};
pub use trigger::ImpactTrigger;

/// Cut a mesh once on a temporary pool
pub fn slice_mesh(mesh: &MeshData, plane: &Plane, shard_count: usize) -> Result<SlicedMesh> {
    Slicer::new(shard_count)?.slice(mesh, plane)
}
