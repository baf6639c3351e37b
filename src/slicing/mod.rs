// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Plane slicing pipeline
//!
//! Triangles are classified in parallel shards ([`shard`]), crossing
//! triangles are split ([`split`]), shard outputs are merged in order
//! ([`merge`]), the cross-section is sealed ([`cap`]) and the halves are
//! written back to their objects ([`assembler`]).

pub mod assembler;
pub mod cap;
pub mod merge;
pub mod shard;
mod slicer;
mod split;

pub use assembler::MeshAssembler;
pub use cap::{BoundaryLoop, CapTriangulator};
pub use merge::{MergedSlice, ShardMerger};
pub use shard::{classify_shard, shard_ranges, IndexList, ShardResult, VertexRef};
pub use slicer::{CutResult, SlicedMesh, Slicer};
