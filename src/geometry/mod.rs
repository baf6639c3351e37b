// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - vertex buffers, meshes, planes

mod bbox;
mod mesh;
mod plane;
mod primitives;
mod vertex_buffer;

pub use bbox::BoundingBox;
pub use mesh::{MeshData, TRIANGLE_INDICES};
pub use plane::{Plane, Side};
pub use primitives::Primitive;
pub use vertex_buffer::{Color, VertexAttributeBuffer, OUTER_COLOR, SECTION_COLOR};
