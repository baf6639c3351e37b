// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - exporting sliced meshes

mod export_gltf;

pub use export_gltf::{export as export_gltf, export_with_layout as export_gltf_with_layout, GltfLayout};
