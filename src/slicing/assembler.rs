// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Writes a finished cut back into the two mesh objects

use super::slicer::{CutResult, SlicedMesh};
use crate::error::Result;
use crate::geometry::MeshData;
use crate::lifecycle::MeshObject;
use tracing::debug;

/// Commits cut results on the thread that owns the objects
pub struct MeshAssembler;

impl MeshAssembler {
    /// Main object takes the left half, the child takes the right half
    ///
    /// Nothing is written unless all four result meshes are valid. The
    /// child is moved to the main object's pose and woken up.
    pub fn commit(cut: CutResult, main: &mut MeshObject, child: &mut MeshObject) -> Result<()> {
        let CutResult {
            render, collision, ..
        } = cut;
        for mesh in [&render.left, &render.right, &collision.left, &collision.right] {
            mesh.validate_indices()?;
        }

        let SlicedMesh {
            left: render_left,
            right: render_right,
            ..
        } = render;
        let SlicedMesh {
            left: collision_left,
            right: collision_right,
            ..
        } = collision;

        main.render = render_left;
        main.collision = Self::collider(collision_left);
        child.render = render_right;
        child.collision = Self::collider(collision_right);

        child.pose = main.pose;
        child.active = true;
        child.frozen = false;

        debug!(
            main = %main.name,
            child = %child.name,
            main_triangles = main.render.triangle_count(),
            child_triangles = child.render.triangle_count(),
            "cut committed"
        );
        Ok(())
    }

    fn collider(mut mesh: MeshData) -> MeshData {
        let moved = mesh.collapse_unused_vertices();
        if moved > 0 {
            debug!(moved, "collapsed unreferenced collider vertices");
        }
        mesh
    }
}
