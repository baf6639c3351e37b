// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Sliceable objects and their cut state

use super::arena::ObjectId;
use super::task::SliceTask;
use crate::geometry::MeshData;
use nalgebra::Isometry3;
use std::fmt;
use std::time::Duration;

/// Where an object stands in the cut cycle
#[derive(Debug)]
pub enum CutState {
    /// Waiting out the cooldown before the clone is spawned
    Preparing { remaining: Duration },
    /// Clone spawned, cuts accepted
    Armed { clone: ObjectId },
    /// A cut is being computed
    Slicing { clone: ObjectId, task: SliceTask },
    /// Results are being written back
    Applying,
    /// Hidden clone waiting to receive a half
    Dormant,
    /// Cut budget used up
    Finalized,
}

impl CutState {
    pub fn phase(&self) -> CutPhase {
        match self {
            Self::Preparing { .. } => CutPhase::Preparing,
            Self::Armed { .. } => CutPhase::Armed,
            Self::Slicing { .. } => CutPhase::Slicing,
            Self::Applying => CutPhase::Applying,
            Self::Dormant => CutPhase::Dormant,
            Self::Finalized => CutPhase::Finalized,
        }
    }
}

/// Payload-free view of [`CutState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutPhase {
    Preparing,
    Armed,
    Slicing,
    Applying,
    Dormant,
    Finalized,
}

impl fmt::Display for CutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preparing => "preparing",
            Self::Armed => "armed",
            Self::Slicing => "slicing",
            Self::Applying => "applying",
            Self::Dormant => "dormant",
            Self::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// An object that can be cut, with its render and collision meshes
#[derive(Debug)]
pub struct MeshObject {
    pub name: String,
    pub render: MeshData,
    pub collision: MeshData,
    /// Cuts applied to this object's lineage so far
    pub slices: u32,
    pub state: CutState,
    pub pose: Isometry3<f32>,
    pub active: bool,
    /// Excluded from physics simulation
    pub frozen: bool,
}

impl MeshObject {
    /// Visible object at the origin, ready as soon as its state is advanced
    pub fn new(name: impl Into<String>, render: MeshData, collision: MeshData) -> Self {
        Self {
            name: name.into(),
            render,
            collision,
            slices: 0,
            state: CutState::Preparing {
                remaining: Duration::ZERO,
            },
            pose: Isometry3::identity(),
            active: true,
            frozen: false,
        }
    }

    /// Turn into a hidden, frozen, dormant object at `pose`
    pub fn hidden_at(mut self, pose: Isometry3<f32>) -> Self {
        self.pose = pose;
        self.active = false;
        self.frozen = true;
        self.state = CutState::Dormant;
        self
    }

    /// Copy of this object to pre-spawn as the receiver of a cut
    pub fn dormant_clone(&self, pose: Isometry3<f32>) -> Self {
        let mut clone = Self::new(
            format!("{}.clone", self.name),
            self.render.clone(),
            self.collision.clone(),
        )
        .hidden_at(pose);
        clone.slices = self.slices;
        clone
    }

    pub fn phase(&self) -> CutPhase {
        self.state.phase()
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, CutState::Armed { .. })
    }
}
