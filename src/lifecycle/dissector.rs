// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tick-driven cut scheduler
//!
//! Objects move through `Preparing → Armed → Slicing → Applying` and back
//! to `Preparing` until their lineage reaches the cut budget. All object
//! mutation happens inside [`Dissector::tick`] and [`Dissector::request_cut`]
//! on the caller's thread; only the cut computation runs in the background.

use super::arena::{ObjectArena, ObjectId};
use super::object::{CutPhase, CutState, MeshObject};
use super::task::SliceTask;
use crate::config::SlicingConfig;
use crate::error::{Result, SliceError};
use crate::geometry::{MeshData, Plane};
use crate::slicing::{CutResult, MeshAssembler, Slicer};
use crate::trigger::ImpactTrigger;
use nalgebra::{Isometry3, Point3, Vector3};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a cut request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutRequest {
    /// The cut is being computed
    Started,
    /// The object was not armed; nothing happened
    Ignored,
}

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Armed { object: ObjectId, clone: ObjectId },
    CutStarted { object: ObjectId, plane: Plane },
    CutApplied { object: ObjectId, child: ObjectId, slices: u32 },
    CutFailed { object: ObjectId, reason: String },
    Finalized { object: ObjectId },
}

/// Owns every sliceable object and drives their cut cycles
pub struct Dissector {
    arena: ObjectArena,
    config: SlicingConfig,
    slicer: Arc<Slicer>,
    trigger: ImpactTrigger,
    /// Events raised outside `tick`, reported by the next tick
    pending: Vec<LifecycleEvent>,
}

impl Dissector {
    pub fn new(config: SlicingConfig) -> Result<Self> {
        config.validate()?;
        let slicer = Arc::new(Slicer::from_config(&config)?);
        Ok(Self {
            arena: ObjectArena::new(),
            trigger: ImpactTrigger::from_config(&config),
            config,
            slicer,
            pending: Vec::new(),
        })
    }

    pub fn config(&self) -> &SlicingConfig {
        &self.config
    }

    pub fn arena(&self) -> &ObjectArena {
        &self.arena
    }

    pub fn object(&self, id: ObjectId) -> Option<&MeshObject> {
        self.arena.get(id)
    }

    pub fn phase(&self, id: ObjectId) -> Option<CutPhase> {
        self.arena.get(id).map(MeshObject::phase)
    }

    /// Add a visible object that arms once the cooldown has elapsed
    pub fn spawn_object(
        &mut self,
        name: impl Into<String>,
        render: MeshData,
        collision: MeshData,
        pose: Isometry3<f32>,
    ) -> ObjectId {
        let mut object = MeshObject::new(name, render, collision);
        object.pose = pose;
        object.state = CutState::Preparing {
            remaining: self.config.cooldown(),
        };
        let id = self.arena.insert(object);
        debug!(object = %id, "object spawned");
        id
    }

    /// Start cutting an armed object
    ///
    /// Requests on objects that are not armed are ignored. A degenerate
    /// plane is rejected and the object stays armed.
    pub fn request_cut(&mut self, id: ObjectId, plane: Plane) -> Result<CutRequest> {
        let slicer = Arc::clone(&self.slicer);
        let object = self.arena.get_mut(id).ok_or(SliceError::UnknownObject(id))?;
        let CutState::Armed { clone } = object.state else {
            debug!(object = %id, phase = %object.phase(), "cut request ignored");
            return Ok(CutRequest::Ignored);
        };
        plane.validate()?;

        let task = SliceTask::spawn(
            slicer,
            object.render.clone(),
            object.collision.clone(),
            plane,
        );
        object.state = CutState::Slicing { clone, task };
        info!(object = %id, ?plane, "cut started");
        self.pending.push(LifecycleEvent::CutStarted { object: id, plane });
        Ok(CutRequest::Started)
    }

    /// Cut an object where it was struck, if the impact is fast enough
    pub fn handle_impact(
        &mut self,
        id: ObjectId,
        velocity: &Vector3<f32>,
        contact: &Point3<f32>,
    ) -> Result<CutRequest> {
        match self.trigger.plane_for_impact(velocity, contact) {
            Some(plane) => self.request_cut(id, plane),
            None => Ok(CutRequest::Ignored),
        }
    }

    /// True while any cut is still being computed
    pub fn has_pending_cuts(&self) -> bool {
        self.arena
            .iter()
            .any(|(_, object)| object.phase() == CutPhase::Slicing)
    }

    /// Advance cooldowns, arm objects and apply finished cuts
    ///
    /// Each object takes at most one step per tick; a child that received
    /// its half during this tick starts its cooldown on the next one.
    pub fn tick(&mut self, dt: Duration) -> Vec<LifecycleEvent> {
        let mut events = std::mem::take(&mut self.pending);
        let mut stepped = HashSet::new();
        let ids: Vec<ObjectId> = self.arena.ids().collect();
        for id in ids {
            if !stepped.insert(id) {
                continue;
            }
            let Some(object) = self.arena.get_mut(id) else {
                continue;
            };
            match &mut object.state {
                CutState::Preparing { remaining } => {
                    *remaining = remaining.saturating_sub(dt);
                    if remaining.is_zero() {
                        events.push(self.arm(id));
                    }
                }
                CutState::Slicing { task, .. } => {
                    if let Some(result) = task.poll() {
                        if let Some(child) = self.finish_cut(id, result, &mut events) {
                            stepped.insert(child);
                        }
                    }
                }
                _ => {}
            }
        }
        events
    }

    fn arm(&mut self, id: ObjectId) -> LifecycleEvent {
        let position = self.config.child_position();
        let pose = Isometry3::translation(position.x, position.y, position.z);
        let clone = match self.arena.get(id) {
            Some(object) => object.dormant_clone(pose),
            None => return LifecycleEvent::Finalized { object: id },
        };
        let clone = self.arena.insert(clone);
        if let Some(object) = self.arena.get_mut(id) {
            object.state = CutState::Armed { clone };
        }
        debug!(object = %id, clone = %clone, "object armed");
        LifecycleEvent::Armed { object: id, clone }
    }

    /// Apply or roll back a finished cut; returns the child that received a half
    fn finish_cut(
        &mut self,
        id: ObjectId,
        result: Result<CutResult>,
        events: &mut Vec<LifecycleEvent>,
    ) -> Option<ObjectId> {
        let object = self.arena.get_mut(id)?;
        let CutState::Slicing { clone, .. } = std::mem::replace(&mut object.state, CutState::Applying)
        else {
            return None;
        };

        let applied = match result {
            Ok(cut) => self.apply(id, clone, cut),
            Err(err) => Err(err),
        };
        match applied {
            Ok(slices) => {
                info!(object = %id, child = %clone, slices, "cut applied");
                events.push(LifecycleEvent::CutApplied {
                    object: id,
                    child: clone,
                    slices,
                });
                if slices >= self.config.max_slices {
                    info!(object = %id, child = %clone, "cut budget exhausted");
                    events.push(LifecycleEvent::Finalized { object: id });
                    events.push(LifecycleEvent::Finalized { object: clone });
                }
                Some(clone)
            }
            Err(err) => {
                warn!(object = %id, error = %err, "cut failed");
                if let Some(object) = self.arena.get_mut(id) {
                    object.state = CutState::Armed { clone };
                }
                events.push(LifecycleEvent::CutFailed {
                    object: id,
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    /// Commit `cut` and move both objects to their next state
    fn apply(&mut self, id: ObjectId, clone: ObjectId, cut: CutResult) -> Result<u32> {
        let (main, child) = self
            .arena
            .get_pair_mut(id, clone)
            .ok_or(SliceError::UnknownObject(clone))?;
        MeshAssembler::commit(cut, main, child)?;

        main.slices += 1;
        child.slices = main.slices;
        let finalized = main.slices >= self.config.max_slices;
        let cooldown = self.config.cooldown();
        let next = || {
            if finalized {
                CutState::Finalized
            } else {
                CutState::Preparing {
                    remaining: cooldown,
                }
            }
        };
        child.state = next();
        main.state = next();
        Ok(main.slices)
    }
}
