// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cut lifecycle: objects, their state machine and the tick scheduler

mod arena;
mod dissector;
mod object;
mod task;

pub use arena::{ObjectArena, ObjectId};
pub use dissector::{CutRequest, Dissector, LifecycleEvent};
pub use object::{CutPhase, CutState, MeshObject};
pub use task::SliceTask;
