// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Background cut computation with a pollable result

use crate::error::{Result, SliceError};
use crate::geometry::{MeshData, Plane};
use crate::slicing::{CutResult, Slicer};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use tracing::debug;

/// Handle to one in-flight cut
///
/// The cut runs on the slicer's pool; the owner polls once per tick.
#[derive(Debug)]
pub struct SliceTask {
    receiver: Receiver<Result<CutResult>>,
}

impl SliceTask {
    /// Start cutting both meshes of an object by `plane`
    pub fn spawn(slicer: Arc<Slicer>, render: MeshData, collision: MeshData, plane: Plane) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker = Arc::clone(&slicer);
        slicer.pool().spawn(move || {
            let result = worker.cut(&render, &collision, &plane);
            if sender.send(result).is_err() {
                debug!("cut finished after its task handle was dropped");
            }
        });
        Self { receiver }
    }

    #[cfg(test)]
    pub(crate) fn from_receiver(receiver: Receiver<Result<CutResult>>) -> Self {
        Self { receiver }
    }

    /// Result of the cut once it is done, `None` while it is still running
    pub fn poll(&self) -> Option<Result<CutResult>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SliceError::WorkerLost)),
        }
    }
}
