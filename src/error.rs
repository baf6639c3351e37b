// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for slicing and the cut lifecycle

use crate::lifecycle::ObjectId;
use thiserror::Error;

/// Errors produced by the slicing pipeline and the cut lifecycle
#[derive(Debug, Error)]
pub enum SliceError {
    /// The plane has a zero normal, or an edge runs parallel to it where a crossing was expected
    #[error("invalid cutting plane: {0}")]
    InvalidPlane(String),

    #[error("vertex attribute arrays differ in length: {positions} positions, {normals} normals")]
    AttributeLengthMismatch { positions: usize, normals: usize },

    #[error("triangle list references vertex {index} but the buffer holds {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("triangle list length {0} is not a multiple of 3")]
    MalformedTriangleList(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown mesh object {0}")]
    UnknownObject(ObjectId),

    /// A slicing worker went away without reporting a result
    #[error("slicing worker terminated without a result")]
    WorkerLost,

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SliceError>;
