// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Turns a blade impact into a cutting plane

use crate::config::SlicingConfig;
use crate::geometry::Plane;
use nalgebra::{Point3, Vector3};
use tracing::trace;

/// Builds cutting planes from impact velocity and contact point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactTrigger {
    pub min_impact_speed: f32,
    pub main_axis: Vector3<f32>,
}

impl ImpactTrigger {
    pub fn new(min_impact_speed: f32, main_axis: Vector3<f32>) -> Self {
        Self {
            min_impact_speed,
            main_axis,
        }
    }

    pub fn from_config(config: &SlicingConfig) -> Self {
        Self::new(config.min_impact_speed, config.main_axis())
    }

    /// Plane through `contact` spanned by the blade axis and the swing direction
    ///
    /// `None` when the impact is too slow, or when the swing runs along the
    /// blade axis and no plane is defined.
    pub fn plane_for_impact(&self, velocity: &Vector3<f32>, contact: &Point3<f32>) -> Option<Plane> {
        let speed = velocity.norm();
        if speed < self.min_impact_speed {
            trace!(speed, "impact below cutting speed");
            return None;
        }
        let normal = self.main_axis.cross(velocity).try_normalize(f32::EPSILON)?;
        Plane::from_normal_and_point(&normal, contact).ok()
    }
}

impl Default for ImpactTrigger {
    fn default() -> Self {
        Self::from_config(&SlicingConfig::default())
    }
}
