// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Cutting plane and side classification

use crate::error::{Result, SliceError};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Epsilon below which a normal is zero, and below which the sine of the
/// angle between an edge and the plane treats the edge as parallel
const EPS: f32 = 1e-6;

/// Side of a cutting plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// `s <= 0`; exactly coplanar points land here
    Left,
    /// `s > 0`
    Right,
}

/// Plane `Ax + By + Cz + D = 0`
///
/// The coefficients are not normalized; classification only depends on
/// the sign of the signed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    /// Create a plane, rejecting a zero or non-finite normal
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Result<Self> {
        let plane = Self { a, b, c, d };
        plane.validate()?;
        Ok(plane)
    }

    /// Plane through `point` with the given normal (`D = -n·p`)
    pub fn from_normal_and_point(normal: &Vector3<f32>, point: &Point3<f32>) -> Result<Self> {
        Self::new(normal.x, normal.y, normal.z, -normal.dot(&point.coords))
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.a, self.b, self.c, self.d].iter().all(|v| v.is_finite());
        if !finite {
            return Err(SliceError::InvalidPlane(format!(
                "non-finite coefficients ({}, {}, {}, {})",
                self.a, self.b, self.c, self.d
            )));
        }
        if self.normal().norm_squared() < EPS * EPS {
            return Err(SliceError::InvalidPlane("zero normal vector".into()));
        }
        Ok(())
    }

    /// Normal vector `(A, B, C)`, not normalized
    pub fn normal(&self) -> Vector3<f32> {
        Vector3::new(self.a, self.b, self.c)
    }

    pub fn unit_normal(&self) -> Vector3<f32> {
        self.normal().normalize()
    }

    /// `A·x + B·y + C·z + D`
    pub fn signed_value(&self, point: &Point3<f32>) -> f32 {
        self.a * point.x + self.b * point.y + self.c * point.z + self.d
    }

    pub fn is_on_plane(&self, point: &Point3<f32>) -> bool {
        self.signed_value(point) == 0.0
    }

    pub fn is_left(&self, point: &Point3<f32>) -> bool {
        self.signed_value(point) < 0.0 || self.is_on_plane(point)
    }

    pub fn is_right(&self, point: &Point3<f32>) -> bool {
        self.signed_value(point) > 0.0
    }

    pub fn side(&self, point: &Point3<f32>) -> Side {
        if self.is_left(point) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Intersection of the line through `p0` and `p1` with the plane
    ///
    /// Fails with [`SliceError::InvalidPlane`] when the edge runs parallel
    /// to the plane. The test is relative to the lengths of the normal and
    /// the edge, so scaling the coefficients never changes the outcome.
    pub fn intersect_edge(&self, p0: &Point3<f32>, p1: &Point3<f32>) -> Result<Point3<f32>> {
        let direction = p1 - p0;
        let denom = self.normal().dot(&direction);
        if denom.abs() <= EPS * self.normal().norm() * direction.norm() {
            return Err(SliceError::InvalidPlane(format!(
                "edge {:?} -> {:?} is parallel to the plane",
                p0, p1
            )));
        }
        let t = -self.signed_value(p0) / denom;
        Ok(p0 + direction * t)
    }

}
