// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex attribute storage shared by every stage of the slicer

use crate::error::{Result, SliceError};
use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// RGBA vertex color
pub type Color = [f32; 4];

/// Reserved color marking vertices that belong to a cut cross-section
pub const SECTION_COLOR: Color = [1.0, 1.0, 1.0, 1.0];

/// Default color for vertices of the outer surface
pub const OUTER_COLOR: Color = [0.0, 0.0, 0.0, 1.0];

/// Parallel position/normal/color/UV arrays
///
/// Index `i` names the same logical vertex in every array; every mutating
/// method keeps the four lengths equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexAttributeBuffer {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    colors: Vec<Color>,
    uvs: Vec<Point2<f32>>,
}

impl VertexAttributeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            normals: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            uvs: Vec::with_capacity(count),
        }
    }

    /// Build a buffer from separate arrays
    ///
    /// Positions and normals must match in length. Missing trailing colors
    /// are filled with [`OUTER_COLOR`] and missing UVs with the origin,
    /// extra ones are dropped.
    pub fn from_parts(
        positions: Vec<Point3<f32>>,
        normals: Vec<Vector3<f32>>,
        mut colors: Vec<Color>,
        mut uvs: Vec<Point2<f32>>,
    ) -> Result<Self> {
        if positions.len() != normals.len() {
            return Err(SliceError::AttributeLengthMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        let count = positions.len();
        colors.resize(count, OUTER_COLOR);
        uvs.resize(count, Point2::origin());
        Ok(Self {
            positions,
            normals,
            colors,
            uvs,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append one vertex and return its index
    pub fn push(
        &mut self,
        position: Point3<f32>,
        normal: Vector3<f32>,
        color: Color,
        uv: Point2<f32>,
    ) -> usize {
        let index = self.positions.len();
        self.positions.push(position);
        self.normals.push(normal);
        self.colors.push(color);
        self.uvs.push(uv);
        index
    }

    /// Append every vertex of `other`
    pub fn append(&mut self, other: &Self) {
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.colors.extend_from_slice(&other.colors);
        self.uvs.extend_from_slice(&other.uvs);
    }

    pub fn position(&self, index: usize) -> &Point3<f32> {
        &self.positions[index]
    }

    pub fn normal(&self, index: usize) -> &Vector3<f32> {
        &self.normals[index]
    }

    pub fn color(&self, index: usize) -> &Color {
        &self.colors[index]
    }

    pub fn uv(&self, index: usize) -> &Point2<f32> {
        &self.uvs[index]
    }

    pub fn set_position(&mut self, index: usize, position: Point3<f32>) {
        self.positions[index] = position;
    }

    pub fn set_normal(&mut self, index: usize, normal: Vector3<f32>) {
        self.normals[index] = normal;
    }

    pub fn set_uv(&mut self, index: usize, uv: Point2<f32>) {
        self.uvs[index] = uv;
    }

    /// Whether vertex `index` carries the cross-section marker color
    pub fn is_section(&self, index: usize) -> bool {
        self.colors[index] == SECTION_COLOR
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn uvs(&self) -> &[Point2<f32>] {
        &self.uvs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VertexAttributeBuffer {
        let mut buffer = VertexAttributeBuffer::new();
        buffer.push(Point3::new(0.0, 0.0, 0.0), Vector3::z(), OUTER_COLOR, Point2::new(0.0, 0.0));
        buffer.push(Point3::new(1.0, 0.0, 0.0), Vector3::z(), SECTION_COLOR, Point2::new(1.0, 0.0));
        buffer
    }

    #[test]
    fn test_from_parts_pads_colors_and_uvs() {
        let buffer = VertexAttributeBuffer::from_parts(
            vec![Point3::origin(), Point3::new(1.0, 1.0, 1.0)],
            vec![Vector3::x(), Vector3::y()],
            vec![],
            vec![Point2::new(0.5, 0.5)],
        )
        .unwrap();

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.colors(), &[OUTER_COLOR, OUTER_COLOR]);
        assert_eq!(buffer.uv(1), &Point2::origin());
    }

    #[test]
    fn test_from_parts_rejects_mismatched_normals() {
        let result = VertexAttributeBuffer::from_parts(
            vec![Point3::origin()],
            vec![],
            vec![],
            vec![],
        );
        assert!(matches!(
            result,
            Err(SliceError::AttributeLengthMismatch { positions: 1, normals: 0 })
        ));
    }

    #[test]
    fn test_append_keeps_arrays_aligned() {
        let mut buffer = sample();
        let other = sample();
        buffer.append(&other);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.normals().len(), 4);
        assert_eq!(buffer.colors().len(), 4);
        assert_eq!(buffer.uvs().len(), 4);
        assert!(buffer.is_section(3));
        assert_eq!(buffer.uv(3), &Point2::new(1.0, 0.0));
    }
}
