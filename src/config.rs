// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Slicing configuration system

use crate::error::SliceError;
use anyhow::{Context, Result};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up by [`SlicingConfig::load`]
pub const CONFIG_FILE: &str = "dissect.toml";

/// Slicing and cut lifecycle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicingConfig {
    /// Parallel classification shards per fork-join round
    pub shard_count: usize,
    /// Delay before a fresh or freshly cut object accepts a cut
    pub cooldown_ms: u64,
    /// Maximum cuts per lineage
    pub max_slices: u32,
    /// Slowest impact that still triggers a cut
    pub min_impact_speed: f32,
    /// Where pre-spawned clones wait until they receive a half
    pub child_position: [f32; 3],
    /// Axis crossed with the impact velocity to orient the cutting plane
    pub main_axis: [f32; 3],
}

impl Default for SlicingConfig {
    fn default() -> Self {
        Self {
            shard_count: 4,
            cooldown_ms: 1000,
            max_slices: 2,
            min_impact_speed: 1.0,
            child_position: [4.0, 0.0, 4.0],
            main_axis: [0.0, 1.0, 0.0],
        }
    }
}

impl SlicingConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: SlicingConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `dissect.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DISSECT_SHARD_COUNT`, `DISSECT_COOLDOWN_MS` and `DISSECT_MAX_SLICES`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("DISSECT_SHARD_COUNT") {
            self.shard_count = value
                .parse()
                .with_context(|| format!("Invalid DISSECT_SHARD_COUNT: {value:?}"))?;
        }

        if let Ok(value) = std::env::var("DISSECT_COOLDOWN_MS") {
            self.cooldown_ms = value
                .parse()
                .with_context(|| format!("Invalid DISSECT_COOLDOWN_MS: {value:?}"))?;
        }

        if let Ok(value) = std::env::var("DISSECT_MAX_SLICES") {
            self.max_slices = value
                .parse()
                .with_context(|| format!("Invalid DISSECT_MAX_SLICES: {value:?}"))?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), SliceError> {
        if self.shard_count == 0 {
            return Err(SliceError::InvalidConfig("shard_count must be at least 1".into()));
        }
        if self.max_slices == 0 {
            return Err(SliceError::InvalidConfig("max_slices must be at least 1".into()));
        }
        if !self.min_impact_speed.is_finite() || self.min_impact_speed < 0.0 {
            return Err(SliceError::InvalidConfig(format!(
                "min_impact_speed must be a non-negative number, got {}",
                self.min_impact_speed
            )));
        }
        if Vector3::from(self.main_axis).norm_squared() == 0.0 {
            return Err(SliceError::InvalidConfig("main_axis must not be zero".into()));
        }
        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn child_position(&self) -> Point3<f32> {
        Point3::from(self.child_position)
    }

    pub fn main_axis(&self) -> Vector3<f32> {
        Vector3::from(self.main_axis)
    }
}
