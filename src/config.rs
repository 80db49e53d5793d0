// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Tiling configuration

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// How the cleanup stage detects non-manifold edges.
///
/// Excess triangles are discarded in triangle order, so the result is
/// deterministic for a given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NonManifoldRule {
    /// An undirected edge may be used by at most two kept triangles.
    #[default]
    EdgeValence,
    /// Valence limit plus winding: a triangle is also discarded when it
    /// traverses an edge in the same direction as an already-kept triangle.
    EdgeValenceAndWinding,
}

/// Parameters for one tiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilingConfig {
    /// Maximum octree depth; a node at this depth is a leaf regardless of
    /// its triangle count.
    pub max_depth: u8,
    /// A node at or below this triangle count is not split further.
    pub triangle_threshold: usize,
    /// Vertices closer than this distance are merged during cleanup.
    pub merge_distance: f64,
    /// Half-width of the "on plane" band when classifying corners against a
    /// splitting plane.
    pub plane_epsilon: f64,
    /// Triangles with area at or below this are dropped during cleanup.
    pub area_epsilon: f64,
    /// Non-manifold detection rule applied during cleanup.
    pub non_manifold_rule: NonManifoldRule,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            triangle_threshold: 20_000,
            merge_distance: 1e-3,
            plane_epsilon: 1e-9,
            area_epsilon: 1e-12,
            non_manifold_rule: NonManifoldRule::default(),
        }
    }
}

impl TilingConfig {
    /// Check that every field is usable before a run starts.
    pub fn validate(&self) -> Result<(), Error> {
        if self.triangle_threshold == 0 {
            return Err(Error::InvalidConfig {
                field: "triangle_threshold",
                reason: "must be greater than zero",
            });
        }
        if !(self.merge_distance.is_finite() && self.merge_distance > 0.0) {
            return Err(Error::InvalidConfig {
                field: "merge_distance",
                reason: "must be finite and greater than zero",
            });
        }
        if !(self.plane_epsilon.is_finite() && self.plane_epsilon > 0.0) {
            return Err(Error::InvalidConfig {
                field: "plane_epsilon",
                reason: "must be finite and greater than zero",
            });
        }
        if !(self.area_epsilon.is_finite() && self.area_epsilon >= 0.0) {
            return Err(Error::InvalidConfig {
                field: "area_epsilon",
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}
