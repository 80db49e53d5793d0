// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Mesh statistics and analytics

use super::{BoundingBox, Mesh};
use serde::{Deserialize, Serialize};

/// Summary statistics for one mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshStats {
    /// Total surface area in square units
    pub surface_area: f64,
    /// Axis-aligned bounds
    pub bbox: BoundingBox,
    pub vertex_count: usize,
    pub corner_count: usize,
    pub triangle_count: usize,
}

/// Compute statistics for a mesh
pub fn analyze(mesh: &Mesh) -> MeshStats {
    MeshStats {
        surface_area: mesh.surface_area(),
        bbox: mesh.bounding_box(),
        vertex_count: mesh.vertex_count(),
        corner_count: mesh.corner_count(),
        triangle_count: mesh.triangle_count(),
    }
}
