// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Engine facade: validate, build, emit

use crate::config::TilingConfig;
use crate::error::Error;
use crate::geometry::Mesh;
use crate::octree::build_octree;
use crate::tile::{emit_tiles, TileSet};
use log::debug;

/// Drives a full tiling run with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct TilingEngine {
    config: TilingConfig,
}

impl TilingEngine {
    pub fn new(config: TilingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    /// Partition `mesh` into tiles.
    ///
    /// Fails fast on an invalid configuration or a malformed mesh; no
    /// recursion starts before both checks pass. The same mesh and
    /// configuration always produce the same tile set.
    pub fn run(&self, mesh: Mesh) -> Result<TileSet, Error> {
        self.config.validate()?;
        mesh.validate()?;

        debug!(
            "tiling {} triangles (threshold {}, max depth {})",
            mesh.triangle_count(),
            self.config.triangle_threshold,
            self.config.max_depth,
        );

        let root = build_octree(mesh, &self.config);
        let tiles = emit_tiles(root);

        debug!(
            "emitted {} tiles, {} triangles total",
            tiles.len(),
            tiles.total_triangles(),
        );
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Corner, Triangle};
    use nalgebra::{Point2, Point3, Vector3};

    #[test]
    fn test_run_rejects_invalid_config() {
        let engine = TilingEngine::new(TilingConfig {
            triangle_threshold: 0,
            ..TilingConfig::default()
        });
        assert!(matches!(
            engine.run(Mesh::empty()),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_run_rejects_malformed_mesh() {
        let up = Vector3::new(0.0, 0.0, 1.0);
        let mesh = Mesh::new(
            vec![Point3::new(0.0, 0.0, 0.0)],
            vec![Corner::new(3, Point2::new(0.0, 0.0), up)],
            vec![Triangle::new([0, 0, 0], 0)],
        );
        let engine = TilingEngine::default();
        assert!(matches!(
            engine.run(mesh),
            Err(Error::VertexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_mesh_yields_empty_tile_set() {
        let tiles = TilingEngine::default().run(Mesh::empty()).unwrap();
        assert!(tiles.is_empty());
    }
}
