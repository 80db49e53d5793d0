// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Tilecut — adaptive octree mesh tiling
//!
//! Converts a large triangulated mesh into a hierarchy of spatially
//! bounded, size-limited sub-meshes (tiles) for level-of-detail streaming.
//! The engine recursively bisects the mesh's bounding volume into octants,
//! stopping where triangle density drops below a threshold, clips geometry
//! across the partition planes while interpolating per-corner attributes
//! (UVs, normals), cleans up the topology artifacts of repeated clipping,
//! and emits one standalone mesh per non-empty octree leaf.
//!
//! Loading the source mesh and encoding the emitted tiles are left to the
//! caller; the engine neither reads nor writes files.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod octree;
pub mod tile;

pub use config::{NonManifoldRule, TilingConfig};
pub use engine::TilingEngine;
pub use error::Error;
pub use geometry::{BoundingBox, Corner, Mesh, Triangle};
pub use tile::{TileId, TileSet};

/// Partition a mesh into tiles with the given configuration
pub fn tile_mesh(mesh: Mesh, config: &TilingConfig) -> Result<TileSet, Error> {
    TilingEngine::new(config.clone()).run(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Point3, Vector3};

    #[test]
    fn test_single_triangle_becomes_root_tile() {
        let up = Vector3::new(0.0, 0.0, 1.0);
        let mesh = Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![
                Corner::new(0, Point2::new(0.0, 0.0), up),
                Corner::new(1, Point2::new(1.0, 0.0), up),
                Corner::new(2, Point2::new(0.0, 1.0), up),
            ],
            vec![Triangle::new([0, 1, 2], 0)],
        );

        let tiles = tile_mesh(mesh, &TilingConfig::default()).unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles.ids().next(), Some(&TileId::root()));
    }
}
