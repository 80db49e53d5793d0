// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Tile identifiers and the emitted tile set

use crate::geometry::Mesh;
use crate::octree::{NodeKind, OctreeNode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of one tile: the child-index path from the octree
/// root. The level is the path length, and the path doubles into a lattice
/// address per level, so `(level, path)` pins down the tile's exact cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId {
    path: Vec<u8>,
}

impl TileId {
    /// Identifier of the root tile, `(0, [])`
    pub fn root() -> Self {
        Self { path: Vec::new() }
    }

    /// Build from a child-index path; every entry must be in `0..8`
    pub fn new(path: Vec<u8>) -> Self {
        debug_assert!(path.iter().all(|&c| c < 8));
        Self { path }
    }

    pub fn level(&self) -> usize {
        self.path.len()
    }

    pub fn path(&self) -> &[u8] {
        &self.path
    }

    /// Lattice address `(ix, iy, iz)` at this tile's level.
    ///
    /// Each descent doubles the lattice: `ix' = 2*ix + dx`, where `dx` is
    /// bit 0 of the child index (`dy` bit 1, `dz` bit 2).
    pub fn grid_coords(&self) -> (u64, u64, u64) {
        let mut coords = (0u64, 0u64, 0u64);
        for &child in &self.path {
            coords.0 = coords.0 * 2 + u64::from(child & 1);
            coords.1 = coords.1 * 2 + u64::from((child >> 1) & 1);
            coords.2 = coords.2 * 2 + u64::from((child >> 2) & 1);
        }
        coords
    }
}

/// Formats as `level_ix_iy_iz`, the chunk naming used by tile consumers
impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ix, iy, iz) = self.grid_coords();
        write!(f, "{}_{}_{}_{}", self.level(), ix, iy, iz)
    }
}

/// Tiles sort by level first, then by path, so iteration is breadth-first
/// and reproducible.
impl Ord for TileId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level()
            .cmp(&other.level())
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for TileId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The tiles produced by one engine run, keyed deterministically
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileSet {
    tiles: BTreeMap<TileId, Mesh>,
}

impl TileSet {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: &TileId) -> Option<&Mesh> {
        self.tiles.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileId, &Mesh)> {
        self.tiles.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &TileId> {
        self.tiles.keys()
    }

    /// Deepest level present, if any tile was emitted
    pub fn max_level(&self) -> Option<usize> {
        self.tiles.keys().map(TileId::level).max()
    }

    /// Sum of triangle counts across all tiles
    pub fn total_triangles(&self) -> usize {
        self.tiles.values().map(Mesh::triangle_count).sum()
    }

    /// Number of tiles per level
    pub fn level_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for id in self.tiles.keys() {
            *counts.entry(id.level()).or_insert(0) += 1;
        }
        counts
    }

    fn insert(&mut self, id: TileId, mesh: Mesh) {
        self.tiles.insert(id, mesh);
    }
}

/// Walk a completed octree depth-first and collect every leaf with at least
/// one triangle. Empty leaves are skipped; they are not an error.
pub fn emit_tiles(root: OctreeNode) -> TileSet {
    let mut tiles = TileSet::default();
    collect(root, &mut tiles);
    tiles
}

fn collect(node: OctreeNode, out: &mut TileSet) {
    match node.kind {
        NodeKind::Leaf(mesh) => {
            if !mesh.is_empty() {
                out.insert(TileId::new(node.path), mesh);
            }
        }
        NodeKind::Split(children) => {
            for child in children {
                collect(child, out);
            }
        }
    }
}
