// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Recursive octree partitioning of a mesh.
//!
//! Each node either keeps its mesh as a leaf or splits it into eight
//! octants through three rounds of plane bisection (x, then y, then z) at
//! the midpoint of the node's bounding box. Sibling subtrees share no
//! mutable state, so they recurse on separate rayon workers; the result is
//! identical regardless of scheduling because every child depends only on
//! its own mesh and path.

use crate::config::TilingConfig;
use crate::geometry::{bisect, cleanup, Axis, BoundingBox, Mesh, SplitPlane};
use log::trace;
use rayon::prelude::*;

/// One cell of the spatial hierarchy
#[derive(Debug)]
pub struct OctreeNode {
    /// 0 at the root
    pub depth: u8,
    /// Child indices (0-7) leading here from the root; `depth` entries
    pub path: Vec<u8>,
    /// Bounds of this node's own mesh, recomputed when the mesh was created
    pub bounds: BoundingBox,
    pub kind: NodeKind,
}

/// A node is either terminal or fully split; a partial set of children
/// never exists.
#[derive(Debug)]
pub enum NodeKind {
    /// Terminal cell; the mesh has passed cleanup and may be empty
    Leaf(Mesh),
    /// Fully split cell; exactly eight children, indexed dx + 2*dy + 4*dz
    /// with bit = 1 on the above side of the corresponding midpoint plane
    Split(Vec<OctreeNode>),
}

impl OctreeNode {
    /// Number of leaves in this subtree
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Split(children) => children.iter().map(OctreeNode::leaf_count).sum(),
        }
    }
}

/// Partition `mesh` into an octree according to `config`.
///
/// The configuration and mesh must already be validated; see
/// [`crate::engine::TilingEngine::run`].
pub fn build_octree(mesh: Mesh, config: &TilingConfig) -> OctreeNode {
    build_node(mesh, 0, Vec::new(), config)
}

fn build_node(mesh: Mesh, depth: u8, path: Vec<u8>, config: &TilingConfig) -> OctreeNode {
    let bounds = mesh.bounding_box();
    let triangles = mesh.triangle_count();

    // Stopping policy: the depth limit wins over everything, then the
    // triangle threshold; point-like bounds cannot be split meaningfully.
    let split = depth < config.max_depth
        && triangles > config.triangle_threshold
        && !bounds.is_degenerate(config.plane_epsilon);

    if !split {
        trace!(
            "leaf at depth {} ({} triangles before cleanup)",
            depth,
            triangles
        );
        let cleaned = cleanup(&mesh, config);
        return OctreeNode {
            depth,
            path,
            bounds,
            kind: NodeKind::Leaf(cleaned),
        };
    }

    trace!("splitting {} triangles at depth {}", triangles, depth);
    let octants = split_octants(mesh, &bounds, config.plane_epsilon);

    let children: Vec<OctreeNode> = octants
        .into_par_iter()
        .enumerate()
        .map(|(child, octant)| {
            let mut child_path = path.clone();
            child_path.push(child as u8);
            build_node(octant, depth + 1, child_path, config)
        })
        .collect();

    OctreeNode {
        depth,
        path,
        bounds,
        kind: NodeKind::Split(children),
    }
}

/// Cut a mesh into eight octants at the midpoint of `bounds`.
///
/// The parent is consumed and released as soon as its two x-halves exist;
/// each intermediate piece is released the same way, so peak memory stays
/// proportional to one level of the tree rather than the whole hierarchy.
fn split_octants(mesh: Mesh, bounds: &BoundingBox, epsilon: f64) -> Vec<Mesh> {
    let mid = bounds.center();
    let mut octants = vec![Mesh::empty(); 8];

    let halves = bisect(&mesh, SplitPlane::new(Axis::X, mid.x), epsilon);
    drop(mesh);

    for (dx, half) in [halves.0, halves.1].into_iter().enumerate() {
        let quarters = bisect(&half, SplitPlane::new(Axis::Y, mid.y), epsilon);
        drop(half);

        for (dy, quarter) in [quarters.0, quarters.1].into_iter().enumerate() {
            let (down, up) = bisect(&quarter, SplitPlane::new(Axis::Z, mid.z), epsilon);
            drop(quarter);

            octants[dx + 2 * dy] = down;
            octants[dx + 2 * dy + 4] = up;
        }
    }

    octants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Corner, Triangle};
    use nalgebra::{Point2, Point3, Vector3};

    fn single_triangle() -> Mesh {
        let up = Vector3::new(0.0, 0.0, 1.0);
        Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 1.0),
            ],
            vec![
                Corner::new(0, Point2::new(0.0, 0.0), up),
                Corner::new(1, Point2::new(1.0, 0.0), up),
                Corner::new(2, Point2::new(0.0, 1.0), up),
            ],
            vec![Triangle::new([0, 1, 2], 0)],
        )
    }

    #[test]
    fn test_threshold_stops_recursion() {
        let config = TilingConfig {
            triangle_threshold: 1,
            max_depth: 4,
            ..TilingConfig::default()
        };
        let root = build_octree(single_triangle(), &config);
        assert!(matches!(root.kind, NodeKind::Leaf(_)));
        assert_eq!(root.depth, 0);
        assert!(root.path.is_empty());
    }

    #[test]
    fn test_split_produces_exactly_eight_children() {
        // Two triangles and threshold 1 force one split.
        let mesh = single_triangle().merge(&single_triangle());
        let config = TilingConfig {
            triangle_threshold: 1,
            max_depth: 1,
            ..TilingConfig::default()
        };
        let root = build_octree(mesh, &config);
        match root.kind {
            NodeKind::Split(children) => {
                assert_eq!(children.len(), 8);
                for (index, child) in children.iter().enumerate() {
                    assert_eq!(child.depth, 1);
                    assert_eq!(child.path, vec![index as u8]);
                    assert!(matches!(child.kind, NodeKind::Leaf(_)));
                }
            }
            NodeKind::Leaf(_) => panic!("root should have split"),
        }
    }

    #[test]
    fn test_max_depth_wins_over_threshold() {
        let config = TilingConfig {
            triangle_threshold: 1,
            max_depth: 0,
            ..TilingConfig::default()
        };
        let mesh = single_triangle().merge(&single_triangle());
        let root = build_octree(mesh, &config);
        assert!(matches!(root.kind, NodeKind::Leaf(_)));
    }

    #[test]
    fn test_degenerate_bounds_become_leaf() {
        // All vertices coincident: splitting would never make progress.
        let up = Vector3::new(0.0, 0.0, 1.0);
        let p = Point3::new(1.0, 1.0, 1.0);
        let mesh = Mesh::new(
            vec![p, p, p],
            vec![
                Corner::new(0, Point2::new(0.0, 0.0), up),
                Corner::new(1, Point2::new(0.0, 0.0), up),
                Corner::new(2, Point2::new(0.0, 0.0), up),
            ],
            vec![Triangle::new([0, 1, 2], 0); 4],
        );
        let config = TilingConfig {
            triangle_threshold: 1,
            max_depth: 5,
            ..TilingConfig::default()
        };
        let root = build_octree(mesh, &config);
        assert!(matches!(root.kind, NodeKind::Leaf(_)));
        assert_eq!(root.leaf_count(), 1);
    }

    #[test]
    fn test_octant_indexing() {
        // One triangle tucked into the (0,0,0) corner, one into (1,1,1);
        // neither touches a midplane, so they land in octants 0 and 7.
        let up = Vector3::new(0.0, 0.0, 1.0);
        let mut vertices = Vec::new();
        let mut corners = Vec::new();
        let mut triangles = Vec::new();
        for (t, offset) in [(0usize, 0.0f64), (1, 0.9)] {
            let base = t * 3;
            let z = offset * 10.0;
            vertices.extend([
                Point3::new(offset, offset, z),
                Point3::new(offset + 0.1, offset, z),
                Point3::new(offset, offset + 0.1, z),
            ]);
            corners.extend([
                Corner::new(base, Point2::new(0.0, 0.0), up),
                Corner::new(base + 1, Point2::new(1.0, 0.0), up),
                Corner::new(base + 2, Point2::new(0.0, 1.0), up),
            ]);
            triangles.push(Triangle::new([base, base + 1, base + 2], 0));
        }
        let mesh = Mesh::new(vertices, corners, triangles);

        let config = TilingConfig {
            triangle_threshold: 1,
            max_depth: 1,
            ..TilingConfig::default()
        };
        let root = build_octree(mesh, &config);
        match root.kind {
            NodeKind::Split(children) => {
                let occupied: Vec<usize> = children
                    .iter()
                    .enumerate()
                    .filter_map(|(i, c)| match &c.kind {
                        NodeKind::Leaf(m) if !m.is_empty() => Some(i),
                        _ => None,
                    })
                    .collect();
                assert_eq!(occupied, vec![0, 7]);
            }
            NodeKind::Leaf(_) => panic!("root should have split"),
        }
    }
}
