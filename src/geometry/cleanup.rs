// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Removes artifacts introduced by repeated bisection before a mesh is
//! emitted as a tile.
//!
//! The passes run in a fixed order: weld coincident vertices, drop
//! degenerate triangles, drop non-manifold triangles, compact unused
//! buffers. Each pass is a pure function returning a new mesh; none of them
//! can fail, and none of them increases the triangle count.

use super::mesh::{Corner, Mesh, MeshBuffers, Triangle};
use crate::config::{NonManifoldRule, TilingConfig};
use ahash::AHashMap;
use log::debug;
use nalgebra::Point3;

/// Run the full cleanup sequence with the run's configuration
pub fn cleanup(mesh: &Mesh, config: &TilingConfig) -> Mesh {
    let welded = weld_vertices(mesh, config.merge_distance);
    let solid = drop_degenerate_triangles(&welded, config.area_epsilon);
    let manifold = drop_non_manifold_triangles(&solid, config.non_manifold_rule);
    let compacted = compact(&manifold);

    if compacted.triangle_count() < mesh.triangle_count() {
        debug!(
            "cleanup: {} -> {} triangles, {} -> {} vertices",
            mesh.triangle_count(),
            compacted.triangle_count(),
            mesh.vertex_count(),
            compacted.vertex_count(),
        );
    }
    compacted
}

/// Quantized grid cell for the weld neighborhood probe
fn grid_cell(point: &Point3<f64>, inv_distance: f64) -> (i64, i64, i64) {
    (
        (point.x * inv_distance).floor() as i64,
        (point.y * inv_distance).floor() as i64,
        (point.z * inv_distance).floor() as i64,
    )
}

/// Merge vertices closer than `merge_distance`.
///
/// Every vertex maps to the first-encountered representative within range,
/// whose position wins for the merged cluster; corner attributes are
/// untouched, since UVs and normals live per corner. Candidates are found
/// through a grid hash probed over the 27 surrounding cells, so the pass is
/// linear in practice.
pub fn weld_vertices(mesh: &Mesh, merge_distance: f64) -> Mesh {
    if mesh.vertex_count() == 0 {
        return mesh.clone();
    }

    let inv_distance = 1.0 / merge_distance;
    let mut grid: AHashMap<(i64, i64, i64), Vec<usize>> = AHashMap::new();
    let mut kept: Vec<Point3<f64>> = Vec::with_capacity(mesh.vertex_count());
    let mut remap = vec![0usize; mesh.vertex_count()];

    for (index, position) in mesh.vertices().iter().enumerate() {
        let cell = grid_cell(position, inv_distance);
        let mut found = None;

        'probe: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    if let Some(candidates) = grid.get(&neighbor) {
                        for &candidate in candidates {
                            if (kept[candidate] - *position).norm() < merge_distance {
                                found = Some(candidate);
                                break 'probe;
                            }
                        }
                    }
                }
            }
        }

        remap[index] = match found {
            Some(representative) => representative,
            None => {
                let representative = kept.len();
                kept.push(*position);
                grid.entry(cell).or_default().push(representative);
                representative
            }
        };
    }

    let corners = mesh
        .corners()
        .iter()
        .map(|c| Corner::new(remap[c.vertex], c.uv, c.normal))
        .collect();
    Mesh::new(kept, corners, mesh.triangles().to_vec())
}

/// Drop triangles that collapsed to a repeated vertex or to (near-)zero area
pub fn drop_degenerate_triangles(mesh: &Mesh, area_epsilon: f64) -> Mesh {
    let triangles = mesh
        .triangles()
        .iter()
        .filter(|triangle| {
            let [a, b, c] = triangle.corners.map(|i| mesh.corners()[i].vertex);
            a != b && b != c && a != c && mesh.triangle_area(triangle) > area_epsilon
        })
        .copied()
        .collect();
    Mesh::new(mesh.vertices().to_vec(), mesh.corners().to_vec(), triangles)
}

#[derive(Default)]
struct EdgeUse {
    count: u32,
    forward: bool,
    backward: bool,
}

/// Drop triangles whose edges would exceed manifold valence.
///
/// Greedy in triangle order: a triangle is kept only while each of its
/// undirected edges stays within two uses. Under
/// [`NonManifoldRule::EdgeValenceAndWinding`] a triangle is also rejected
/// when it traverses an edge in the same direction as a kept triangle, which
/// catches inconsistently wound duplicates sharing an edge.
pub fn drop_non_manifold_triangles(mesh: &Mesh, rule: NonManifoldRule) -> Mesh {
    let mut edges: AHashMap<(usize, usize), EdgeUse> = AHashMap::new();
    let mut kept: Vec<Triangle> = Vec::with_capacity(mesh.triangle_count());

    for triangle in mesh.triangles() {
        let [a, b, c] = triangle.corners.map(|i| mesh.corners()[i].vertex);
        let traversals = [(a, b), (b, c), (c, a)].map(|(from, to)| {
            if from < to {
                ((from, to), true)
            } else {
                ((to, from), false)
            }
        });

        let admissible = traversals.iter().all(|(key, forward)| {
            match edges.get(key) {
                None => true,
                Some(edge) => {
                    edge.count < 2
                        && (rule == NonManifoldRule::EdgeValence
                            || !(if *forward { edge.forward } else { edge.backward }))
                }
            }
        });

        if admissible {
            for (key, forward) in traversals {
                let edge = edges.entry(key).or_default();
                edge.count += 1;
                if forward {
                    edge.forward = true;
                } else {
                    edge.backward = true;
                }
            }
            kept.push(*triangle);
        }
    }

    Mesh::new(mesh.vertices().to_vec(), mesh.corners().to_vec(), kept)
}

/// Rebuild the mesh keeping only vertices and corners referenced by a
/// surviving triangle
pub fn compact(mesh: &Mesh) -> Mesh {
    let mut buffers = MeshBuffers::with_capacity(mesh.vertex_count(), mesh.triangle_count());
    let mut vertex_map: Vec<Option<usize>> = vec![None; mesh.vertex_count()];

    for triangle in mesh.triangles() {
        let corners = triangle.corners.map(|c| {
            let corner = mesh.corners()[c];
            let vertex = match vertex_map[corner.vertex] {
                Some(mapped) => mapped,
                None => {
                    let mapped = buffers.push_vertex(mesh.vertices()[corner.vertex]);
                    vertex_map[corner.vertex] = Some(mapped);
                    mapped
                }
            };
            Corner::new(vertex, corner.uv, corner.normal)
        });
        buffers.push_triangle(corners, triangle.material);
    }

    buffers.into_mesh()
}
