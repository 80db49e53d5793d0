// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Plane bisection: splits a mesh in two along an axis-aligned plane.
//!
//! Triangles wholly on one side are copied; triangles straddling the plane
//! are clipped against each half-space, with position, UV and normal
//! interpolated at the cut using the same edge parameter so that attributes
//! stay continuous across tile boundaries. Triangles lying on the plane go
//! to the below side, so every input triangle lands in exactly one output.

use super::mesh::{Corner, Mesh, MeshBuffers, Triangle};
use super::plane::{PlaneSide, SplitPlane};
use nalgebra::{Point2, Point3, Vector3};

/// A triangle corner detached from the mesh buffers during clipping
#[derive(Debug, Clone, Copy)]
struct LooseCorner {
    position: Point3<f64>,
    uv: Point2<f64>,
    normal: Vector3<f64>,
    /// Index into the source vertex buffer; `None` for vertices created at
    /// the cut
    source_vertex: Option<usize>,
}

/// One side of a bisection under construction.
///
/// Vertices carried over from the source mesh go through an index map so
/// that positions shared between surviving triangles stay shared.
struct SideBuilder {
    buffers: MeshBuffers,
    vertex_map: Vec<Option<usize>>,
}

impl SideBuilder {
    fn new(mesh: &Mesh) -> Self {
        Self {
            buffers: MeshBuffers::with_capacity(
                mesh.vertex_count() / 2,
                mesh.triangle_count() / 2,
            ),
            vertex_map: vec![None; mesh.vertex_count()],
        }
    }

    fn carry_vertex(&mut self, mesh: &Mesh, index: usize) -> usize {
        match self.vertex_map[index] {
            Some(mapped) => mapped,
            None => {
                let mapped = self.buffers.push_vertex(mesh.vertices()[index]);
                self.vertex_map[index] = Some(mapped);
                mapped
            }
        }
    }

    /// Copy a triangle that does not touch the plane
    fn copy_triangle(&mut self, mesh: &Mesh, triangle: &Triangle) {
        let corners = triangle.corners.map(|c| {
            let corner = mesh.corners()[c];
            Corner::new(
                self.carry_vertex(mesh, corner.vertex),
                corner.uv,
                corner.normal,
            )
        });
        self.buffers.push_triangle(corners, triangle.material);
    }

    /// Triangulate a clipped polygon (3 or 4 corners, original winding) as a
    /// fan and append it
    fn push_polygon(&mut self, mesh: &Mesh, polygon: &[LooseCorner], material: usize) {
        if polygon.len() < 3 {
            return;
        }
        let vertices: Vec<usize> = polygon
            .iter()
            .map(|corner| match corner.source_vertex {
                Some(index) => self.carry_vertex(mesh, index),
                None => self.buffers.push_vertex(corner.position),
            })
            .collect();

        for k in 1..polygon.len() - 1 {
            let fan = [0, k, k + 1].map(|i| {
                Corner::new(vertices[i], polygon[i].uv, polygon[i].normal)
            });
            self.buffers.push_triangle(fan, material);
        }
    }

    fn finish(self) -> Mesh {
        self.buffers.into_mesh()
    }
}

/// Split `mesh` along `plane` into (below, above).
///
/// Either output may be empty. The total triangle count never decreases: a
/// straddling triangle contributes one triangle to one side and one or two
/// to the other.
pub fn bisect(mesh: &Mesh, plane: SplitPlane, epsilon: f64) -> (Mesh, Mesh) {
    let mut below = SideBuilder::new(mesh);
    let mut above = SideBuilder::new(mesh);

    for triangle in mesh.triangles() {
        let corners = triangle.corners.map(|c| mesh.corners()[c]);
        let distances = corners.map(|c| plane.signed_distance(&mesh.vertices()[c.vertex]));
        let sides = distances.map(|d| PlaneSide::from_distance(d, epsilon));

        let any_above = sides.contains(&PlaneSide::Above);
        let any_below = sides.contains(&PlaneSide::Below);

        if !any_above {
            // Wholly below, or exactly on the plane (tie-break).
            below.copy_triangle(mesh, triangle);
        } else if !any_below {
            above.copy_triangle(mesh, triangle);
        } else {
            let loose = corners.map(|c| LooseCorner {
                position: mesh.vertices()[c.vertex],
                uv: c.uv,
                normal: c.normal,
                source_vertex: Some(c.vertex),
            });
            let below_poly = clip_half(&loose, &distances, &sides, false);
            let above_poly = clip_half(&loose, &distances, &sides, true);
            below.push_polygon(mesh, &below_poly, triangle.material);
            above.push_polygon(mesh, &above_poly, triangle.material);
        }
    }

    (below.finish(), above.finish())
}

/// Clip a straddling triangle against one half-space.
///
/// On-plane corners are kept by both halves; an edge crossing the plane
/// emits an interpolated corner at the intersection. The result has 3 or 4
/// corners in the triangle's original winding.
fn clip_half(
    corners: &[LooseCorner; 3],
    distances: &[f64; 3],
    sides: &[PlaneSide; 3],
    keep_above: bool,
) -> Vec<LooseCorner> {
    let discarded = if keep_above {
        PlaneSide::Below
    } else {
        PlaneSide::Above
    };

    let mut polygon = Vec::with_capacity(4);
    for i in 0..3 {
        let j = (i + 1) % 3;
        if sides[i] != discarded {
            polygon.push(corners[i]);
        }
        let crossing = matches!(
            (sides[i], sides[j]),
            (PlaneSide::Below, PlaneSide::Above) | (PlaneSide::Above, PlaneSide::Below)
        );
        if crossing {
            let t = distances[i] / (distances[i] - distances[j]);
            polygon.push(interpolate(&corners[i], &corners[j], t));
        }
    }
    polygon
}

/// Interpolate position, UV and normal with one shared parameter
fn interpolate(a: &LooseCorner, b: &LooseCorner, t: f64) -> LooseCorner {
    let position = a.position + (b.position - a.position) * t;
    let uv = a.uv + (b.uv - a.uv) * t;

    let blended = a.normal.lerp(&b.normal, t);
    let norm = blended.norm();
    // Anti-parallel endpoint normals can cancel out at the midpoint.
    let normal = if norm > 1e-12 { blended / norm } else { a.normal };

    LooseCorner {
        position,
        uv,
        normal,
        source_vertex: None,
    }
}
