// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Mesh representation: the working unit of the tiling engine

use super::BoundingBox;
use crate::error::Error;
use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// One triangle corner: a reference to a vertex position plus the attributes
/// sampled at that corner.
///
/// Attributes are per-corner rather than per-vertex because a vertex may
/// carry different UVs or normals on adjacent faces (a hard texture seam or
/// crease runs through shared positions).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    /// Index into the mesh vertex buffer
    pub vertex: usize,
    pub uv: Point2<f64>,
    pub normal: Vector3<f64>,
}

impl Corner {
    pub fn new(vertex: usize, uv: Point2<f64>, normal: Vector3<f64>) -> Self {
        Self { vertex, uv, normal }
    }
}

/// Triangle defined by three corner indices and a material slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub corners: [usize; 3],
    pub material: usize,
}

impl Triangle {
    pub fn new(corners: [usize; 3], material: usize) -> Self {
        Self { corners, material }
    }
}

/// Triangular mesh with per-corner attributes.
///
/// Buffers are exposed read-only; every transformation in the engine
/// (bisection, cleanup) returns a new mesh instead of mutating in place,
/// which is what makes the octree recursion safe to run in parallel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    vertices: Vec<Point3<f64>>,
    corners: Vec<Corner>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Construct from raw buffers. Indices are not checked here; call
    /// [`Mesh::validate`] before feeding untrusted data into the engine.
    pub fn new(vertices: Vec<Point3<f64>>, corners: Vec<Corner>, triangles: Vec<Triangle>) -> Self {
        Self {
            vertices,
            corners,
            triangles,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A mesh with no triangles is a valid, empty tile.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Check that every triangle resolves to valid corners and every corner
    /// to a valid vertex.
    pub fn validate(&self) -> Result<(), Error> {
        for (t, triangle) in self.triangles.iter().enumerate() {
            for &c in &triangle.corners {
                if c >= self.corners.len() {
                    return Err(Error::CornerOutOfRange {
                        triangle: t,
                        corner: c,
                        corner_count: self.corners.len(),
                    });
                }
            }
        }
        for (i, corner) in self.corners.iter().enumerate() {
            if corner.vertex >= self.vertices.len() {
                return Err(Error::VertexOutOfRange {
                    corner: i,
                    vertex: corner.vertex,
                    vertex_count: self.vertices.len(),
                });
            }
        }
        Ok(())
    }

    /// Positions of a triangle's three corners, in corner order
    pub fn triangle_positions(&self, triangle: &Triangle) -> [Point3<f64>; 3] {
        triangle
            .corners
            .map(|c| self.vertices[self.corners[c].vertex])
    }

    /// Area of one triangle
    pub fn triangle_area(&self, triangle: &Triangle) -> f64 {
        let [v0, v1, v2] = self.triangle_positions(triangle);
        (v1 - v0).cross(&(v2 - v0)).norm() / 2.0
    }

    /// Total surface area
    pub fn surface_area(&self) -> f64 {
        self.triangles.iter().map(|t| self.triangle_area(t)).sum()
    }

    /// Concatenate with another mesh, offsetting its indices
    pub fn merge(&self, other: &Mesh) -> Mesh {
        let vertex_offset = self.vertices.len();
        let corner_offset = self.corners.len();

        let mut vertices = self.vertices.clone();
        vertices.extend_from_slice(&other.vertices);

        let mut corners = self.corners.clone();
        corners.extend(other.corners.iter().map(|c| Corner {
            vertex: c.vertex + vertex_offset,
            ..*c
        }));

        let mut triangles = self.triangles.clone();
        triangles.extend(other.triangles.iter().map(|t| {
            Triangle::new(
                [
                    t.corners[0] + corner_offset,
                    t.corners[1] + corner_offset,
                    t.corners[2] + corner_offset,
                ],
                t.material,
            )
        }));

        Mesh::new(vertices, corners, triangles)
    }
}

/// Incrementally assembles mesh buffers.
///
/// Used by the bisector and the cleanup passes; each pushed triangle owns
/// the three corners pushed with it.
#[derive(Debug, Default)]
pub(crate) struct MeshBuffers {
    pub vertices: Vec<Point3<f64>>,
    pub corners: Vec<Corner>,
    pub triangles: Vec<Triangle>,
}

impl MeshBuffers {
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            corners: Vec::with_capacity(triangles * 3),
            triangles: Vec::with_capacity(triangles),
        }
    }

    pub fn push_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    pub fn push_triangle(&mut self, corners: [Corner; 3], material: usize) {
        let base = self.corners.len();
        self.corners.extend_from_slice(&corners);
        self.triangles
            .push(Triangle::new([base, base + 1, base + 2], material));
    }

    pub fn into_mesh(self) -> Mesh {
        Mesh::new(self.vertices, self.corners, self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let up = Vector3::new(0.0, 0.0, 1.0);
        let corners = vec![
            Corner::new(0, Point2::new(0.0, 0.0), up),
            Corner::new(1, Point2::new(1.0, 0.0), up),
            Corner::new(2, Point2::new(0.0, 1.0), up),
        ];
        Mesh::new(vertices, corners, vec![Triangle::new([0, 1, 2], 0)])
    }

    #[test]
    fn test_counts_and_area() {
        let mesh = unit_triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.corner_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.is_empty());
        assert!((mesh.surface_area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_corner_index() {
        let mut mesh = unit_triangle();
        mesh.triangles[0].corners[2] = 7;
        assert_eq!(
            mesh.validate(),
            Err(Error::CornerOutOfRange {
                triangle: 0,
                corner: 7,
                corner_count: 3,
            })
        );
    }

    #[test]
    fn test_validate_rejects_bad_vertex_index() {
        let mut mesh = unit_triangle();
        mesh.corners[1].vertex = 9;
        assert_eq!(
            mesh.validate(),
            Err(Error::VertexOutOfRange {
                corner: 1,
                vertex: 9,
                vertex_count: 3,
            })
        );
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mesh = unit_triangle().merge(&unit_triangle());
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.corners()[3].vertex, 3);
        assert_eq!(mesh.triangles()[1].corners, [3, 4, 5]);
    }

    #[test]
    fn test_empty_mesh_is_valid() {
        let mesh = Mesh::empty();
        assert!(mesh.is_empty());
        assert!(mesh.validate().is_ok());
        assert!(mesh.bounding_box().is_degenerate(1e-12));
    }
}
