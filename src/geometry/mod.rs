// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Geometry module - mesh representation and operations

mod analytics;
mod bbox;
mod bisect;
mod cleanup;
mod mesh;
mod plane;

pub use analytics::{analyze, MeshStats};
pub use bbox::BoundingBox;
pub use bisect::bisect;
pub use cleanup::{
    cleanup, compact, drop_degenerate_triangles, drop_non_manifold_triangles, weld_vertices,
};
pub use mesh::{Corner, Mesh, Triangle};
pub use plane::{Axis, PlaneSide, SplitPlane};
