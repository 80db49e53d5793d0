// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Crate-wide error type

use thiserror::Error;

/// Errors reported by the tiling engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A triangle references a corner index outside the corner buffer
    #[error("triangle {triangle} references corner {corner}, but the mesh has {corner_count} corners")]
    CornerOutOfRange {
        triangle: usize,
        corner: usize,
        corner_count: usize,
    },

    /// A corner references a vertex index outside the vertex buffer
    #[error("corner {corner} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        corner: usize,
        vertex: usize,
        vertex_count: usize,
    },

    /// A configuration field failed validation
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}
