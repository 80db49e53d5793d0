// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Tilecut Team

//! Axis-aligned splitting planes and point classification

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Splitting axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn component(&self, point: &Point3<f64>) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
            Axis::Z => point.z,
        }
    }
}

/// Side of a splitting plane, classified within an epsilon band.
///
/// Points within `epsilon` of the plane are `On`; they belong to both clip
/// outputs, and a triangle that is entirely `On` goes to the below side so
/// that every triangle lands in exactly one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    Below,
    Above,
    On,
}

impl PlaneSide {
    pub fn from_distance(distance: f64, epsilon: f64) -> Self {
        if distance > epsilon {
            PlaneSide::Above
        } else if distance < -epsilon {
            PlaneSide::Below
        } else {
            PlaneSide::On
        }
    }
}

/// Plane perpendicular to one coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitPlane {
    pub axis: Axis,
    pub offset: f64,
}

impl SplitPlane {
    pub fn new(axis: Axis, offset: f64) -> Self {
        Self { axis, offset }
    }

    /// Signed distance from the plane; positive on the above side
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.axis.component(point) - self.offset
    }

    pub fn classify(&self, point: &Point3<f64>, epsilon: f64) -> PlaneSide {
        PlaneSide::from_distance(self.signed_distance(point), epsilon)
    }
}
