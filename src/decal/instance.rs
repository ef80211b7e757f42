// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Placed decal patches

use super::TargetId;
use crate::geometry::{BoundingBox, Mesh};
use crate::material::Material;
use nalgebra::Matrix4;

/// One clipped patch attached to a target.
///
/// `geometry` is stored in the world space of the moment it was placed;
/// `local_transform` is the inverse of the target's world matrix at that
/// moment, so the patch follows the target afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DecalInstance {
    pub geometry: Mesh,
    pub material: Material,
    /// Draw order, equal to the decal's insertion index
    pub render_order: usize,
    pub parent: TargetId,
    pub local_transform: Matrix4<f32>,
}

impl DecalInstance {
    /// World transform given the parent's current world matrix
    pub fn world_transform(&self, target_world: &Matrix4<f32>) -> Matrix4<f32> {
        target_world * self.local_transform
    }

    pub fn world_bounds(&self, target_world: &Matrix4<f32>) -> BoundingBox {
        self.geometry
            .bounding_box()
            .transformed(&self.world_transform(target_world))
    }

    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }
}
