// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Decal target surface

use crate::brush::Transform;
use crate::geometry::{ClipTarget, Mesh, MeshCollider, Ray, RayHit, BVH};
use crate::material::Material;
use nalgebra::{Matrix3, Matrix4};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub(crate) u32);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// Mesh that decals are projected onto, with its collision and clip structures
#[derive(Debug)]
pub struct DecalTarget {
    id: TargetId,
    mesh: Mesh,
    transform: Transform,
    world: Matrix4<f32>,
    material: Material,
    bvh: BVH,
    collider: MeshCollider,
}

impl DecalTarget {
    /// The transform is sanitized so the world matrix stays invertible
    pub(crate) fn new(id: TargetId, mesh: Mesh, transform: Transform) -> Self {
        let transform = transform.sanitized();
        let bvh = BVH::from_mesh(&mesh);
        let collider = MeshCollider::new(&mesh);
        Self {
            id,
            world: transform.matrix(),
            transform,
            mesh,
            material: Material::decal_target(),
            bvh,
            collider,
        }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Move the target; attached decals follow through their local transforms
    pub fn set_transform(&mut self, transform: Transform) {
        let transform = transform.sanitized();
        self.transform = transform;
        self.world = transform.matrix();
    }

    pub fn world(&self) -> &Matrix4<f32> {
        &self.world
    }

    pub fn normal_matrix(&self) -> Matrix3<f32> {
        crate::utils::math::normal_matrix(&self.world)
    }

    /// Nearest hit of a world-space ray, ignoring everything but this mesh
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        self.collider.cast(&self.world, ray)
    }

    pub fn clip_target(&self) -> ClipTarget<'_> {
        ClipTarget {
            mesh: &self.mesh,
            world: self.world,
            bvh: Some(&self.bvh),
        }
    }
}
