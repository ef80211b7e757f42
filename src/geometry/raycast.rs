// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ray casting against a transformed triangle mesh using parry3d

use super::Mesh;
use nalgebra::{Matrix4, Point3, Vector3};
use parry3d::query::{Ray as ParryRay, RayCast};
use parry3d::shape::TriMesh;

/// World-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Same ray expressed in the space of `matrix`
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Ray {
        Ray::new(
            matrix.transform_point(&self.origin),
            matrix.transform_vector(&self.direction),
        )
    }
}

/// Nearest intersection between a ray and a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit point
    pub point: Point3<f32>,
    /// Face normal in the mesh's local space
    pub local_normal: Vector3<f32>,
    /// World-space distance from the ray origin
    pub distance: f32,
}

/// Collision shape for a mesh that stays fixed in its local space.
///
/// The parry3d triangle mesh is built once; casting maps the ray into local
/// space so non-uniform scale on the owning object is honoured.
pub struct MeshCollider {
    trimesh: Option<TriMesh>,
}

impl MeshCollider {
    pub fn new(mesh: &Mesh) -> Self {
        if mesh.is_empty() {
            return Self { trimesh: None };
        }

        let vertices: Vec<Point3<f32>> = mesh.vertices.iter().map(|v| v.position).collect();
        let indices: Vec<[u32; 3]> = mesh
            .triangles
            .iter()
            .map(|t| {
                [
                    t.indices[0] as u32,
                    t.indices[1] as u32,
                    t.indices[2] as u32,
                ]
            })
            .collect();

        Self {
            trimesh: Some(TriMesh::new(vertices, indices)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trimesh.is_none()
    }

    /// Cast a world-space ray against the mesh placed by `world`
    pub fn cast(&self, world: &Matrix4<f32>, ray: &Ray) -> Option<RayHit> {
        let trimesh = self.trimesh.as_ref()?;
        let inverse = world.try_inverse()?;
        let local = ray.transformed(&inverse);

        let parry_ray = ParryRay::new(local.origin, local.direction);
        let hit = trimesh.cast_local_ray_and_get_normal(&parry_ray, f32::MAX, true)?;

        let point = world.transform_point(&parry_ray.point_at(hit.time_of_impact));
        Some(RayHit {
            point,
            local_normal: hit.normal,
            distance: (point - ray.origin).norm(),
        })
    }
}

impl std::fmt::Debug for MeshCollider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshCollider")
            .field("triangles", &self.trimesh.as_ref().map(|t| t.indices().len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    #[test]
    fn test_cast_hits_front_face() {
        let mesh = Primitive::cube(Vector3::new(2.0, 2.0, 2.0), 1).to_mesh();
        let collider = MeshCollider::new(&mesh);
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));

        let hit = collider.cast(&Matrix4::identity(), &ray).unwrap();
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.distance, 9.0, epsilon = 1e-4);
        assert!(hit.local_normal.z > 0.99);
    }

    #[test]
    fn test_cast_respects_world_transform() {
        let mesh = Primitive::cube(Vector3::new(2.0, 2.0, 2.0), 1).to_mesh();
        let collider = MeshCollider::new(&mesh);
        let world = Matrix4::new_translation(&Vector3::new(0.0, 10.0, 0.0))
            * Matrix4::new_nonuniform_scaling(&Vector3::new(0.5, 0.5, 3.0));
        let ray = Ray::new(Point3::new(0.0, 10.0, 20.0), Vector3::new(0.0, 0.0, -1.0));

        let hit = collider.cast(&world, &ray).unwrap();
        assert_relative_eq!(hit.point.z, 3.0, epsilon = 1e-4);
        assert_relative_eq!(hit.point.y, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_cast_miss_and_empty() {
        let mesh = Primitive::cube(Vector3::new(2.0, 2.0, 2.0), 1).to_mesh();
        let collider = MeshCollider::new(&mesh);
        let ray = Ray::new(Point3::new(5.0, 5.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(collider.cast(&Matrix4::identity(), &ray).is_none());

        let empty = MeshCollider::new(&Mesh::empty());
        assert!(empty.is_empty());
        assert!(empty.cast(&Matrix4::identity(), &ray).is_none());
    }
}
