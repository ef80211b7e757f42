// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Box-against-mesh clipping for decal geometry

use super::{BoundingBox, Mesh, Vertex, BVH};
use crate::utils::math::transform_normal;
use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector2, Vector3};

/// Mesh to clip, with its world placement and an optional local-space BVH
#[derive(Debug, Clone, Copy)]
pub struct ClipTarget<'a> {
    pub mesh: &'a Mesh,
    pub world: Matrix4<f32>,
    pub bvh: Option<&'a BVH>,
}

/// Produces the part of a target surface that lies inside an oriented box.
///
/// Implementations must be pure functions of their inputs and return empty
/// geometry when the box misses the target.
pub trait ClipGeometryGenerator {
    fn clip(
        &self,
        target: &ClipTarget<'_>,
        center: &Point3<f32>,
        orientation: &UnitQuaternion<f32>,
        extents: &Vector3<f32>,
    ) -> Mesh;
}

/// Sutherland-Hodgman clipping of target triangles against the six faces of
/// the projector box. Output vertices are in world space with UVs spanning the
/// box's XY face.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxClipper;

#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    position: Point3<f32>,
    normal: Vector3<f32>,
}

impl ClipVertex {
    fn lerp(&self, other: &ClipVertex, t: f32) -> ClipVertex {
        let normal = self.normal.lerp(&other.normal, t);
        ClipVertex {
            position: self.position + (other.position - self.position) * t,
            normal: normal.try_normalize(f32::EPSILON).unwrap_or(self.normal),
        }
    }
}

/// Keep the part of `polygon` where `sign * p[axis] <= limit`. Vertices lying
/// on the plane are kept as they are and never produce a crossing point.
fn clip_polygon(polygon: &[ClipVertex], axis: usize, sign: f32, limit: f32) -> Vec<ClipVertex> {
    let mut output = Vec::with_capacity(polygon.len() + 2);
    if polygon.is_empty() {
        return output;
    }

    let distance = |v: &ClipVertex| sign * v.position[axis] - limit;

    for (i, current) in polygon.iter().enumerate() {
        let next = &polygon[(i + 1) % polygon.len()];
        let d_current = distance(current);
        let d_next = distance(next);

        if d_current <= 0.0 {
            output.push(*current);
        }
        if (d_current < 0.0 && d_next > 0.0) || (d_current > 0.0 && d_next < 0.0) {
            let t = d_current / (d_current - d_next);
            output.push(current.lerp(next, t));
        }
    }

    output
}

/// True when the triangle has no usable area relative to its size
fn is_degenerate(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> bool {
    let ab = b - a;
    let ac = c - a;
    let longest = ab.norm_squared().max(ac.norm_squared()).max((c - b).norm_squared());
    ab.cross(&ac).norm() <= longest * 1e-6
}

impl ClipGeometryGenerator for BoxClipper {
    fn clip(
        &self,
        target: &ClipTarget<'_>,
        center: &Point3<f32>,
        orientation: &UnitQuaternion<f32>,
        extents: &Vector3<f32>,
    ) -> Mesh {
        let mut decal = Mesh::new();
        let half = extents.abs() * 0.5;
        if half.iter().any(|h| *h <= 0.0) || target.mesh.is_empty() {
            return decal;
        }

        let projector = Isometry3::from_parts(Translation3::from(center.coords), *orientation);
        let projector_matrix = projector.to_homogeneous();
        let to_projector = projector.inverse().to_homogeneous() * target.world;

        let candidates: Vec<usize> = match (target.bvh, target.world.try_inverse()) {
            (Some(bvh), Some(world_inverse)) => {
                let local_box = BoundingBox::from_center_extents(Point3::origin(), *extents)
                    .transformed(&(world_inverse * projector_matrix));
                bvh.query_triangles(&local_box)
            }
            _ => (0..target.mesh.triangle_count()).collect(),
        };

        for idx in candidates {
            let triangle = &target.mesh.triangles[idx];
            let mut polygon: Vec<ClipVertex> = triangle
                .indices
                .iter()
                .map(|&i| {
                    let vertex = &target.mesh.vertices[i];
                    ClipVertex {
                        position: to_projector.transform_point(&vertex.position),
                        normal: transform_normal(&target.world, &vertex.normal),
                    }
                })
                .collect();

            for axis in 0..3 {
                for sign in [1.0, -1.0] {
                    polygon = clip_polygon(&polygon, axis, sign, half[axis]);
                }
            }

            if polygon.len() < 3 {
                continue;
            }

            for i in 1..polygon.len() - 1 {
                if is_degenerate(&polygon[0].position, &polygon[i].position, &polygon[i + 1].position) {
                    continue;
                }
                for corner in [&polygon[0], &polygon[i], &polygon[i + 1]] {
                    decal.uvs.push(Vector2::new(
                        0.5 + corner.position.x / extents.x.abs(),
                        0.5 + corner.position.y / extents.y.abs(),
                    ));
                }
                decal.push_triangle(
                    Vertex::new(projector_matrix.transform_point(&polygon[0].position), polygon[0].normal),
                    Vertex::new(projector_matrix.transform_point(&polygon[i].position), polygon[i].normal),
                    Vertex::new(
                        projector_matrix.transform_point(&polygon[i + 1].position),
                        polygon[i + 1].normal,
                    ),
                );
            }
        }

        decal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    fn plane() -> Mesh {
        // 40x40 slab whose top face lies on y = 0
        let mut mesh = Primitive::cube(Vector3::new(40.0, 1.0, 40.0), 4).to_mesh();
        mesh.transform(&Matrix4::new_translation(&Vector3::new(0.0, -0.5, 0.0)));
        mesh
    }

    #[test]
    fn test_clip_polygon_square() {
        let square: Vec<ClipVertex> = [(-2.0, -2.0), (2.0, -2.0), (2.0, 2.0), (-2.0, 2.0)]
            .iter()
            .map(|&(x, y)| ClipVertex {
                position: Point3::new(x, y, 0.0),
                normal: Vector3::z(),
            })
            .collect();

        let clipped = clip_polygon(&square, 0, 1.0, 1.0);
        assert_eq!(clipped.len(), 4);
        assert!(clipped.iter().all(|v| v.position.x <= 1.0 + 1e-6));
    }

    #[test]
    fn test_clip_against_plane_stays_in_box() {
        let target = plane();
        let bvh = BVH::from_mesh(&target);
        let clip_target = ClipTarget {
            mesh: &target,
            world: Matrix4::identity(),
            bvh: Some(&bvh),
        };
        let extents = Vector3::new(10.0, 10.0, 10.0);
        let decal = BoxClipper.clip(&clip_target, &Point3::origin(), &UnitQuaternion::identity(), &extents);

        assert!(!decal.is_empty());
        assert!(decal.is_non_indexed());
        assert_eq!(decal.uvs.len(), decal.vertex_count());
        let bounds = BoundingBox::from_center_extents(Point3::origin(), extents);
        assert!(decal.vertices.iter().all(|v| bounds.contains_point(&v.position, 1e-4)));
        // The top face contributes a 10x10 patch at y = 0
        let bbox = decal.bounding_box();
        assert_relative_eq!(bbox.max.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(bbox.size().x, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clip_polygon_vertex_on_plane_adds_nothing() {
        let triangle: Vec<ClipVertex> = [(1.0, 0.0), (3.0, 0.0), (1.0, 2.0)]
            .iter()
            .map(|&(x, y)| ClipVertex {
                position: Point3::new(x, y, 0.0),
                normal: Vector3::z(),
            })
            .collect();

        // Two corners sit exactly on x = 1, the third is outside
        let clipped = clip_polygon(&triangle, 0, -1.0, -1.0);
        assert_eq!(clipped.len(), 3);
        let touching = clip_polygon(&triangle, 0, 1.0, 1.0);
        assert_eq!(touching.len(), 2);
    }

    #[test]
    fn test_box_aligned_with_grid_emits_no_slivers() {
        // Box faces coincide with the slab's grid lines at x, z = 0 and 10
        let target = plane();
        let bvh = BVH::from_mesh(&target);
        let clip_target = ClipTarget {
            mesh: &target,
            world: Matrix4::identity(),
            bvh: Some(&bvh),
        };
        let decal = BoxClipper.clip(
            &clip_target,
            &Point3::new(5.0, 0.0, 5.0),
            &UnitQuaternion::identity(),
            &Vector3::new(10.0, 10.0, 10.0),
        );

        assert!(!decal.is_empty());
        assert_eq!(decal.uvs.len(), decal.vertex_count());
        let mut total_area = 0.0;
        for triangle in &decal.triangles {
            let [a, b, c] = triangle.indices.map(|i| decal.vertices[i].position);
            let area = 0.5 * (b - a).cross(&(c - a)).norm();
            assert!(area > 1e-4, "sliver triangle with area {area}");
            total_area += area;
        }
        // 10x10 patches from the top and bottom faces
        assert_relative_eq!(total_area, 200.0, epsilon = 1e-2);
    }

    #[test]
    fn test_bvh_and_brute_force_agree() {
        let target = plane();
        let bvh = BVH::from_mesh(&target);
        let world = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let center = Point3::new(4.0, 2.0, 6.0);
        let orientation = UnitQuaternion::from_euler_angles(0.3, 0.2, 0.1);
        let extents = Vector3::new(6.0, 6.0, 6.0);

        let fast = BoxClipper.clip(
            &ClipTarget { mesh: &target, world, bvh: Some(&bvh) },
            &center,
            &orientation,
            &extents,
        );
        let slow = BoxClipper.clip(
            &ClipTarget { mesh: &target, world, bvh: None },
            &center,
            &orientation,
            &extents,
        );
        assert_eq!(fast.vertex_count(), slow.vertex_count());
        assert!(fast.bounding_box().approx_eq(&slow.bounding_box(), 1e-4));
    }

    #[test]
    fn test_center_outside_target_is_empty() {
        let target = plane();
        let clip_target = ClipTarget {
            mesh: &target,
            world: Matrix4::identity(),
            bvh: None,
        };
        let decal = BoxClipper.clip(
            &clip_target,
            &Point3::new(500.0, 500.0, 500.0),
            &UnitQuaternion::identity(),
            &Vector3::new(10.0, 10.0, 10.0),
        );
        assert!(decal.is_empty());
    }
}
