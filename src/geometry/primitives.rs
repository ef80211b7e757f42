// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator
//!
//! All generators emit indexed meshes centered on the origin with outward
//! normals. Segment counts below each primitive's floor are raised to it so a
//! generator never produces zero-area geometry.

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

/// Geometric primitives
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Cube {
        size: Vector3<f32>,
        segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
}

impl Primitive {
    /// Box with `segments` subdivisions along every axis
    pub fn cube(size: Vector3<f32>, segments: u32) -> Self {
        Self::Cube {
            size,
            segments: segments.max(1),
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self::Sphere {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Self::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments: radial_segments.max(3),
        }
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        Self::Torus {
            radius,
            tube,
            radial_segments: radial_segments.max(2),
            tubular_segments: tubular_segments.max(3),
        }
    }

    /// (2,3) torus knot
    pub fn torus_knot(radius: f32, tube: f32, tubular_segments: u32, radial_segments: u32) -> Self {
        Self::TorusKnot {
            radius,
            tube,
            tubular_segments: tubular_segments.max(3),
            radial_segments: radial_segments.max(3),
            p: 2,
            q: 3,
        }
    }

    /// Number of triangles `to_mesh` will emit
    pub fn triangle_count(&self) -> usize {
        match *self {
            Self::Cube { segments, .. } => 12 * (segments as usize).pow(2),
            Self::Sphere {
                width_segments,
                height_segments,
                ..
            } => 2 * width_segments as usize * (height_segments as usize - 1),
            Self::Cylinder {
                radial_segments, ..
            } => 4 * radial_segments as usize,
            Self::Torus {
                radial_segments,
                tubular_segments,
                ..
            } => 2 * radial_segments as usize * tubular_segments as usize,
            Self::TorusKnot {
                tubular_segments,
                radial_segments,
                ..
            } => 2 * tubular_segments as usize * radial_segments as usize,
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match *self {
            Self::Cube { size, segments } => generate_box_mesh(size, segments),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere_mesh(radius, width_segments, height_segments),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => generate_cylinder_mesh(radius_top, radius_bottom, height, radial_segments),
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => generate_torus_mesh(radius, tube, radial_segments, tubular_segments),
            Self::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => generate_torus_knot_mesh(radius, tube, tubular_segments, radial_segments, p, q),
        }
    }
}

fn generate_box_mesh(size: Vector3<f32>, segments: u32) -> Mesh {
    let per_face = ((segments + 1) * (segments + 1)) as usize;
    let mut mesh = Mesh::with_capacity(6 * per_face, 12 * (segments * segments) as usize);

    // (u axis, v axis, w axis, u dir, v dir, face width, face height, signed depth)
    let faces = [
        (2, 1, 0, -1.0, -1.0, size.z, size.y, size.x),
        (2, 1, 0, 1.0, -1.0, size.z, size.y, -size.x),
        (0, 2, 1, 1.0, 1.0, size.x, size.z, size.y),
        (0, 2, 1, 1.0, -1.0, size.x, size.z, -size.y),
        (0, 1, 2, 1.0, -1.0, size.x, size.y, size.z),
        (0, 1, 2, -1.0, -1.0, size.x, size.y, -size.z),
    ];

    for (u, v, w, udir, vdir, width, height, depth) in faces {
        build_box_face(&mut mesh, [u, v, w], udir, vdir, width, height, depth, segments);
    }

    mesh
}

#[allow(clippy::too_many_arguments)]
fn build_box_face(
    mesh: &mut Mesh,
    axes: [usize; 3],
    udir: f32,
    vdir: f32,
    width: f32,
    height: f32,
    depth: f32,
    segments: u32,
) {
    let [u, v, w] = axes;
    let segment_width = width / segments as f32;
    let segment_height = height / segments as f32;
    let half_width = width / 2.0;
    let half_height = height / 2.0;
    let half_depth = depth / 2.0;
    let base = mesh.vertex_count();
    let row = segments as usize + 1;

    for iy in 0..=segments {
        let y = iy as f32 * segment_height - half_height;
        for ix in 0..=segments {
            let x = ix as f32 * segment_width - half_width;

            let mut position = Point3::origin();
            position[u] = x * udir;
            position[v] = y * vdir;
            position[w] = half_depth;

            let mut normal = Vector3::zeros();
            normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

            mesh.add_vertex(Vertex::new(position, normal));
        }
    }

    for iy in 0..segments as usize {
        for ix in 0..segments as usize {
            let a = base + ix + row * iy;
            let b = base + ix + row * (iy + 1);
            let c = base + (ix + 1) + row * (iy + 1);
            let d = base + (ix + 1) + row * iy;

            mesh.add_triangle(Triangle::new([a, b, d]));
            mesh.add_triangle(Triangle::new([b, c, d]));
        }
    }
}

fn generate_sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let mut mesh = Mesh::new();
    let mut grid: Vec<Vec<usize>> = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        let mut row = Vec::with_capacity(width_segments as usize + 1);

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;

            let position = Point3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            let normal = position
                .coords
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(|| Vector3::new(0.0, theta.cos().signum(), 0.0));
            row.push(mesh.add_vertex(Vertex::new(position, normal)));
        }

        grid.push(row);
    }

    // Pole rows collapse to a single point, so their degenerate half is skipped
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            if iy != 0 {
                mesh.add_triangle(Triangle::new([a, b, d]));
            }
            if iy != height_segments as usize - 1 {
                mesh.add_triangle(Triangle::new([b, c, d]));
            }
        }
    }

    mesh
}

fn generate_cylinder_mesh(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Mesh {
    let mut mesh = Mesh::new();
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    // Side wall: one ring at the top, one at the bottom
    let mut rings: Vec<Vec<usize>> = Vec::with_capacity(2);
    for y in 0..=1u32 {
        let v = y as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let mut ring = Vec::with_capacity(radial_segments as usize + 1);

        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            let position = Point3::new(radius * sin, -v * height + half_height, radius * cos);
            let normal = Vector3::new(sin, slope, cos).normalize();
            ring.push(mesh.add_vertex(Vertex::new(position, normal)));
        }

        rings.push(ring);
    }

    for x in 0..radial_segments as usize {
        let a = rings[0][x];
        let b = rings[1][x];
        let c = rings[1][x + 1];
        let d = rings[0][x + 1];

        mesh.add_triangle(Triangle::new([a, b, d]));
        mesh.add_triangle(Triangle::new([b, c, d]));
    }

    generate_cylinder_cap(&mut mesh, true, radius_top, half_height, radial_segments);
    generate_cylinder_cap(&mut mesh, false, radius_bottom, half_height, radial_segments);

    mesh
}

fn generate_cylinder_cap(mesh: &mut Mesh, top: bool, radius: f32, half_height: f32, radial_segments: u32) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vector3::new(0.0, sign, 0.0);

    // One center vertex per segment keeps cap triangles independent
    let center_start = mesh.vertex_count();
    for _ in 0..radial_segments {
        mesh.add_vertex(Vertex::new(Point3::new(0.0, half_height * sign, 0.0), normal));
    }

    let rim_start = mesh.vertex_count();
    for x in 0..=radial_segments {
        let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
        let (sin, cos) = theta.sin_cos();
        mesh.add_vertex(Vertex::new(
            Point3::new(radius * sin, half_height * sign, radius * cos),
            normal,
        ));
    }

    for x in 0..radial_segments as usize {
        let c = center_start + x;
        let i = rim_start + x;
        if top {
            mesh.add_triangle(Triangle::new([i, i + 1, c]));
        } else {
            mesh.add_triangle(Triangle::new([i + 1, i, c]));
        }
    }
}

fn generate_torus_mesh(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let mut mesh = Mesh::new();

    for j in 0..=radial_segments {
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * 2.0 * PI;
            let v = j as f32 / radial_segments as f32 * 2.0 * PI;

            let position = Point3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Point3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize();
            mesh.add_vertex(Vertex::new(position, normal));
        }
    }

    let row = tubular_segments as usize + 1;
    for j in 1..=radial_segments as usize {
        for i in 1..=tubular_segments as usize {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;

            mesh.add_triangle(Triangle::new([a, b, d]));
            mesh.add_triangle(Triangle::new([b, c, d]));
        }
    }

    mesh
}

fn torus_knot_curve(u: f32, p: u32, q: u32, radius: f32) -> Vector3<f32> {
    let (su, cu) = u.sin_cos();
    let qu_over_p = q as f32 / p as f32 * u;
    let cs = qu_over_p.cos();

    Vector3::new(
        radius * (2.0 + cs) * 0.5 * cu,
        radius * (2.0 + cs) * su * 0.5,
        radius * qu_over_p.sin() * 0.5,
    )
}

fn generate_torus_knot_mesh(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Mesh {
    let mut mesh = Mesh::new();

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32 * p as f32 * 2.0 * PI;

        // Frenet-like frame from two nearby curve samples
        let p1 = torus_knot_curve(u, p, q, radius);
        let p2 = torus_knot_curve(u + 0.01, p, q, radius);
        let tangent = p2 - p1;
        let mut normal = p2 + p1;
        let binormal = tangent.cross(&normal).normalize();
        normal = binormal.cross(&tangent).normalize();

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * 2.0 * PI;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();

            let position = Point3::from(p1 + normal * cx + binormal * cy);
            let vertex_normal = (position.coords - p1).normalize();
            mesh.add_vertex(Vertex::new(position, vertex_normal));
        }
    }

    let row = radial_segments as usize + 1;
    for j in 1..=tubular_segments as usize {
        for i in 1..=radial_segments as usize {
            let a = row * (j - 1) + (i - 1);
            let b = row * j + (i - 1);
            let c = row * j + i;
            let d = row * (j - 1) + i;

            mesh.add_triangle(Triangle::new([a, b, d]));
            mesh.add_triangle(Triangle::new([b, c, d]));
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::mesh_utils::{is_closed, is_manifold, is_watertight};

    #[test]
    fn test_cube_generation() {
        let mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), 1).to_mesh();
        assert_eq!(mesh.triangle_count(), 12);
        // Each face owns its own corner vertices for sharp normals
        assert_eq!(mesh.vertex_count(), 24);
        assert!(is_manifold(&mesh));

        let bbox = mesh.bounding_box();
        assert!(bbox.approx_eq(
            &crate::geometry::BoundingBox::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5)),
            1e-6
        ));
    }

    #[test]
    fn test_subdivided_cube_counts() {
        let primitive = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), 10);
        let mesh = primitive.to_mesh();
        assert_eq!(mesh.triangle_count(), 1200);
        assert_eq!(mesh.triangle_count(), primitive.triangle_count());
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), 2).to_mesh();
        for (i, tri) in mesh.triangles.iter().enumerate() {
            let [a, b, c] = mesh.triangle_positions(i);
            let face = (b - a).cross(&(c - a));
            assert!(face.dot(&mesh.vertices[tri.indices[0]].normal) > 0.0);
        }
    }

    #[test]
    fn test_sphere_skips_pole_triangles() {
        let primitive = Primitive::sphere(1.0, 8, 6);
        let mesh = primitive.to_mesh();
        assert_eq!(mesh.triangle_count(), 2 * 8 * 5);
        assert_eq!(mesh.triangle_count(), primitive.triangle_count());
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (v.position.coords.norm() - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_cylinder_counts() {
        let mesh = Primitive::cylinder(0.5, 0.5, 1.0, 16).to_mesh();
        assert_eq!(mesh.triangle_count(), 64);
        let bbox = mesh.bounding_box();
        assert!((bbox.max.y - 0.5).abs() < 1e-6);
        assert!((bbox.min.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_torus_seams_are_open() {
        let mesh = Primitive::torus(0.6, 0.2, 8, 12).to_mesh();
        assert_eq!(mesh.triangle_count(), 2 * 8 * 12);
        assert!(is_manifold(&mesh));
        // Seam vertices are duplicated, so the indexed torus is open along two seams
        assert!(!is_closed(&mesh));
        assert!(is_watertight(&mesh, 1e-4));
    }

    #[test]
    fn test_torus_knot_counts() {
        let primitive = Primitive::torus_knot(0.6, 0.2, 16, 4);
        let mesh = primitive.to_mesh();
        assert_eq!(mesh.triangle_count(), 128);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position.coords.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_segment_floors() {
        assert_eq!(Primitive::cube(Vector3::new(1.0, 1.0, 1.0), 0).triangle_count(), 12);
        assert_eq!(Primitive::sphere(1.0, 0, 0).triangle_count(), 2 * 3);
        assert_eq!(Primitive::cylinder(0.5, 0.5, 1.0, 1).triangle_count(), 12);
    }
}
