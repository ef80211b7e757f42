// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use super::BoundingBox;
use crate::utils::math::transform_normal;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Vertex with position, normal and a diagnostic RGB color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            position,
            normal,
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.color = color;
        self
    }

    pub fn transform(&mut self, matrix: &Matrix4<f32>) {
        self.position = matrix.transform_point(&self.position);
        self.normal = transform_normal(matrix, &self.normal);
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Triangular mesh.
///
/// Procedural generators emit indexed meshes; brushes and decals hold the
/// de-indexed form where triangle `i` owns vertices `3i..3i+3`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    /// Optional per-vertex texture coordinates (empty when absent)
    #[serde(default)]
    pub uvs: Vec<Vector2<f32>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            uvs: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            uvs: Vec::new(),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append three fresh vertices forming one triangle
    pub fn push_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        let i0 = self.add_vertex(a);
        let i1 = self.add_vertex(b);
        let i2 = self.add_vertex(c);
        self.add_triangle(Triangle::new([i0, i1, i2]));
    }

    /// Transform all vertices by a matrix
    pub fn transform(&mut self, matrix: &Matrix4<f32>) {
        for vertex in &mut self.vertices {
            vertex.transform(matrix);
        }
    }

    /// Transformed copy of this mesh
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Mesh {
        let mut mesh = self.clone();
        mesh.transform(matrix);
        mesh
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of one triangle
    pub fn triangle_positions(&self, index: usize) -> [Point3<f32>; 3] {
        let t = &self.triangles[index];
        [
            self.vertices[t.indices[0]].position,
            self.vertices[t.indices[1]].position,
            self.vertices[t.indices[2]].position,
        ]
    }

    /// Merge with another mesh (simple concatenation)
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);

        for triangle in &other.triangles {
            self.triangles.push(Triangle::new([
                triangle.indices[0] + offset,
                triangle.indices[1] + offset,
                triangle.indices[2] + offset,
            ]));
        }

        // Texture coordinates survive only when both sides carry them
        if self.uvs.len() + other.uvs.len() == self.vertices.len() {
            self.uvs.extend_from_slice(&other.uvs);
        } else {
            self.uvs.clear();
        }
    }

    /// True when every triangle owns three consecutive, unshared vertices
    pub fn is_non_indexed(&self) -> bool {
        self.vertices.len() == self.triangles.len() * 3
            && self
                .triangles
                .iter()
                .enumerate()
                .all(|(i, t)| t.indices == [3 * i, 3 * i + 1, 3 * i + 2])
    }

    /// Expand shared vertices so each triangle owns its own three vertices
    pub fn to_non_indexed(&self) -> Mesh {
        let carry_uvs = self.uvs.len() == self.vertices.len();
        let mut mesh = Mesh::with_capacity(self.triangles.len() * 3, self.triangles.len());

        for triangle in &self.triangles {
            for &idx in &triangle.indices {
                mesh.vertices.push(self.vertices[idx]);
                if carry_uvs {
                    mesh.uvs.push(self.uvs[idx]);
                }
            }
            let base = mesh.vertices.len() - 3;
            mesh.triangles.push(Triangle::new([base, base + 1, base + 2]));
        }

        mesh
    }

    /// Recompute per-vertex normals by area-weighted averaging of face normals
    pub fn recompute_normals(&mut self) {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return;
        }

        let mut normal_sums: Vec<Vector3<f32>> = vec![Vector3::zeros(); self.vertices.len()];
        let mut normal_counts: Vec<u32> = vec![0; self.vertices.len()];

        for triangle in &self.triangles {
            let v0 = &self.vertices[triangle.indices[0]];
            let v1 = &self.vertices[triangle.indices[1]];
            let v2 = &self.vertices[triangle.indices[2]];

            // Cross product length is twice the area, so the sum is area-weighted
            let face_normal = (v1.position - v0.position).cross(&(v2.position - v0.position));
            if face_normal.norm() > 1e-12 {
                for &idx in &triangle.indices {
                    normal_sums[idx] += face_normal;
                    normal_counts[idx] += 1;
                }
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.normal = if normal_counts[i] > 0 {
                normal_sums[i].normalize()
            } else {
                Vector3::new(0.0, 0.0, 1.0)
            };
        }
    }
}
