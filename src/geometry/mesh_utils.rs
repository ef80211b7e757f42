// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh connectivity checks

use super::Mesh;
use serde::Serialize;
use std::collections::HashMap;

/// Edge representation for connectivity checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    v0: usize,
    v1: usize,
}

impl Edge {
    fn new(v0: usize, v1: usize) -> Self {
        // Smaller index first for consistent hashing
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }
}

fn count_edges(triangles: impl Iterator<Item = [usize; 3]>) -> HashMap<Edge, u32> {
    let mut edge_counts: HashMap<Edge, u32> = HashMap::new();
    for [a, b, c] in triangles {
        for edge in [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)] {
            *edge_counts.entry(edge).or_insert(0) += 1;
        }
    }
    edge_counts
}

fn build_edge_counts(mesh: &Mesh) -> HashMap<Edge, u32> {
    count_edges(mesh.triangles.iter().map(|t| t.indices))
}

/// Check if mesh is manifold (each edge shared by at most 2 triangles)
pub fn is_manifold(mesh: &Mesh) -> bool {
    build_edge_counts(mesh).values().all(|&count| count <= 2)
}

/// Check if mesh is closed (each edge shared by exactly 2 triangles)
pub fn is_closed(mesh: &Mesh) -> bool {
    build_edge_counts(mesh).values().all(|&count| count == 2)
}

/// Map each vertex to a shared index for every vertex within `tolerance`
/// of it. Positions are bucketed on a grid of that size.
fn weld_indices(mesh: &Mesh, tolerance: f32) -> Vec<usize> {
    let cell = tolerance.max(f32::EPSILON);
    let mut seen: HashMap<(i64, i64, i64), usize> = HashMap::new();
    mesh.vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let key = (
                (v.position.x / cell).round() as i64,
                (v.position.y / cell).round() as i64,
                (v.position.z / cell).round() as i64,
            );
            *seen.entry(key).or_insert(i)
        })
        .collect()
}

/// Closedness after welding coincident positions. Seam-split and
/// de-indexed meshes are watertight when their surface has no holes.
pub fn is_watertight(mesh: &Mesh, tolerance: f32) -> bool {
    if mesh.is_empty() {
        return false;
    }
    let welded = weld_indices(mesh, tolerance);
    count_edges(
        mesh.triangles
            .iter()
            .map(|t| t.indices.map(|i| welded[i]))
            // Collapsed triangles carry no surface
            .filter(|[a, b, c]| a != b && b != c && c != a),
    )
    .values()
    .all(|&count| count == 2)
}

/// Connectivity summary for a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeshValidation {
    pub is_manifold: bool,
    pub is_closed: bool,
    pub is_watertight: bool,
    pub edge_count: usize,
    pub boundary_edge_count: usize,
}

pub fn validate_mesh(mesh: &Mesh) -> MeshValidation {
    let edge_counts = build_edge_counts(mesh);
    let boundary_edges = edge_counts.values().filter(|&&count| count == 1).count();

    MeshValidation {
        is_manifold: edge_counts.values().all(|&count| count <= 2),
        is_closed: edge_counts.values().all(|&count| count == 2),
        is_watertight: is_watertight(mesh, 1e-4),
        edge_count: edge_counts.len(),
        boundary_edge_count: boundary_edges,
    }
}
