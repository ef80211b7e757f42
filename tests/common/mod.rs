// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared fixtures for integration tests

#![allow(dead_code)]

use brushlab::evaluator::{GeometryGroup, MaterialAssignment};
use brushlab::geometry::{BoundingBox, Mesh};
use brushlab::{BooleanEvaluator, BrushInput, DebugInfo, EditorConfig, EvaluatorOptions, Operation, ResultMesh};
use nalgebra::Point3;

/// Stand-in evaluator: subtraction keeps the triangles of A whose centroid lies
/// outside B's world bounds, every other operation concatenates both brushes.
#[derive(Debug, Default)]
pub struct CountingEvaluator {
    pub calls: usize,
    pub last_operation: Option<Operation>,
}

impl CountingEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

fn world_mesh(input: &BrushInput<'_>) -> Mesh {
    input.geometry.transformed(&input.world)
}

fn centroid(mesh: &Mesh, index: usize) -> Point3<f32> {
    let [a, b, c] = mesh.triangle_positions(index);
    Point3::from((a.coords + b.coords + c.coords) / 3.0)
}

fn append(target: &mut Mesh, source: &Mesh, keep: impl Fn(usize) -> bool) -> usize {
    let mut added = 0;
    for (i, triangle) in source.triangles.iter().enumerate() {
        if !keep(i) {
            continue;
        }
        let [a, b, c] = triangle.indices.map(|idx| source.vertices[idx]);
        target.push_triangle(a, b, c);
        added += 1;
    }
    added
}

impl BooleanEvaluator for CountingEvaluator {
    fn evaluate(
        &mut self,
        a: &BrushInput<'_>,
        b: &BrushInput<'_>,
        operation: Operation,
        target: &mut ResultMesh,
        options: &EvaluatorOptions,
    ) -> DebugInfo {
        self.calls += 1;
        self.last_operation = Some(operation);

        let mut geometry = Mesh::new();
        let mut groups = Vec::new();

        if !a.geometry.is_empty() {
            let world_a = world_mesh(a);
            let world_b = world_mesh(b);
            let count_a = if matches!(operation, Operation::Subtraction | Operation::HollowSubtraction) {
                let bounds: BoundingBox = world_b.bounding_box();
                append(&mut geometry, &world_a, |i| {
                    !bounds.contains_point(&centroid(&world_a, i), 0.0)
                })
            } else {
                append(&mut geometry, &world_a, |_| true)
            };
            groups.push(GeometryGroup {
                start: 0,
                count: count_a,
                material_index: 0,
            });

            if !matches!(operation, Operation::Subtraction | Operation::HollowSubtraction) {
                let count_b = append(&mut geometry, &world_b, |_| true);
                groups.push(GeometryGroup {
                    start: count_a,
                    count: count_b,
                    material_index: 1,
                });
            }
        }

        target.geometry = geometry;
        if options.use_groups {
            target.groups = groups;
            target.material = MaterialAssignment::Groups(vec![a.material, b.material]);
        } else {
            target.groups.clear();
            target.material = MaterialAssignment::Single(a.material);
        }

        DebugInfo::default()
    }
}

/// Two box brushes at unit scale, full tessellation, deterministic decals
pub fn box_scene_config() -> EditorConfig {
    let mut config = EditorConfig::default();
    config.brush_b.shape = brushlab::ShapeKind::Box;
    config.brush_a.scale = 1.0;
    config.brush_b.scale = 1.0;
    config.decals.seed = Some(42);
    config.target.position = [0.0, 0.0, 0.0];
    config.target.scale = 1.0;
    config
}
