// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Diagnostic helper state: intersection edges, triangle sets, brush BVH boxes

use crate::brush::{Brush, BrushSlot};
use crate::evaluator::{DebugInfo, DebugTriangle};
use crate::geometry::BoundingBox;
use crate::material::Color;
use nalgebra::Point3;

pub const INTERSECTION_EDGE_COLOR: u32 = 0xE91E63;
pub const TRIANGLE_SET_COLOR: u32 = 0x00BCD4;

/// Depth the editor's BVH visualizers walk to
pub const BVH_VISUALIZER_DEPTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct EdgesHelper {
    pub color: Color,
    pub edges: Vec<[Point3<f32>; 2]>,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriangleSetHelper {
    pub color: Color,
    pub triangles: Vec<DebugTriangle>,
    pub visible: bool,
}

/// Node boxes of one brush's BVH
#[derive(Debug, Clone, PartialEq)]
pub struct BvhHelper {
    pub depth: usize,
    pub boxes: Vec<BoundingBox>,
    pub visible: bool,
    /// Brush geometry generation the boxes were built from
    pub generation: u64,
}

impl BvhHelper {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            boxes: Vec::new(),
            visible: false,
            generation: 0,
        }
    }

    fn update(&mut self, brush: &Brush) {
        self.boxes = brush.bvh().node_boxes(self.depth);
        self.generation = brush.generation();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugHelpers {
    pub edges: EdgesHelper,
    pub triangles: TriangleSetHelper,
    pub bvh: [BvhHelper; 2],
}

impl DebugHelpers {
    pub fn new() -> Self {
        Self {
            edges: EdgesHelper {
                color: Color::from_hex(INTERSECTION_EDGE_COLOR),
                edges: Vec::new(),
                visible: false,
            },
            triangles: TriangleSetHelper {
                color: Color::from_hex(TRIANGLE_SET_COLOR),
                triangles: Vec::new(),
                visible: false,
            },
            bvh: [
                BvhHelper::new(BVH_VISUALIZER_DEPTH),
                BvhHelper::new(BVH_VISUALIZER_DEPTH),
            ],
        }
    }

    /// Replace edge and triangle sets with a fresh evaluator payload.
    /// The triangle helper shows brush A's intersecting triangles followed by
    /// the triangles they hit.
    pub fn apply(&mut self, info: DebugInfo) {
        let mut triangles = info.triangle_intersects_a.triangles();
        triangles.extend(info.triangle_intersects_a.intersections());
        self.edges.edges = info.intersection_edges;
        self.triangles.triangles = triangles;
    }

    /// Rebuild the BVH boxes for a brush whose geometry changed
    pub fn refresh_bvh(&mut self, brush: &Brush) {
        let helper = &mut self.bvh[brush.slot().index()];
        if helper.generation != brush.generation() || helper.boxes.is_empty() {
            helper.update(brush);
        }
    }

    pub fn bvh_helper(&self, slot: BrushSlot) -> &BvhHelper {
        &self.bvh[slot.index()]
    }
}

impl Default for DebugHelpers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Transform;
    use crate::evaluator::TriangleIntersections;
    use crate::geometry::{Complexity, ShapeKind};
    use crate::material::{Material, MaterialStore};
    use crate::state::SceneEditState;

    #[test]
    fn test_apply_collects_a_triangles() {
        let tri = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        let mut a = TriangleIntersections::default();
        a.add(tri, vec![tri, tri]);
        let info = DebugInfo {
            intersection_edges: vec![[Point3::origin(), Point3::new(0.0, 0.0, 1.0)]],
            triangle_intersects_a: a,
            ..Default::default()
        };

        let mut helpers = DebugHelpers::new();
        helpers.apply(info);
        assert_eq!(helpers.edges.edges.len(), 1);
        assert_eq!(helpers.triangles.triangles.len(), 3);
        assert_eq!(helpers.edges.color.to_hex(), INTERSECTION_EDGE_COLOR);
    }

    #[test]
    fn test_bvh_helper_tracks_generation() {
        let mut store = MaterialStore::new();
        let material = store.insert(Material::flat_result());
        let mut brush = Brush::new(BrushSlot::B, material, Transform::identity());
        let mut state = SceneEditState::clean();
        brush
            .rebuild(&mut state, ShapeKind::Box, Complexity::new(1.0), None)
            .unwrap();

        let mut helpers = DebugHelpers::new();
        helpers.refresh_bvh(&brush);
        let helper = helpers.bvh_helper(BrushSlot::B);
        assert_eq!(helper.generation, brush.generation());
        assert!(helper.boxes.len() > 1);
        assert!(helpers.bvh_helper(BrushSlot::A).boxes.is_empty());
    }
}
