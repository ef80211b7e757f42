// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Editable brushes
//!
//! A brush owns de-indexed geometry, a transform and a preview material
//! handle. Every mutation entry point marks the passed edit state dirty.

use crate::error::Result;
use crate::evaluator::BrushInput;
use crate::geometry::{self, Complexity, Mesh, ShapeKind, BVH};
use crate::material::MaterialId;
use crate::state::SceneEditState;
use nalgebra::{Matrix4, Similarity3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Smallest scale any brush axis may take
pub const MIN_BRUSH_SCALE: f32 = 0.01;

/// Brush slot; the editor always has exactly these two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BrushSlot {
    A,
    B,
}

impl BrushSlot {
    pub const ALL: [BrushSlot; 2] = [BrushSlot::A, BrushSlot::B];

    pub fn index(&self) -> usize {
        match self {
            BrushSlot::A => 0,
            BrushSlot::B => 1,
        }
    }
}

impl fmt::Display for BrushSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrushSlot::A => f.write_str("A"),
            BrushSlot::B => f.write_str("B"),
        }
    }
}

/// Translation, rotation and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn from_uniform_scale(scale: f32) -> Self {
        Self {
            scale: Vector3::repeat(scale),
            ..Self::identity()
        }
    }

    pub fn with_translation(mut self, translation: Vector3<f32>) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    /// Copy with every scale component raised to [`MIN_BRUSH_SCALE`].
    /// NaN components also become the minimum.
    pub fn sanitized(&self) -> Self {
        Self {
            scale: self.scale.map(|s| if s >= MIN_BRUSH_SCALE { s } else { MIN_BRUSH_SCALE }),
            ..*self
        }
    }

    /// `T * R * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        let rigid = Similarity3::from_parts(Translation3::from(self.translation), self.rotation, 1.0);
        rigid.to_homogeneous() * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// One of the two boolean inputs
#[derive(Debug, Clone)]
pub struct Brush {
    slot: BrushSlot,
    shape: ShapeKind,
    complexity: Complexity,
    geometry: Mesh,
    transform: Transform,
    world_matrix: Matrix4<f32>,
    material: MaterialId,
    generation: u64,
    bvh: BVH,
}

impl Brush {
    /// Empty brush; call [`Brush::rebuild`] to give it geometry
    pub fn new(slot: BrushSlot, material: MaterialId, transform: Transform) -> Self {
        let transform = transform.sanitized();
        let geometry = Mesh::new();
        Self {
            slot,
            shape: ShapeKind::Box,
            complexity: Complexity::default(),
            bvh: BVH::from_mesh(&geometry),
            geometry,
            world_matrix: transform.matrix(),
            transform,
            material,
            generation: 0,
        }
    }

    /// Replace geometry with a fresh build of `shape` at `complexity`.
    ///
    /// On error the brush keeps its previous shape and geometry and the state
    /// is left untouched.
    pub fn rebuild(
        &mut self,
        state: &mut SceneEditState,
        shape: ShapeKind,
        complexity: Complexity,
        source: Option<&Mesh>,
    ) -> Result<()> {
        let geometry = geometry::build(shape, complexity, source, self.slot)?;
        self.replace_geometry(geometry);
        self.shape = shape;
        self.complexity = complexity;
        state.mark_dirty();
        Ok(())
    }

    pub fn set_shape(&mut self, state: &mut SceneEditState, shape: ShapeKind, source: Option<&Mesh>) -> Result<()> {
        self.rebuild(state, shape, self.complexity, source)
    }

    pub fn set_complexity(
        &mut self,
        state: &mut SceneEditState,
        complexity: Complexity,
        source: Option<&Mesh>,
    ) -> Result<()> {
        self.rebuild(state, self.shape, complexity, source)
    }

    /// Store a new transform. The world matrix is refreshed by the scheduler.
    pub fn set_transform(&mut self, state: &mut SceneEditState, transform: Transform) {
        self.transform = transform.sanitized();
        state.mark_dirty();
    }

    fn replace_geometry(&mut self, geometry: Mesh) {
        let old = std::mem::replace(&mut self.geometry, geometry);
        trace!(
            slot = %self.slot,
            generation = self.generation,
            triangles = old.triangle_count(),
            "Disposed brush geometry"
        );
        drop(old);
        self.generation += 1;
        self.bvh = BVH::from_mesh(&self.geometry);
    }

    /// Recompute the world matrix from the current transform
    pub fn update_world_matrix(&mut self) -> Matrix4<f32> {
        self.world_matrix = self.transform.matrix();
        self.world_matrix
    }

    pub fn as_input(&self) -> BrushInput<'_> {
        BrushInput {
            slot: self.slot,
            geometry: &self.geometry,
            world: self.world_matrix,
            material: self.material,
        }
    }

    pub fn slot(&self) -> BrushSlot {
        self.slot
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    pub fn geometry(&self) -> &Mesh {
        &self.geometry
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// World matrix as of the last [`Brush::update_world_matrix`]
    pub fn world_matrix(&self) -> &Matrix4<f32> {
        &self.world_matrix
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Number of geometry replacements so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Local-space triangle BVH, rebuilt with every geometry replacement
    pub fn bvh(&self) -> &BVH {
        &self.bvh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::material::{Color, Material, MaterialStore};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn brush() -> Brush {
        let mut store = MaterialStore::new();
        let material = store.insert(Material::brush_preview("a", Color::WHITE));
        Brush::new(BrushSlot::A, material, Transform::from_uniform_scale(0.5))
    }

    #[test]
    fn test_sanitized_scale() {
        let t = Transform::identity()
            .with_scale(Vector3::new(-1.0, 0.0, f32::NAN))
            .sanitized();
        assert_eq!(t.scale, Vector3::repeat(MIN_BRUSH_SCALE));

        let t = Transform::from_uniform_scale(2.0).sanitized();
        assert_eq!(t.scale, Vector3::repeat(2.0));
    }

    #[test]
    fn test_matrix_applies_scale_then_translation() {
        let t = Transform::from_uniform_scale(2.0).with_translation(Vector3::new(1.0, 0.0, 0.0));
        let p = t.matrix().transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(3.0, 2.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_rebuild_marks_dirty_and_bumps_generation() {
        let mut b = brush();
        let mut state = SceneEditState::clean();
        b.rebuild(&mut state, ShapeKind::Box, Complexity::new(0.0), None).unwrap();
        assert!(state.is_dirty());
        assert_eq!(b.generation(), 1);
        assert_eq!(b.geometry().triangle_count(), 12);
        assert_eq!(b.bvh().bounds(), b.geometry().bounding_box());

        b.set_complexity(&mut state, Complexity::new(1.0), None).unwrap();
        assert_eq!(b.generation(), 2);
        assert_eq!(b.geometry().triangle_count(), 1200);
    }

    #[test]
    fn test_missing_source_leaves_brush_untouched() {
        let mut b = brush();
        let mut state = SceneEditState::clean();
        b.rebuild(&mut state, ShapeKind::Sphere, Complexity::new(0.0), None).unwrap();
        let mut state = SceneEditState::clean();

        let err = b.set_shape(&mut state, ShapeKind::Mesh, None).unwrap_err();
        assert!(matches!(err, EditorError::MissingSourceMesh { slot: BrushSlot::A }));
        assert!(!state.is_dirty());
        assert_eq!(b.shape(), ShapeKind::Sphere);
        assert_eq!(b.generation(), 1);
    }

    #[test]
    fn test_world_matrix_refreshes_on_demand() {
        let mut b = brush();
        let mut state = SceneEditState::clean();
        let moved = Transform::from_uniform_scale(0.5).with_translation(Vector3::new(0.0, 3.0, 0.0));
        b.set_transform(&mut state, moved);
        assert!(state.is_dirty());
        assert_ne!(*b.world_matrix(), moved.matrix());
        b.update_world_matrix();
        assert_eq!(*b.world_matrix(), moved.matrix());
    }
}
