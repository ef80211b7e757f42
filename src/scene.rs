// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG scene: two brushes, their materials, the shared result and the
//! parameters that steer evaluation

use crate::brush::{Brush, BrushSlot, Transform};
use crate::config::{DiagnosticsConfig, DisplayConfig, EditorConfig};
use crate::debug::DebugHelpers;
use crate::error::{EditorError, Result};
use crate::evaluator::{
    attributes_for, BooleanEvaluator, DebugInfo, EvaluatorOptions, MaterialAssignment, Operation,
    ResultMesh,
};
use crate::geometry::{Complexity, Mesh, ShapeKind};
use crate::material::{Color, Material, MaterialId, MaterialStore};
use crate::material_map::{MaterialPairs, SharedToggle};
use crate::state::SceneEditState;
use tracing::debug;

/// Parameters shared by both brushes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneParams {
    pub operation: Operation,
    pub use_groups: bool,
    pub vertex_colors: bool,
    pub flat_shading: bool,
    pub grid_texture: bool,
    pub diagnostics: DiagnosticsConfig,
    pub display: DisplayConfig,
}

/// Display toggles that only affect what is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayToggle {
    Wireframe,
    Brushes,
    Controls,
    Shadows,
    BrushBvh(BrushSlot),
    IntersectionEdges,
    TriangleIntersections,
}

#[derive(Debug, Clone)]
pub struct CsgScene {
    brushes: [Brush; 2],
    // Shape the user asked for; differs from the built shape while a mesh
    // brush waits for its source
    requested: [ShapeKind; 2],
    sources: [Option<Mesh>; 2],
    materials: MaterialStore,
    pairs: MaterialPairs,
    flat_material: MaterialId,
    result: ResultMesh,
    params: SceneParams,
    debug: DebugHelpers,
}

impl CsgScene {
    /// Scene set up as described by `config`. Out-of-range values are clamped.
    pub fn from_config(config: &EditorConfig) -> Self {
        let config = config.sanitized();
        let mut materials = MaterialStore::new();

        let preview_a = materials.insert(Material::brush_preview("brush-a", config.brush_a.color));
        let preview_b = materials.insert(Material {
            roughness: 0.25,
            ..Material::brush_preview("brush-b", config.brush_b.color)
        });
        let flat_material = materials.insert(Material::flat_result());

        let mut brushes = [
            Brush::new(
                BrushSlot::A,
                preview_a,
                Transform::from_uniform_scale(config.brush_a.scale),
            ),
            Brush::new(
                BrushSlot::B,
                preview_b,
                Transform::from_uniform_scale(config.brush_b.scale),
            ),
        ];

        let mut pairs = MaterialPairs::new();
        for brush in &brushes {
            // Handles were just inserted, so pairing cannot miss
            if let Err(err) = pairs.register(&mut materials, brush.material()) {
                debug!(error = %err, "Material pairing skipped");
            }
        }

        // Startup builds never mark anything; the initial state is already dirty
        let mut startup = SceneEditState::new();
        for (brush, brush_config) in brushes.iter_mut().zip([&config.brush_a, &config.brush_b]) {
            if let Err(err) = brush.rebuild(
                &mut startup,
                brush_config.shape,
                Complexity::new(brush_config.complexity),
                None,
            ) {
                debug!(slot = %brush.slot(), error = %err, "Skipped initial brush build");
            }
        }

        let mut scene = Self {
            brushes,
            requested: [config.brush_a.shape, config.brush_b.shape],
            sources: [None, None],
            materials,
            pairs,
            flat_material,
            result: ResultMesh::new(flat_material),
            params: SceneParams {
                operation: config.operation,
                use_groups: config.use_groups,
                vertex_colors: config.vertex_colors,
                flat_shading: config.flat_shading,
                grid_texture: config.grid_texture,
                diagnostics: config.diagnostics,
                display: config.display,
            },
            debug: DebugHelpers::new(),
        };

        scene.sync_materials();
        for slot in BrushSlot::ALL {
            scene.debug.refresh_bvh(&scene.brushes[slot.index()]);
        }
        scene
    }

    pub fn new() -> Self {
        Self::from_config(&EditorConfig::default())
    }

    /// Push the current shared toggles and operation sidedness onto every pair
    fn sync_materials(&mut self) {
        let toggles = [
            (SharedToggle::VertexColors, self.params.vertex_colors),
            (SharedToggle::FlatShading, self.params.flat_shading),
            (SharedToggle::GridTexture, self.params.grid_texture),
        ];
        for (toggle, enabled) in toggles {
            log_skip(self.pairs.apply_shared(&mut self.materials, toggle, enabled));
        }
        log_skip(
            self.pairs
                .apply_operation_sidedness(&mut self.materials, self.params.operation),
        );
        if let Ok(flat) = self.materials.get_mut(self.flat_material) {
            flat.flat_shading = self.params.flat_shading;
        }
    }

    pub fn brush(&self, slot: BrushSlot) -> &Brush {
        &self.brushes[slot.index()]
    }

    pub fn brushes(&self) -> &[Brush; 2] {
        &self.brushes
    }

    pub fn materials(&self) -> &MaterialStore {
        &self.materials
    }

    pub fn pairs(&self) -> &MaterialPairs {
        &self.pairs
    }

    pub fn flat_material(&self) -> MaterialId {
        self.flat_material
    }

    pub fn result(&self) -> &ResultMesh {
        &self.result
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn debug(&self) -> &DebugHelpers {
        &self.debug
    }

    pub fn source_mesh(&self, slot: BrushSlot) -> Option<&Mesh> {
        self.sources[slot.index()].as_ref()
    }

    /// Shape last requested for `slot`, built or not
    pub fn requested_shape(&self, slot: BrushSlot) -> ShapeKind {
        self.requested[slot.index()]
    }

    /// Supply the imported mesh for `slot`. A brush waiting on the mesh
    /// shape picks it up immediately.
    pub fn set_source_mesh(&mut self, state: &mut SceneEditState, slot: BrushSlot, mesh: Mesh) {
        self.sources[slot.index()] = Some(mesh);
        if self.requested_shape(slot) == ShapeKind::Mesh {
            self.set_shape(state, slot, ShapeKind::Mesh);
        }
    }

    /// Swap the brush shape. Missing source meshes leave the brush as it was
    /// until the source arrives.
    pub fn set_shape(&mut self, state: &mut SceneEditState, slot: BrushSlot, shape: ShapeKind) -> bool {
        let i = slot.index();
        self.requested[i] = shape;
        let outcome = self.brushes[i].set_shape(state, shape, self.sources[i].as_ref());
        self.after_rebuild(slot, outcome)
    }

    /// Rebuild at `complexity` using the requested shape
    pub fn set_complexity(&mut self, state: &mut SceneEditState, slot: BrushSlot, complexity: f32) -> bool {
        let i = slot.index();
        let outcome = self.brushes[i].rebuild(
            state,
            self.requested[i],
            Complexity::new(complexity),
            self.sources[i].as_ref(),
        );
        self.after_rebuild(slot, outcome)
    }

    fn after_rebuild(&mut self, slot: BrushSlot, outcome: Result<()>) -> bool {
        match outcome {
            Ok(()) => {
                self.debug.refresh_bvh(&self.brushes[slot.index()]);
                true
            }
            Err(err @ EditorError::MissingSourceMesh { .. }) => {
                debug!(slot = %slot, error = %err, "Brush rebuild skipped");
                false
            }
            Err(err) => {
                debug!(slot = %slot, error = %err, "Brush rebuild failed");
                false
            }
        }
    }

    /// Tint a brush's preview material and its final twin
    pub fn set_color(&mut self, state: &mut SceneEditState, slot: BrushSlot, color: Color) {
        let preview = self.brush(slot).material();
        let outcome = self.pairs.set_color(&mut self.materials, preview, color);
        if outcome.is_ok() {
            state.mark_dirty();
        }
        log_skip(outcome);
    }

    pub fn set_transform(&mut self, state: &mut SceneEditState, slot: BrushSlot, transform: Transform) {
        self.brushes[slot.index()].set_transform(state, transform);
    }

    pub fn set_operation(&mut self, state: &mut SceneEditState, operation: Operation) {
        self.params.operation = operation;
        log_skip(self.pairs.apply_operation_sidedness(&mut self.materials, operation));
        state.mark_dirty();
    }

    pub fn set_use_groups(&mut self, state: &mut SceneEditState, enabled: bool) {
        self.params.use_groups = enabled;
        state.mark_dirty();
    }

    pub fn set_vertex_colors(&mut self, state: &mut SceneEditState, enabled: bool) {
        self.params.vertex_colors = enabled;
        log_skip(
            self.pairs
                .apply_shared(&mut self.materials, SharedToggle::VertexColors, enabled),
        );
        state.mark_dirty();
    }

    pub fn set_flat_shading(&mut self, state: &mut SceneEditState, enabled: bool) {
        self.params.flat_shading = enabled;
        log_skip(
            self.pairs
                .apply_shared(&mut self.materials, SharedToggle::FlatShading, enabled),
        );
        if let Ok(flat) = self.materials.get_mut(self.flat_material) {
            flat.flat_shading = enabled;
        }
        state.mark_dirty();
    }

    /// Grid overlay is a material-only change and does not need re-evaluation
    pub fn set_grid_texture(&mut self, enabled: bool) {
        self.params.grid_texture = enabled;
        log_skip(
            self.pairs
                .apply_shared(&mut self.materials, SharedToggle::GridTexture, enabled),
        );
    }

    pub fn set_diagnostics(&mut self, state: &mut SceneEditState, enabled: bool) {
        self.params.diagnostics.enabled = enabled;
        state.mark_dirty();
    }

    pub fn set_display(&mut self, toggle: DisplayToggle, enabled: bool) {
        let display = &mut self.params.display;
        match toggle {
            DisplayToggle::Wireframe => display.wireframe = enabled,
            DisplayToggle::Brushes => display.display_brushes = enabled,
            DisplayToggle::Controls => display.display_controls = enabled,
            DisplayToggle::Shadows => display.shadows = enabled,
            DisplayToggle::BrushBvh(BrushSlot::A) => display.display_brush_a_bvh = enabled,
            DisplayToggle::BrushBvh(BrushSlot::B) => display.display_brush_b_bvh = enabled,
            DisplayToggle::IntersectionEdges => {
                self.params.diagnostics.display_intersection_edges = enabled
            }
            DisplayToggle::TriangleIntersections => {
                self.params.diagnostics.display_triangle_intersections = enabled
            }
        }
    }

    pub fn evaluator_options(&self) -> EvaluatorOptions {
        EvaluatorOptions {
            attributes: attributes_for(self.params.vertex_colors),
            use_groups: self.params.use_groups,
            debug_enabled: self.params.diagnostics.enabled,
        }
    }

    pub(crate) fn refresh_world_matrices(&mut self) {
        for brush in &mut self.brushes {
            brush.update_world_matrix();
        }
    }

    pub(crate) fn run_evaluator<E: BooleanEvaluator + ?Sized>(&mut self, evaluator: &mut E) -> DebugInfo {
        let options = self.evaluator_options();
        let [a, b] = &self.brushes;
        evaluator.evaluate(
            &a.as_input(),
            &b.as_input(),
            self.params.operation,
            &mut self.result,
            &options,
        )
    }

    /// Replace the result's material assignment. Geometry is never touched.
    pub(crate) fn remap_result_materials(&mut self) {
        self.result.material = if self.params.use_groups {
            match &self.result.material {
                MaterialAssignment::Groups(ids) => MaterialAssignment::Groups(self.pairs.remap_groups(ids)),
                MaterialAssignment::Single(id) => {
                    MaterialAssignment::Groups(self.pairs.remap_groups(std::slice::from_ref(id)))
                }
            }
        } else {
            MaterialAssignment::Single(self.flat_material)
        };
    }

    pub(crate) fn apply_debug(&mut self, info: DebugInfo) {
        self.debug.apply(info);
    }

    /// Recompute helper visibility from the current parameters
    pub(crate) fn update_helper_visibility(&mut self) {
        let diagnostics = self.params.diagnostics;
        let display = self.params.display;
        self.debug.edges.visible = diagnostics.enabled && diagnostics.display_intersection_edges;
        self.debug.triangles.visible = diagnostics.enabled && diagnostics.display_triangle_intersections;
        self.debug.bvh[BrushSlot::A.index()].visible = display.display_brush_a_bvh;
        self.debug.bvh[BrushSlot::B.index()].visible = display.display_brush_b_bvh;
    }
}

fn log_skip(result: Result<()>) {
    if let Err(err) = result {
        debug!(error = %err, "Skipped material update");
    }
}

impl Default for CsgScene {
    fn default() -> Self {
        Self::new()
    }
}
