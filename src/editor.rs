// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Frame driver: drains queued input, then runs exactly one scheduler tick

use crate::brush::{BrushSlot, Transform};
use crate::camera::{PerspectiveCamera, Viewport};
use crate::config::{EditorConfig, TargetConfig};
use crate::decal::{ClickGesture, DecalProjector, TargetId};
use crate::evaluator::BooleanEvaluator;
use crate::geometry::{BoxClipper, ClipGeometryGenerator, Mesh};
use crate::input::{EditorEvent, Gizmo, GizmoMode, InputQueue};
use crate::scene::CsgScene;
use crate::scheduler::{tick, TickReport};
use crate::state::SceneEditState;
use nalgebra::{Point2, Vector3};
use serde::Serialize;
use tracing::trace;

/// What the host should draw this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameView {
    pub wireframe: bool,
    pub brushes_visible: bool,
    pub gizmo_visible: bool,
    pub gizmo_enabled: bool,
    pub gizmo_mode: GizmoMode,
    pub orbit_enabled: bool,
    pub shadows: bool,
    pub intersection_edges_visible: bool,
    pub triangle_intersections_visible: bool,
    pub bvh_visible: [bool; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub tick: TickReport,
    /// Events drained this frame
    pub events: usize,
    /// Render orders of decals placed this frame
    pub placed: Vec<usize>,
    pub view: FrameView,
}

pub struct Editor<E: BooleanEvaluator, C: ClipGeometryGenerator = BoxClipper> {
    scene: CsgScene,
    state: SceneEditState,
    evaluator: E,
    projector: DecalProjector<C>,
    camera: PerspectiveCamera,
    viewport: Viewport,
    gesture: ClickGesture,
    gizmo: Gizmo,
    queue: InputQueue,
    target_placement: TargetConfig,
}

impl<E: BooleanEvaluator> Editor<E, BoxClipper> {
    pub fn new(config: &EditorConfig, evaluator: E) -> Self {
        Self::with_clipper(config, evaluator, BoxClipper)
    }
}

impl<E: BooleanEvaluator, C: ClipGeometryGenerator> Editor<E, C> {
    pub fn with_clipper(config: &EditorConfig, evaluator: E, clipper: C) -> Self {
        let config = config.sanitized();
        let viewport = Viewport::default();
        Self {
            scene: CsgScene::from_config(&config),
            state: SceneEditState::new(),
            evaluator,
            projector: DecalProjector::with_clipper(config.decals, clipper),
            camera: PerspectiveCamera::default(),
            viewport,
            gesture: ClickGesture::new(config.decals.drag_threshold),
            gizmo: Gizmo::default(),
            queue: InputQueue::new(),
            target_placement: config.target,
        }
    }

    pub fn push(&mut self, event: EditorEvent) {
        self.queue.push(event);
    }

    pub fn queue_mut(&mut self) -> &mut InputQueue {
        &mut self.queue
    }

    /// Install the decal target at the configured position and scale
    pub fn load_target(&mut self, mesh: Mesh) -> TargetId {
        let transform = Transform::from_uniform_scale(self.target_placement.scale)
            .with_translation(Vector3::from(self.target_placement.position));
        self.projector.set_target(mesh, transform)
    }

    /// Supply the imported mesh used by the mesh shape of `slot`
    pub fn set_source_mesh(&mut self, slot: BrushSlot, mesh: Mesh) {
        self.scene.set_source_mesh(&mut self.state, slot, mesh);
    }

    /// Drain queued input in order, then tick once
    pub fn frame(&mut self) -> FrameReport {
        let events: Vec<EditorEvent> = self.queue.drain().collect();
        let count = events.len();
        let mut placed = Vec::new();

        for event in events {
            if let Some(index) = self.handle(event) {
                placed.push(index);
            }
        }

        let (state, report) = tick(self.state, &mut self.scene, &mut self.evaluator);
        self.state = state;

        FrameReport {
            tick: report,
            events: count,
            placed,
            view: self.view(),
        }
    }

    fn handle(&mut self, event: EditorEvent) -> Option<usize> {
        trace!(?event, "Handling input");
        let state = &mut self.state;
        match event {
            EditorEvent::PointerDown { x, y } => self.gesture.pointer_down(Point2::new(x, y)),
            EditorEvent::PointerMove { x, y, primary } => {
                self.gesture.pointer_move(Point2::new(x, y));
                if primary {
                    let ray = self.camera.ray_from_screen(&self.viewport, x, y);
                    self.projector.check_intersection(&ray);
                }
            }
            EditorEvent::PointerUp { x, y } => {
                let click = self.gesture.pointer_up(Point2::new(x, y))?;
                let ray = self.camera.ray_from_screen(&self.viewport, click.x, click.y);
                return self.projector.click(&ray);
            }
            EditorEvent::ViewChanged => self.gesture.view_changed(),
            EditorEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                self.camera.aspect = self.viewport.aspect();
            }
            EditorEvent::KeyDown(code) => {
                if let Some(mode) = GizmoMode::from_key_code(&code) {
                    self.gizmo.mode = mode;
                }
            }
            EditorEvent::GizmoDragging(dragging) => self.gizmo.dragging = dragging,
            EditorEvent::GizmoChange(transform) => {
                if self.scene.params().display.display_controls {
                    self.scene.set_transform(state, self.gizmo.attached, transform);
                }
            }
            EditorEvent::SetShape { slot, shape } => {
                self.scene.set_shape(state, slot, shape);
            }
            EditorEvent::SetComplexity { slot, complexity } => {
                self.scene.set_complexity(state, slot, complexity);
            }
            EditorEvent::SetColor { slot, color } => self.scene.set_color(state, slot, color),
            EditorEvent::SetTransform { slot, transform } => {
                self.scene.set_transform(state, slot, transform)
            }
            EditorEvent::SetOperation(operation) => self.scene.set_operation(state, operation),
            EditorEvent::SetUseGroups(enabled) => self.scene.set_use_groups(state, enabled),
            EditorEvent::SetVertexColors(enabled) => self.scene.set_vertex_colors(state, enabled),
            EditorEvent::SetFlatShading(enabled) => self.scene.set_flat_shading(state, enabled),
            EditorEvent::SetGridTexture(enabled) => self.scene.set_grid_texture(enabled),
            EditorEvent::SetDiagnostics(enabled) => self.scene.set_diagnostics(state, enabled),
            EditorEvent::SetDisplay { toggle, enabled } => self.scene.set_display(toggle, enabled),
            EditorEvent::SetDecalScaleRange { min, max } => self.projector.set_scale_range(min, max),
            EditorEvent::SetDecalRotate(rotate) => self.projector.set_rotate(rotate),
            EditorEvent::ClearDecals => {
                self.projector.clear();
            }
        }
        None
    }

    /// Visibility and control state derived from the current parameters
    pub fn view(&self) -> FrameView {
        let params = self.scene.params();
        let debug = self.scene.debug();
        FrameView {
            wireframe: params.display.wireframe,
            brushes_visible: params.display.display_brushes,
            gizmo_visible: params.display.display_controls,
            gizmo_enabled: params.display.display_controls,
            gizmo_mode: self.gizmo.mode,
            orbit_enabled: !self.gizmo.dragging,
            shadows: params.display.shadows,
            intersection_edges_visible: debug.edges.visible,
            triangle_intersections_visible: debug.triangles.visible,
            bvh_visible: [debug.bvh[0].visible, debug.bvh[1].visible],
        }
    }

    pub fn scene(&self) -> &CsgScene {
        &self.scene
    }

    pub fn state(&self) -> SceneEditState {
        self.state
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn projector(&self) -> &DecalProjector<C> {
        &self.projector
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: PerspectiveCamera) {
        self.camera = PerspectiveCamera {
            aspect: self.viewport.aspect(),
            ..camera
        };
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn gizmo(&self) -> &Gizmo {
        &self.gizmo
    }
}
