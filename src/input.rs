// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Input events queued between frames, and the transform gizmo they drive

use crate::brush::{BrushSlot, Transform};
use crate::evaluator::Operation;
use crate::geometry::ShapeKind;
use crate::material::Color;
use crate::scene::DisplayToggle;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Everything the host application can tell the editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32, primary: bool },
    PointerUp { x: f32, y: f32 },
    /// The orbit controls moved the camera
    ViewChanged,
    Resize { width: f32, height: f32 },
    /// Physical key code, e.g. `"KeyW"`
    KeyDown(String),
    GizmoDragging(bool),
    /// The gizmo edited the transform of the brush it is attached to
    GizmoChange(Transform),

    SetShape { slot: BrushSlot, shape: ShapeKind },
    SetComplexity { slot: BrushSlot, complexity: f32 },
    SetColor { slot: BrushSlot, color: Color },
    SetTransform { slot: BrushSlot, transform: Transform },
    SetOperation(Operation),
    SetUseGroups(bool),
    SetVertexColors(bool),
    SetFlatShading(bool),
    SetGridTexture(bool),
    SetDiagnostics(bool),
    SetDisplay { toggle: DisplayToggle, enabled: bool },

    SetDecalScaleRange { min: f32, max: f32 },
    SetDecalRotate(bool),
    ClearDecals,
}

/// FIFO of events, drained once per frame
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<EditorEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EditorEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = EditorEvent> + '_ {
        self.events.drain(..)
    }
}

impl Extend<EditorEvent> for InputQueue {
    fn extend<T: IntoIterator<Item = EditorEvent>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GizmoMode {
    Translate,
    #[default]
    Rotate,
    Scale,
}

impl GizmoMode {
    /// `KeyW`, `KeyE` and `KeyR` select translate, rotate and scale
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(GizmoMode::Translate),
            "KeyE" => Some(GizmoMode::Rotate),
            "KeyR" => Some(GizmoMode::Scale),
            _ => None,
        }
    }
}

/// Transform gizmo state; it always manipulates brush B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gizmo {
    pub mode: GizmoMode,
    pub attached: BrushSlot,
    pub dragging: bool,
}

impl Default for Gizmo {
    fn default() -> Self {
        Self {
            mode: GizmoMode::Rotate,
            attached: BrushSlot::B,
            dragging: false,
        }
    }
}
