// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Brushlab
//!
//! Interactive brush editing and decal projection core. Two brushes are
//! combined through a pluggable [`BooleanEvaluator`] once per frame when the
//! scene is dirty, and decals are projected onto a loaded target mesh from
//! pointer clicks.

pub mod brush;
pub mod camera;
pub mod cli;
pub mod config;
pub mod debug;
pub mod decal;
pub mod editor;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod input;
pub mod io;
pub mod material;
pub mod material_map;
pub mod scene;
pub mod scheduler;
pub mod state;
pub mod utils;

pub use brush::{Brush, BrushSlot, Transform, MIN_BRUSH_SCALE};
pub use camera::{PerspectiveCamera, Viewport};
pub use config::EditorConfig;
pub use decal::{DecalInstance, DecalProjector, DecalTarget, TargetId};
pub use editor::{Editor, FrameReport, FrameView};
pub use error::{EditorError, Result};
pub use evaluator::{
    BooleanEvaluator, BrushInput, DebugInfo, EvaluatorOptions, Operation, ResultMesh,
};
pub use geometry::{Complexity, Mesh, ShapeKind};
pub use input::{EditorEvent, InputQueue};
pub use material::{Color, Material, MaterialId, MaterialStore};
pub use scene::{CsgScene, DisplayToggle, SceneParams};
pub use scheduler::{tick, TickReport};
pub use state::SceneEditState;
