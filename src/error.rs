// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for the editing core

use crate::brush::BrushSlot;
use crate::material::MaterialId;
use thiserror::Error;

/// Errors raised by the editing core.
///
/// Missing-dependency variants describe normal startup ordering; callers at the
/// scene and projector level log and skip them instead of surfacing them.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The imported-mesh shape was requested before a source mesh was supplied.
    #[error("no source mesh supplied for brush {slot}")]
    MissingSourceMesh {
        /// Brush that requested the import.
        slot: BrushSlot,
    },

    /// A decal operation ran before the target mesh finished loading.
    #[error("decal target mesh is not loaded")]
    TargetNotLoaded,

    /// Shape name did not match any known shape.
    #[error("unknown shape: {0}")]
    UnknownShape(String),

    /// Operation name did not match any known boolean operation.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Color string could not be parsed as `#rrggbb`.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Material handle not present in the store.
    #[error("unknown material handle {0}")]
    UnknownMaterial(MaterialId),
}

/// Result type for the editing core.
pub type Result<T> = std::result::Result<T, EditorError>;
