// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Decal projection subsystem

mod gesture;
mod instance;
mod projector;
mod target;

pub use gesture::{ClickGesture, GestureState};
pub use instance::DecalInstance;
pub use projector::{
    orientation_from_normal, DecalProjector, HitRecord, PlacementCursor, PlacementSample,
    CURSOR_LINE_LENGTH,
};
pub use target::{DecalTarget, TargetId};
