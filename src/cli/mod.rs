// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for brushlab

pub mod reporter;
pub mod runner;

pub use reporter::Reporter;
pub use runner::{demo_target, replay_decals, survey_shapes, DecalReplay, ShapeRow};
