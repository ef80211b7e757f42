// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-frame recompute scheduler

use crate::evaluator::{BooleanEvaluator, Operation};
use crate::scene::CsgScene;
use crate::state::SceneEditState;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub frame: u64,
    pub evaluated: bool,
    pub operation: Operation,
    pub triangle_count: usize,
    /// Wall-clock evaluation time, when an evaluation ran
    pub elapsed: Option<Duration>,
}

/// Run one frame of the recompute pipeline.
///
/// When `state` is clean only the frame counter advances. When dirty, both
/// brush world matrices are refreshed, the evaluator runs exactly once, the
/// result materials are remapped, diagnostics are forwarded if enabled, and
/// the returned state is clean.
pub fn tick<E: BooleanEvaluator + ?Sized>(
    state: SceneEditState,
    scene: &mut CsgScene,
    evaluator: &mut E,
) -> (SceneEditState, TickReport) {
    let state = state.next_frame();
    let operation = scene.params().operation;

    if !state.is_dirty() {
        scene.update_helper_visibility();
        return (
            state,
            TickReport {
                frame: state.frame(),
                evaluated: false,
                operation,
                triangle_count: scene.result().triangle_count(),
                elapsed: None,
            },
        );
    }

    scene.refresh_world_matrices();

    let start = Instant::now();
    let info = scene.run_evaluator(evaluator);
    scene.remap_result_materials();
    let elapsed = start.elapsed();

    // Helpers keep their last payload while diagnostics are off
    if scene.params().diagnostics.enabled {
        scene.apply_debug(info);
    }
    scene.update_helper_visibility();

    let triangle_count = scene.result().triangle_count();
    debug!(
        frame = state.frame(),
        operation = %operation,
        triangles = triangle_count,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Evaluated brushes"
    );

    let state = state.evaluated();
    (
        state,
        TickReport {
            frame: state.frame(),
            evaluated: true,
            operation,
            triangle_count,
            elapsed: Some(elapsed),
        },
    )
}
