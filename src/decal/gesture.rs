// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Click-without-drag gesture recognition

use nalgebra::Point2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    Tracking { origin: Point2<f32>, moved: bool },
}

/// Tracks one pointer press; a release counts as a click only when neither
/// the view nor the pointer moved in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickGesture {
    state: GestureState,
    drag_threshold: f32,
}

impl ClickGesture {
    pub fn new(drag_threshold: f32) -> Self {
        Self {
            state: GestureState::Idle,
            drag_threshold: drag_threshold.max(0.0),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn pointer_down(&mut self, position: Point2<f32>) {
        self.state = GestureState::Tracking {
            origin: position,
            moved: false,
        };
    }

    pub fn pointer_move(&mut self, position: Point2<f32>) {
        if let GestureState::Tracking { origin, moved } = &mut self.state {
            if (position - *origin).norm() > self.drag_threshold {
                *moved = true;
            }
        }
    }

    /// Orbiting or panning the view cancels any pending click
    pub fn view_changed(&mut self) {
        if let GestureState::Tracking { moved, .. } = &mut self.state {
            *moved = true;
        }
    }

    /// Returns the release position when the press completes as a click
    pub fn pointer_up(&mut self, position: Point2<f32>) -> Option<Point2<f32>> {
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        match state {
            GestureState::Tracking { moved: false, .. } => Some(position),
            _ => None,
        }
    }
}

impl Default for ClickGesture {
    fn default() -> Self {
        Self::new(2.0)
    }
}
