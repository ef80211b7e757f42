// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Explicit edit state threaded through every mutation and scheduler tick

use serde::{Deserialize, Serialize};

/// Dirty flag plus counters, passed by value into the scheduler.
///
/// Mutations only ever set `dirty`; the scheduler alone clears it, and only
/// in the same step that records an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEditState {
    dirty: bool,
    frame: u64,
    evaluations: u64,
}

impl SceneEditState {
    /// Fresh state; dirty so the first frame produces a result
    pub fn new() -> Self {
        Self {
            dirty: true,
            frame: 0,
            evaluations: 0,
        }
    }

    /// State with nothing pending
    pub fn clean() -> Self {
        Self {
            dirty: false,
            ..Self::new()
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub(crate) fn next_frame(self) -> Self {
        Self {
            frame: self.frame + 1,
            ..self
        }
    }

    pub(crate) fn evaluated(self) -> Self {
        Self {
            dirty: false,
            evaluations: self.evaluations + 1,
            ..self
        }
    }
}

impl Default for SceneEditState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_dirty() {
        let state = SceneEditState::default();
        assert!(state.is_dirty());
        assert_eq!(state.evaluations(), 0);
    }

    #[test]
    fn test_evaluated_clears_and_counts() {
        let mut state = SceneEditState::clean();
        state.mark_dirty();
        state.mark_dirty();
        let next = state.next_frame().evaluated();
        assert!(!next.is_dirty());
        assert_eq!(next.evaluations(), 1);
        assert_eq!(next.frame(), 1);
        // The original value is untouched
        assert!(state.is_dirty());
    }
}
