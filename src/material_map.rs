// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Preview/final material pairing
//!
//! Every translucent preview material used by a brush has exactly one opaque
//! final counterpart. Grouped evaluation results are drawn with the finals,
//! so any shared toggle must land on both sides of a pair.

use crate::error::Result;
use crate::evaluator::Operation;
use crate::material::{Color, MaterialId, MaterialStore, Side};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Flags kept identical across both materials of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedToggle {
    VertexColors,
    FlatShading,
    GridTexture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pair {
    preview: MaterialId,
    final_id: MaterialId,
    // Sides at pairing time, restored when leaving a hollow mode
    preview_side: Side,
    final_side: Side,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialPairs {
    pairs: Vec<Pair>,
    index: BTreeMap<MaterialId, usize>,
}

impl MaterialPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `preview` with a new final material, or return the existing one.
    pub fn register(&mut self, store: &mut MaterialStore, preview: MaterialId) -> Result<MaterialId> {
        if let Some(existing) = self.final_for(preview) {
            return Ok(existing);
        }

        let preview_material = store.get(preview)?;
        let preview_side = preview_material.side;
        let final_material = preview_material.to_final();
        let final_side = final_material.side;
        let final_id = store.insert(final_material);

        self.index.insert(preview, self.pairs.len());
        self.pairs.push(Pair {
            preview,
            final_id,
            preview_side,
            final_side,
        });
        debug!(preview = %preview, final_material = %final_id, "Registered material pair");
        Ok(final_id)
    }

    pub fn final_for(&self, preview: MaterialId) -> Option<MaterialId> {
        self.index.get(&preview).map(|&i| self.pairs[i].final_id)
    }

    /// `(preview, final)` handles in registration order
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, MaterialId)> + '_ {
        self.pairs.iter().map(|p| (p.preview, p.final_id))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Set a shared flag on every preview and final material
    pub fn apply_shared(&self, store: &mut MaterialStore, toggle: SharedToggle, enabled: bool) -> Result<()> {
        for pair in &self.pairs {
            for id in [pair.preview, pair.final_id] {
                let material = store.get_mut(id)?;
                match toggle {
                    SharedToggle::VertexColors => {
                        material.vertex_colors = enabled;
                        material.mark_updated();
                    }
                    SharedToggle::FlatShading => {
                        material.flat_shading = enabled;
                        material.mark_updated();
                    }
                    SharedToggle::GridTexture => material.grid_texture = enabled,
                }
            }
        }
        Ok(())
    }

    /// Recolor a preview material and its final twin
    pub fn set_color(&self, store: &mut MaterialStore, preview: MaterialId, color: Color) -> Result<()> {
        store.get_mut(preview)?.color = color;
        if let Some(final_id) = self.final_for(preview) {
            store.get_mut(final_id)?.color = color;
        }
        Ok(())
    }

    /// Hollow operations render both sides of every paired material; any other
    /// operation restores the sides recorded when each pair was registered.
    pub fn apply_operation_sidedness(&self, store: &mut MaterialStore, operation: Operation) -> Result<()> {
        for pair in &self.pairs {
            let (preview_side, final_side) = if operation.is_hollow() {
                (Side::Double, Side::Double)
            } else {
                (pair.preview_side, pair.final_side)
            };
            store.get_mut(pair.preview)?.side = preview_side;
            store.get_mut(pair.final_id)?.side = final_side;
        }
        Ok(())
    }

    /// Map per-group preview handles to their finals. Handles without a pair
    /// pass through unchanged.
    pub fn remap_groups(&self, groups: &[MaterialId]) -> Vec<MaterialId> {
        groups
            .iter()
            .map(|&id| {
                self.final_for(id).unwrap_or_else(|| {
                    warn!(material = %id, "Group material has no final pair");
                    id
                })
            })
            .collect()
    }

    /// True when every pair agrees on `toggle`
    pub fn is_consistent(&self, store: &MaterialStore, toggle: SharedToggle) -> bool {
        self.pairs.iter().all(|pair| {
            match (store.get(pair.preview), store.get(pair.final_id)) {
                (Ok(preview), Ok(fin)) => match toggle {
                    SharedToggle::VertexColors => preview.vertex_colors == fin.vertex_colors,
                    SharedToggle::FlatShading => preview.flat_shading == fin.flat_shading,
                    SharedToggle::GridTexture => preview.grid_texture == fin.grid_texture,
                },
                _ => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn setup() -> (MaterialStore, MaterialPairs, MaterialId, MaterialId) {
        let mut store = MaterialStore::new();
        let a = store.insert(Material::brush_preview("a", Color::WHITE));
        let b = store.insert(Material::brush_preview("b", Color::from_hex(0xE91E63)));
        let mut pairs = MaterialPairs::new();
        pairs.register(&mut store, a).unwrap();
        pairs.register(&mut store, b).unwrap();
        (store, pairs, a, b)
    }

    #[test]
    fn test_register_is_idempotent() {
        let (mut store, mut pairs, a, _) = setup();
        let first = pairs.final_for(a).unwrap();
        let again = pairs.register(&mut store, a).unwrap();
        assert_eq!(first, again);
        assert_eq!(pairs.len(), 2);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_final_is_opaque_front() {
        let (store, pairs, a, _) = setup();
        let fin = store.get(pairs.final_for(a).unwrap()).unwrap();
        assert_eq!(fin.side, Side::Front);
        assert!(!fin.transparent);
        assert!(fin.depth_write);
    }

    #[test]
    fn test_shared_toggles_stay_consistent() {
        let (mut store, pairs, _, _) = setup();
        for toggle in [SharedToggle::VertexColors, SharedToggle::FlatShading, SharedToggle::GridTexture] {
            pairs.apply_shared(&mut store, toggle, true).unwrap();
            assert!(pairs.is_consistent(&store, toggle));
            pairs.apply_shared(&mut store, toggle, false).unwrap();
            assert!(pairs.is_consistent(&store, toggle));
        }
    }

    #[test]
    fn test_hollow_round_trip_restores_sides() {
        let (mut store, pairs, a, _) = setup();
        let before: Vec<_> = store.iter().map(|(_, m)| m.side).collect();

        pairs
            .apply_operation_sidedness(&mut store, Operation::HollowSubtraction)
            .unwrap();
        assert!(store.iter().all(|(_, m)| m.side == Side::Double));

        pairs.apply_operation_sidedness(&mut store, Operation::Union).unwrap();
        let after: Vec<_> = store.iter().map(|(_, m)| m.side).collect();
        assert_eq!(before, after);
        assert_eq!(store.get(pairs.final_for(a).unwrap()).unwrap().side, Side::Front);
    }

    #[test]
    fn test_remap_groups() {
        let (mut store, pairs, a, b) = setup();
        let stray = store.insert(Material::flat_result());
        let mapped = pairs.remap_groups(&[b, a, stray]);
        assert_eq!(mapped[0], pairs.final_for(b).unwrap());
        assert_eq!(mapped[1], pairs.final_for(a).unwrap());
        assert_eq!(mapped[2], stray);
    }

    #[test]
    fn test_set_color_updates_both() {
        let (mut store, pairs, a, _) = setup();
        let red = Color::new(1.0, 0.0, 0.0);
        pairs.set_color(&mut store, a, red).unwrap();
        assert_eq!(store.get(a).unwrap().color, red);
        assert_eq!(store.get(pairs.final_for(a).unwrap()).unwrap().color, red);
    }
}
