// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Brush geometry builder
//!
//! Produces de-indexed triangle soup tagged with a per-corner diagnostic color
//! stripe: corner 0 red, corner 1 green, corner 2 blue, for every triangle.

use super::{Complexity, Mesh, ShapeKind};
use crate::brush::BrushSlot;
use crate::error::{EditorError, Result};
use nalgebra::Vector3;
use tracing::trace;

/// Stripe colors written to triangle corners 0, 1 and 2
pub const STRIPE_COLORS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Build brush geometry for `shape` at `complexity`.
///
/// `source` is only consulted for [`ShapeKind::Mesh`]; when it is absent the
/// build fails with [`EditorError::MissingSourceMesh`] for `slot`.
pub fn build(
    shape: ShapeKind,
    complexity: Complexity,
    source: Option<&Mesh>,
    slot: BrushSlot,
) -> Result<Mesh> {
    let resolution = shape.resolution(complexity);

    let mut mesh = match resolution.primitive() {
        Some(primitive) => primitive.to_mesh().to_non_indexed(),
        None => {
            let source = source.ok_or(EditorError::MissingSourceMesh { slot })?;
            if source.is_non_indexed() {
                source.clone()
            } else {
                source.to_non_indexed()
            }
        }
    };

    apply_stripe_colors(&mut mesh);

    trace!(
        shape = %shape,
        complexity = complexity.value(),
        triangles = mesh.triangle_count(),
        "Built brush geometry"
    );

    Ok(mesh)
}

/// Overwrite vertex colors with the repeating red/green/blue corner stripe
pub fn apply_stripe_colors(mesh: &mut Mesh) {
    for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
        vertex.color = Vector3::from(STRIPE_COLORS[i % 3]);
    }
}

/// Check that every triangle carries the stripe pattern on its corners
pub fn has_stripe_colors(mesh: &Mesh) -> bool {
    mesh.triangles.iter().all(|t| {
        t.indices
            .iter()
            .zip(STRIPE_COLORS.iter())
            .all(|(&idx, stripe)| mesh.vertices[idx].color == Vector3::from(*stripe))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;

    #[test]
    fn test_box_build_is_striped_soup() {
        let mesh = build(ShapeKind::Box, Complexity::new(0.0), None, BrushSlot::A).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_non_indexed());
        assert!(has_stripe_colors(&mesh));
    }

    #[test]
    fn test_mesh_shape_without_source_fails() {
        let err = build(ShapeKind::Mesh, Complexity::default(), None, BrushSlot::B).unwrap_err();
        assert!(matches!(err, EditorError::MissingSourceMesh { slot: BrushSlot::B }));
    }

    #[test]
    fn test_mesh_shape_deep_copies_source() {
        let source = Primitive::sphere(2.0, 6, 4).to_mesh();
        let mesh = build(ShapeKind::Mesh, Complexity::default(), Some(&source), BrushSlot::A).unwrap();

        assert_eq!(mesh.triangle_count(), source.triangle_count());
        assert!(mesh.is_non_indexed());
        assert!(has_stripe_colors(&mesh));
        // The source keeps its own colors
        assert!(source.vertices.iter().all(|v| v.color == Vector3::new(1.0, 1.0, 1.0)));
    }
}
