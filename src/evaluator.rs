// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean evaluator contract
//!
//! The mesh-clipping algorithm lives outside this crate. This module fixes the
//! shape of what an evaluator receives and what it must write back, so the
//! scheduler can drive any implementation.

use crate::brush::BrushSlot;
use crate::error::EditorError;
use crate::geometry::Mesh;
use crate::material::MaterialId;
use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Set operation applied to the two brushes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    #[serde(alias = "addition")]
    Union,
    #[default]
    Subtraction,
    ReverseSubtraction,
    Intersection,
    #[serde(alias = "difference")]
    SymmetricDifference,
    HollowIntersection,
    HollowSubtraction,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Union,
        Operation::Subtraction,
        Operation::ReverseSubtraction,
        Operation::Intersection,
        Operation::SymmetricDifference,
        Operation::HollowIntersection,
        Operation::HollowSubtraction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Union => "union",
            Operation::Subtraction => "subtraction",
            Operation::ReverseSubtraction => "reverse-subtraction",
            Operation::Intersection => "intersection",
            Operation::SymmetricDifference => "symmetric-difference",
            Operation::HollowIntersection => "hollow-intersection",
            Operation::HollowSubtraction => "hollow-subtraction",
        }
    }

    /// Hollow results expose back faces and need two-sided materials
    pub fn is_hollow(&self) -> bool {
        matches!(self, Operation::HollowIntersection | Operation::HollowSubtraction)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "union" | "addition" => Ok(Operation::Union),
            "difference" | "symmetric-difference" => Ok(Operation::SymmetricDifference),
            other => Operation::ALL
                .into_iter()
                .find(|op| op.name() == other)
                .ok_or_else(|| EditorError::UnknownOperation(s.to_string())),
        }
    }
}

/// Vertex attribute carried through evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Position,
    Normal,
    Color,
}

/// Attribute list for the current vertex-color setting
pub fn attributes_for(vertex_colors: bool) -> Vec<Attribute> {
    if vertex_colors {
        vec![Attribute::Color, Attribute::Position, Attribute::Normal]
    } else {
        vec![Attribute::Position, Attribute::Normal]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorOptions {
    pub attributes: Vec<Attribute>,
    pub use_groups: bool,
    pub debug_enabled: bool,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            attributes: attributes_for(false),
            use_groups: true,
            debug_enabled: true,
        }
    }
}

/// Read-only view of a brush handed to the evaluator
#[derive(Debug, Clone, Copy)]
pub struct BrushInput<'a> {
    pub slot: BrushSlot,
    /// Local-space de-indexed geometry
    pub geometry: &'a Mesh,
    pub world: Matrix4<f32>,
    pub material: MaterialId,
}

/// Material slot assignment on the result mesh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialAssignment {
    Single(MaterialId),
    /// One material per group index
    Groups(Vec<MaterialId>),
}

impl MaterialAssignment {
    pub fn ids(&self) -> Vec<MaterialId> {
        match self {
            MaterialAssignment::Single(id) => vec![*id],
            MaterialAssignment::Groups(ids) => ids.clone(),
        }
    }
}

/// Contiguous triangle range drawn with one material slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryGroup {
    pub start: usize,
    pub count: usize,
    pub material_index: usize,
}

/// Shared output target the evaluator writes into
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMesh {
    pub geometry: Mesh,
    pub groups: Vec<GeometryGroup>,
    pub material: MaterialAssignment,
}

impl ResultMesh {
    pub fn new(material: MaterialId) -> Self {
        Self {
            geometry: Mesh::new(),
            groups: Vec::new(),
            material: MaterialAssignment::Single(material),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
}

pub type DebugTriangle = [Point3<f32>; 3];

/// Triangles of one brush that intersect the other, each with the triangles it hit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleIntersections {
    pub entries: Vec<(DebugTriangle, Vec<DebugTriangle>)>,
}

impl TriangleIntersections {
    pub fn add(&mut self, triangle: DebugTriangle, intersecting: Vec<DebugTriangle>) {
        self.entries.push((triangle, intersecting));
    }

    pub fn triangles(&self) -> Vec<DebugTriangle> {
        self.entries.iter().map(|(t, _)| *t).collect()
    }

    pub fn intersections(&self) -> Vec<DebugTriangle> {
        self.entries
            .iter()
            .flat_map(|(_, hits)| hits.iter().copied())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Diagnostic payload, populated only when debugging is enabled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugInfo {
    pub intersection_edges: Vec<[Point3<f32>; 2]>,
    pub triangle_intersects_a: TriangleIntersections,
    pub triangle_intersects_b: TriangleIntersections,
}

impl DebugInfo {
    pub fn is_empty(&self) -> bool {
        self.intersection_edges.is_empty()
            && self.triangle_intersects_a.is_empty()
            && self.triangle_intersects_b.is_empty()
    }
}

/// Boolean (CSG) evaluation of two brushes.
///
/// Implementations must accept every [`Operation`], must treat empty or
/// degenerate brushes as an empty result instead of failing, and must leave
/// `target.material` as [`MaterialAssignment::Groups`] holding the source brush
/// materials when `options.use_groups` is set, or [`MaterialAssignment::Single`]
/// otherwise.
pub trait BooleanEvaluator {
    fn evaluate(
        &mut self,
        a: &BrushInput<'_>,
        b: &BrushInput<'_>,
        operation: Operation,
        target: &mut ResultMesh,
        options: &EvaluatorOptions,
    ) -> DebugInfo;
}

impl<E: BooleanEvaluator + ?Sized> BooleanEvaluator for Box<E> {
    fn evaluate(
        &mut self,
        a: &BrushInput<'_>,
        b: &BrushInput<'_>,
        operation: Operation,
        target: &mut ResultMesh,
        options: &EvaluatorOptions,
    ) -> DebugInfo {
        (**self).evaluate(a, b, operation, target, options)
    }
}
