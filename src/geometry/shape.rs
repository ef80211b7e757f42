// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Brush shape descriptors and complexity-driven tessellation resolution

use super::Primitive;
use crate::error::EditorError;
use crate::utils::math::{clamp, round_lerp};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape a brush can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Sphere,
    Box,
    Cylinder,
    Torus,
    #[serde(alias = "torus knot")]
    TorusKnot,
    /// Deep copy of a caller-supplied source mesh
    #[serde(alias = "imported-mesh")]
    Mesh,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Sphere,
        ShapeKind::Box,
        ShapeKind::Cylinder,
        ShapeKind::Torus,
        ShapeKind::TorusKnot,
        ShapeKind::Mesh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Box => "box",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Torus => "torus",
            ShapeKind::TorusKnot => "torus-knot",
            ShapeKind::Mesh => "mesh",
        }
    }

    /// Tessellation parameters for this shape at `complexity`
    pub fn resolution(&self, complexity: Complexity) -> Resolution {
        let t = complexity.value();
        match self {
            ShapeKind::Sphere => Resolution::Sphere {
                width_segments: round_lerp(5, 32, t),
                height_segments: round_lerp(5, 16, t),
            },
            ShapeKind::Box => Resolution::Box {
                segments: round_lerp(1, 10, t),
            },
            ShapeKind::Cylinder => Resolution::Cylinder {
                radial_segments: round_lerp(5, 32, t),
            },
            ShapeKind::Torus => Resolution::Torus {
                radial_segments: round_lerp(4, 16, t),
                tubular_segments: round_lerp(6, 30, t),
            },
            ShapeKind::TorusKnot => Resolution::TorusKnot {
                tubular_segments: round_lerp(16, 64, t),
                radial_segments: round_lerp(4, 16, t),
            },
            ShapeKind::Mesh => Resolution::Imported,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sphere" => Ok(ShapeKind::Sphere),
            "box" | "cube" => Ok(ShapeKind::Box),
            "cylinder" => Ok(ShapeKind::Cylinder),
            "torus" => Ok(ShapeKind::Torus),
            "torus-knot" | "torus knot" | "torusknot" => Ok(ShapeKind::TorusKnot),
            "mesh" | "imported-mesh" => Ok(ShapeKind::Mesh),
            other => Err(EditorError::UnknownShape(other.to_string())),
        }
    }
}

/// Complexity scalar, always within [0, 2]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Complexity(f32);

impl Complexity {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 2.0;

    /// Out-of-range values are clamped, never rejected
    pub fn new(value: f32) -> Self {
        Self(clamp(value, Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f32> for Complexity {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Complexity> for f32 {
    fn from(value: Complexity) -> Self {
        value.0
    }
}

/// Integer tessellation parameters derived from a shape and a complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Sphere { width_segments: u32, height_segments: u32 },
    Box { segments: u32 },
    Cylinder { radial_segments: u32 },
    Torus { radial_segments: u32, tubular_segments: u32 },
    TorusKnot { tubular_segments: u32, radial_segments: u32 },
    Imported,
}

impl Resolution {
    /// Procedural primitive with the brush dimensions used by the editor
    pub fn primitive(&self) -> Option<Primitive> {
        match *self {
            Resolution::Sphere {
                width_segments,
                height_segments,
            } => Some(Primitive::sphere(1.0, width_segments, height_segments)),
            Resolution::Box { segments } => {
                Some(Primitive::cube(Vector3::new(1.0, 1.0, 1.0), segments))
            }
            Resolution::Cylinder { radial_segments } => {
                Some(Primitive::cylinder(0.5, 0.5, 1.0, radial_segments))
            }
            Resolution::Torus {
                radial_segments,
                tubular_segments,
            } => Some(Primitive::torus(0.6, 0.2, radial_segments, tubular_segments)),
            Resolution::TorusKnot {
                tubular_segments,
                radial_segments,
            } => Some(Primitive::torus_knot(0.6, 0.2, tubular_segments, radial_segments)),
            Resolution::Imported => None,
        }
    }

    /// Triangle count implied by the resolution, unknown for imported meshes
    pub fn expected_triangles(&self) -> Option<usize> {
        self.primitive().map(|p| p.triangle_count())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Sphere {
                width_segments,
                height_segments,
            } => write!(f, "{}x{}", width_segments, height_segments),
            Resolution::Box { segments } => write!(f, "{0}x{0}x{0}", segments),
            Resolution::Cylinder { radial_segments } => write!(f, "{}", radial_segments),
            Resolution::Torus {
                radial_segments,
                tubular_segments,
            } => write!(f, "{}x{}", radial_segments, tubular_segments),
            Resolution::TorusKnot {
                tubular_segments,
                radial_segments,
            } => write!(f, "{}x{}", tubular_segments, radial_segments),
            Resolution::Imported => f.write_str("source"),
        }
    }
}
