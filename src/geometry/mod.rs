// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation, brush shapes and spatial queries

mod bbox;
pub mod builder;
mod bvh;
pub mod clip;
mod mesh;
pub mod mesh_utils;
mod primitives;
pub mod raycast;
mod shape;

pub use bbox::BoundingBox;
pub use builder::build;
pub use bvh::{BVHNode, BVH};
pub use clip::{BoxClipper, ClipGeometryGenerator, ClipTarget};
pub use mesh::{Mesh, Triangle, Vertex};
pub use primitives::Primitive;
pub use raycast::{MeshCollider, Ray, RayHit};
pub use shape::{Complexity, Resolution, ShapeKind};
