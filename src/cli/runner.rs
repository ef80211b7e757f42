// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Headless drivers behind the CLI subcommands

use crate::brush::{BrushSlot, Transform};
use crate::config::EditorConfig;
use crate::decal::DecalProjector;
use crate::geometry::{self, mesh_utils, BoundingBox, Complexity, Mesh, Primitive, Ray, Resolution, ShapeKind};
use crate::io::import_stl;
use anyhow::Result;
use nalgebra::{Matrix4, Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// One row of the shape survey
#[derive(Debug, Clone, Serialize)]
pub struct ShapeRow {
    pub shape: ShapeKind,
    pub resolution: Resolution,
    pub expected_triangles: Option<usize>,
    pub triangles: usize,
    pub watertight: bool,
    pub duration: Duration,
}

/// Build every procedural shape at `complexity`
pub fn survey_shapes(complexity: f32) -> Vec<ShapeRow> {
    let complexity = Complexity::new(complexity);
    ShapeKind::ALL
        .into_iter()
        .filter(|shape| *shape != ShapeKind::Mesh)
        .filter_map(|shape| {
            let start = Instant::now();
            let mesh = geometry::build(shape, complexity, None, BrushSlot::A).ok()?;
            let resolution = shape.resolution(complexity);
            Some(ShapeRow {
                shape,
                resolution,
                expected_triangles: resolution.expected_triangles(),
                triangles: mesh.triangle_count(),
                watertight: mesh_utils::is_watertight(&mesh, 1e-4),
                duration: start.elapsed(),
            })
        })
        .collect()
}

/// Outcome of replaying random clicks against a target
#[derive(Debug, Clone, Serialize)]
pub struct DecalReplay {
    pub clicks: usize,
    pub placed: usize,
    pub triangles: usize,
    pub bounds: BoundingBox,
    pub duration: Duration,
}

/// Flat 40x40 slab whose top face sits at y = 0
pub fn demo_target() -> Mesh {
    let mut mesh = Primitive::cube(Vector3::new(40.0, 1.0, 40.0), 8).to_mesh();
    mesh.transform(&Matrix4::new_translation(&Vector3::new(0.0, -0.5, 0.0)));
    mesh
}

/// Fire `clicks` straight-down rays at random points over the target and
/// place a decal on every hit
pub fn replay_decals(config: &EditorConfig, target: Option<&Path>, clicks: usize) -> Result<DecalReplay> {
    let mesh = match target {
        Some(path) => import_stl(path)?,
        None => demo_target(),
    };

    let transform = Transform::from_uniform_scale(config.target.scale)
        .with_translation(Vector3::from(config.target.position));
    let mut projector = DecalProjector::new(config.decals);
    projector.set_target(mesh, transform);

    let world_bounds = projector
        .target()
        .map(|t| t.mesh().bounding_box().transformed(t.world()))
        .unwrap_or_else(BoundingBox::empty);
    let mut rng = StdRng::seed_from_u64(config.decals.seed.unwrap_or(0));
    // Stay clear of the silhouette so grazing rays do not skew the count
    let (center, half) = (world_bounds.center(), world_bounds.size() * 0.45);

    let start = Instant::now();
    for _ in 0..clicks {
        let x = center.x + rng.gen_range(-1.0f32..=1.0) * half.x;
        let z = center.z + rng.gen_range(-1.0f32..=1.0) * half.z;
        let ray = Ray::new(Point3::new(x, world_bounds.max.y + 10.0, z), -Vector3::y());
        if projector.click(&ray).is_none() {
            debug!(x, z, "Click missed target");
        }
    }

    let target_world = projector
        .target()
        .map(|t| *t.world())
        .unwrap_or_else(Matrix4::identity);
    let bounds = projector
        .decals()
        .iter()
        .fold(BoundingBox::empty(), |acc, d| acc.union(&d.world_bounds(&target_world)));

    Ok(DecalReplay {
        clicks,
        placed: projector.decals().len(),
        triangles: projector.decals().iter().map(|d| d.triangle_count()).sum(),
        bounds,
        duration: start.elapsed(),
    })
}
