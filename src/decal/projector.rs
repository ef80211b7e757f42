// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Decal projection: hit testing, cursor placement and decal lifecycle

use super::{DecalInstance, DecalTarget, TargetId};
use crate::brush::Transform;
use crate::config::{DecalConfig, DECAL_SCALE_RANGE};
use crate::error::{EditorError, Result};
use crate::geometry::{BoxClipper, ClipGeometryGenerator, Mesh, Ray};
use crate::material::{Color, Material};
use crate::utils::math::{clamp, transform_normal};
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use tracing::{debug, info};

/// Length of the normal indicator drawn at the cursor
pub const CURSOR_LINE_LENGTH: f32 = 10.0;

/// Result of the most recent hit test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub hit: bool,
    pub point: Point3<f32>,
    /// Face normal in the target's local space
    pub normal: Vector3<f32>,
    pub world_normal: Vector3<f32>,
}

impl HitRecord {
    fn miss() -> Self {
        Self {
            hit: false,
            point: Point3::origin(),
            normal: Vector3::zeros(),
            world_normal: Vector3::zeros(),
        }
    }
}

/// Placement cursor frame: +Z follows the surface normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementCursor {
    pub position: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
    /// Normal indicator segment `[point, point + 10 * normal]`
    pub line: [Point3<f32>; 2],
}

/// Random draws behind one placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSample {
    /// Edge length of the cubic clip box
    pub scale: f32,
    /// Tint hue in [0, 1)
    pub hue: f32,
    /// Rotation about the surface normal, in radians
    pub twist: Option<f32>,
}

/// Orientation whose +Z axis points along `normal`
pub fn orientation_from_normal(normal: &Vector3<f32>) -> UnitQuaternion<f32> {
    let up = if normal.y.abs() > 0.999 { Vector3::z() } else { Vector3::y() };
    UnitQuaternion::face_towards(normal, &up)
}

#[derive(Debug)]
pub struct DecalProjector<C: ClipGeometryGenerator = BoxClipper> {
    settings: DecalConfig,
    target: Option<DecalTarget>,
    next_target_id: u32,
    decals: Vec<DecalInstance>,
    hit: HitRecord,
    cursor: Option<PlacementCursor>,
    tint: Material,
    clipper: C,
    rng: StdRng,
}

impl DecalProjector<BoxClipper> {
    pub fn new(settings: DecalConfig) -> Self {
        Self::with_clipper(settings, BoxClipper)
    }
}

impl<C: ClipGeometryGenerator> DecalProjector<C> {
    pub fn with_clipper(settings: DecalConfig, clipper: C) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut projector = Self {
            settings,
            target: None,
            next_target_id: 0,
            decals: Vec::new(),
            hit: HitRecord::miss(),
            cursor: None,
            tint: Material::decal_tint(),
            clipper,
            rng,
        };
        projector.set_scale_range(settings.min_scale, settings.max_scale);
        projector
    }

    /// Install the mesh decals project onto. Decals on a previous target are dropped.
    pub fn set_target(&mut self, mesh: Mesh, transform: Transform) -> TargetId {
        let dropped = self.clear();
        let id = TargetId(self.next_target_id);
        self.next_target_id += 1;
        info!(
            target = %id,
            triangles = mesh.triangle_count(),
            dropped_decals = dropped,
            "Decal target loaded"
        );
        self.target = Some(DecalTarget::new(id, mesh, transform));
        self.hit = HitRecord::miss();
        self.cursor = None;
        id
    }

    pub fn target(&self) -> Option<&DecalTarget> {
        self.target.as_ref()
    }

    pub fn set_target_transform(&mut self, transform: Transform) -> Result<()> {
        let target = self.target.as_mut().ok_or(EditorError::TargetNotLoaded)?;
        target.set_transform(transform);
        Ok(())
    }

    pub fn settings(&self) -> &DecalConfig {
        &self.settings
    }

    /// Clamp both bounds into range and order them
    pub fn set_scale_range(&mut self, min_scale: f32, max_scale: f32) {
        let (lo, hi) = DECAL_SCALE_RANGE;
        let (a, b) = (clamp(min_scale, lo, hi), clamp(max_scale, lo, hi));
        self.settings.min_scale = a.min(b);
        self.settings.max_scale = a.max(b);
    }

    pub fn set_rotate(&mut self, rotate: bool) {
        self.settings.rotate = rotate;
    }

    pub fn hit(&self) -> &HitRecord {
        &self.hit
    }

    pub fn cursor(&self) -> Option<&PlacementCursor> {
        self.cursor.as_ref()
    }

    pub fn decals(&self) -> &[DecalInstance] {
        &self.decals
    }

    /// Number of decals currently parented to `target`
    pub fn attached_children(&self, target: TargetId) -> usize {
        self.decals.iter().filter(|d| d.parent == target).count()
    }

    /// Hit-test `ray` against the target and move the cursor on a hit
    pub fn check_intersection(&mut self, ray: &Ray) -> HitRecord {
        let Some(target) = self.target.as_ref() else {
            self.hit = HitRecord::miss();
            return self.hit;
        };

        let Some(hit) = target.raycast(ray) else {
            self.hit.hit = false;
            return self.hit;
        };

        let world_normal = transform_normal(target.world(), &hit.local_normal);
        self.hit = HitRecord {
            hit: true,
            point: hit.point,
            normal: hit.local_normal,
            world_normal,
        };
        self.cursor = Some(PlacementCursor {
            position: hit.point,
            orientation: orientation_from_normal(&world_normal),
            line: [hit.point, hit.point + world_normal * CURSOR_LINE_LENGTH],
        });
        self.hit
    }

    /// Draw size, hue and twist for the next placement
    pub fn sample(&mut self) -> PlacementSample {
        let (min_scale, max_scale) = (self.settings.min_scale, self.settings.max_scale);
        let scale = min_scale + self.rng.gen::<f32>() * (max_scale - min_scale);
        let hue = self.rng.gen::<f32>();
        let twist = self.settings.rotate.then(|| self.rng.gen::<f32>() * TAU);
        PlacementSample { scale, hue, twist }
    }

    /// Place a decal at the current hit with fresh random draws.
    /// Skips quietly without a target or a current hit.
    pub fn place(&mut self) -> Option<usize> {
        if !self.hit.hit {
            return None;
        }
        let cursor = self.cursor?;
        let sample = self.sample();
        match self.place_at(cursor.position, cursor.orientation, &sample) {
            Ok(index) => Some(index),
            Err(err) => {
                debug!(error = %err, "Decal placement skipped");
                None
            }
        }
    }

    /// Hit-test and place in one step, as a confirmed click does
    pub fn click(&mut self, ray: &Ray) -> Option<usize> {
        if self.target.is_none() {
            debug!(error = %EditorError::TargetNotLoaded, "Decal placement skipped");
            return None;
        }
        self.check_intersection(ray);
        self.place()
    }

    /// Clip a decal at `point` and attach it to the target. Returns the
    /// decal's index, which is also its render order.
    pub fn place_at(
        &mut self,
        point: Point3<f32>,
        orientation: UnitQuaternion<f32>,
        sample: &PlacementSample,
    ) -> Result<usize> {
        let target = self.target.as_ref().ok_or(EditorError::TargetNotLoaded)?;

        let orientation = match sample.twist {
            Some(angle) => orientation * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle),
            None => orientation,
        };
        let extents = Vector3::repeat(sample.scale);
        let geometry = self
            .clipper
            .clip(&target.clip_target(), &point, &orientation, &extents);

        let mut material = self.tint.clone();
        material.color = Color::from_hsl(sample.hue, 1.0, 0.5);

        let render_order = self.decals.len();
        let local_transform = target
            .world()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);

        debug!(
            render_order,
            triangles = geometry.triangle_count(),
            scale = sample.scale,
            "Placed decal"
        );

        self.decals.push(DecalInstance {
            geometry,
            material,
            render_order,
            parent: target.id(),
            local_transform,
        });
        Ok(render_order)
    }

    /// Detach and drop every decal. The target itself is untouched.
    pub fn clear(&mut self) -> usize {
        let removed = self.decals.len();
        self.decals.clear();
        if removed > 0 {
            debug!(removed, "Cleared decals");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    fn slab() -> Mesh {
        let mut mesh = Primitive::cube(Vector3::new(40.0, 1.0, 40.0), 4).to_mesh();
        mesh.transform(&Matrix4::new_translation(&Vector3::new(0.0, -0.5, 0.0)));
        mesh
    }

    fn projector(seed: u64) -> DecalProjector {
        DecalProjector::new(DecalConfig {
            seed: Some(seed),
            ..DecalConfig::default()
        })
    }

    fn down_ray() -> Ray {
        Ray::new(Point3::new(1.0, 20.0, 2.0), -Vector3::y())
    }

    #[test]
    fn test_hit_updates_cursor() {
        let mut p = projector(1);
        p.set_target(slab(), Transform::identity());
        let hit = p.check_intersection(&down_ray());
        assert!(hit.hit);
        assert_relative_eq!(hit.point, Point3::new(1.0, 0.0, 2.0), epsilon = 1e-4);
        assert_relative_eq!(hit.world_normal, Vector3::y(), epsilon = 1e-5);

        let cursor = p.cursor().unwrap();
        assert_relative_eq!(cursor.orientation * Vector3::z(), Vector3::y(), epsilon = 1e-5);
        assert_relative_eq!(cursor.line[1], Point3::new(1.0, 10.0, 2.0), epsilon = 1e-4);
    }

    #[test]
    fn test_miss_keeps_cursor() {
        let mut p = projector(1);
        p.set_target(slab(), Transform::identity());
        p.check_intersection(&down_ray());
        let before = *p.cursor().unwrap();

        let miss = p.check_intersection(&Ray::new(Point3::new(100.0, 20.0, 0.0), -Vector3::y()));
        assert!(!miss.hit);
        assert_eq!(*p.cursor().unwrap(), before);
        assert_eq!(p.place(), None);
    }

    #[test]
    fn test_placement_without_target_is_noop() {
        let mut p = projector(1);
        assert_eq!(p.click(&down_ray()), None);
        assert!(p.decals().is_empty());
        let sample = PlacementSample { scale: 10.0, hue: 0.0, twist: None };
        assert!(matches!(
            p.place_at(Point3::origin(), UnitQuaternion::identity(), &sample),
            Err(EditorError::TargetNotLoaded)
        ));
    }

    #[test]
    fn test_click_places_with_render_order() {
        let mut p = projector(3);
        let id = p.set_target(slab(), Transform::identity());
        assert_eq!(p.click(&down_ray()), Some(0));
        assert_eq!(p.click(&down_ray()), Some(1));
        assert_eq!(p.decals()[1].render_order, 1);
        assert_eq!(p.attached_children(id), 2);
        assert!(!p.decals()[0].geometry.is_empty());
    }

    #[test]
    fn test_samples_respect_settings() {
        let mut p = projector(11);
        p.set_scale_range(12.0, 14.0);
        p.set_rotate(false);
        for _ in 0..50 {
            let s = p.sample();
            assert!((12.0..=14.0).contains(&s.scale));
            assert!((0.0..1.0).contains(&s.hue));
            assert!(s.twist.is_none());
        }
    }

    #[test]
    fn test_scale_range_is_clamped_and_ordered() {
        let mut p = projector(0);
        p.set_scale_range(50.0, -3.0);
        assert_eq!(p.settings().min_scale, 1.0);
        assert_eq!(p.settings().max_scale, 30.0);
    }

    #[test]
    fn test_decals_follow_target() {
        let mut p = projector(5);
        p.set_target(slab(), Transform::identity());
        p.click(&down_ray());
        let moved = Transform::identity().with_translation(Vector3::new(0.0, 5.0, 0.0));
        p.set_target_transform(moved).unwrap();

        let target_world = *p.target().unwrap().world();
        let bounds = p.decals()[0].world_bounds(&target_world);
        assert_relative_eq!(bounds.max.y, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_scale_target_stays_hittable() {
        let mut p = projector(7);
        p.set_target(slab(), Transform::from_uniform_scale(0.0));
        let target = p.target().unwrap();
        assert_eq!(target.transform().scale, Vector3::repeat(crate::brush::MIN_BRUSH_SCALE));
        assert!(target.world().try_inverse().is_some());

        // Slab shrinks to 0.4 wide with its top face still on y = 0
        let ray = Ray::new(Point3::new(0.05, 20.0, 0.07), -Vector3::y());
        assert_eq!(p.click(&ray), Some(0));
        assert!(!p.decals()[0].geometry.is_empty());

        p.set_target_transform(Transform::identity().with_scale(Vector3::new(1.0, 0.0, f32::NAN)))
            .unwrap();
        let target = p.target().unwrap();
        assert_eq!(target.transform().scale, Vector3::new(1.0, 0.01, 0.01));
        assert!(target.world().try_inverse().is_some());
    }

    #[test]
    fn test_new_target_drops_old_decals() {
        let mut p = projector(5);
        let first = p.set_target(slab(), Transform::identity());
        p.click(&down_ray());
        let second = p.set_target(slab(), Transform::identity());
        assert_ne!(first, second);
        assert_eq!(p.attached_children(first), 0);
        assert!(p.decals().is_empty());
    }

    #[test]
    fn test_orientation_from_vertical_normal() {
        let q = orientation_from_normal(&Vector3::y());
        assert_relative_eq!(q * Vector3::z(), Vector3::y(), epsilon = 1e-5);
        let q = orientation_from_normal(&Vector3::x());
        assert_relative_eq!(q * Vector3::z(), Vector3::x(), epsilon = 1e-5);
    }
}
