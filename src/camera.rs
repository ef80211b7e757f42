// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Perspective camera and pointer-to-ray conversion

use crate::geometry::Ray;
use crate::utils::math::deg_to_rad;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Pixel coordinates (origin top-left, y down) to normalized device
    /// coordinates (origin center, y up)
    pub fn to_ndc(&self, x: f32, y: f32) -> Point2<f32> {
        Point2::new((x / self.width) * 2.0 - 1.0, -(y / self.height) * 2.0 + 1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Point3::new(-10.0, 0.0, 4.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov,
            aspect,
            near,
            far,
        }
    }

    pub fn look_at(mut self, position: Point3<f32>, target: Point3<f32>) -> Self {
        self.position = position;
        self.target = target;
        self
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        // Looking straight along `up` leaves the frame undefined; fall back to +Z
        let forward = self.target - self.position;
        let up = if forward.cross(&self.up).norm_squared() <= f32::EPSILON {
            Vector3::z()
        } else {
            self.up
        };
        Isometry3::look_at_rh(&self.position, &self.target, &up).to_homogeneous()
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect, deg_to_rad(self.fov), self.near, self.far).to_homogeneous()
    }

    /// Ray from the camera through a point in normalized device coordinates
    pub fn ray_from_ndc(&self, ndc: &Point2<f32>) -> Ray {
        let inverse = (self.projection_matrix() * self.view_matrix())
            .try_inverse()
            .unwrap_or_else(Matrix4::identity);
        let through = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 0.5));
        let direction = (through - self.position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| (self.target - self.position).normalize());
        Ray::new(self.position, direction)
    }

    /// Ray through a pixel of `viewport`
    pub fn ray_from_screen(&self, viewport: &Viewport, x: f32, y: f32) -> Ray {
        self.ray_from_ndc(&viewport.to_ndc(x, y))
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, Viewport::default().aspect(), 0.1, 100.0)
    }
}
