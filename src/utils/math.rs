// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// Calculate the normal of a triangle given three vertices
pub fn calculate_triangle_normal(
    p0: &Point3<f32>,
    p1: &Point3<f32>,
    p2: &Point3<f32>,
) -> Vector3<f32> {
    let v1 = p1 - p0;
    let v2 = p2 - p0;
    v1.cross(&v2).try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}

/// Check if two floats are approximately equal
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Clamp a value between min and max. NaN collapses to `min`.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate an integer resolution parameter and round it to the nearest step
pub fn round_lerp(min: u32, max: u32, t: f32) -> u32 {
    lerp(min as f32, max as f32, t).round().max(0.0) as u32
}

/// Convert degrees to radians
pub fn deg_to_rad(deg: f32) -> f32 {
    deg * std::f32::consts::PI / 180.0
}

/// Inverse-transpose of the upper 3x3 block, used to carry normals through a world matrix
pub fn normal_matrix(matrix: &Matrix4<f32>) -> Matrix3<f32> {
    let linear: Matrix3<f32> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    linear
        .try_inverse()
        .map(|m| m.transpose())
        .unwrap_or(linear)
}

/// Transform a direction by the normal matrix of `matrix` and renormalize it
pub fn transform_normal(matrix: &Matrix4<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    (normal_matrix(matrix) * normal)
        .try_normalize(f32::EPSILON)
        .unwrap_or(*normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0001, 0.001));
        assert!(!approx_eq(1.0, 1.1, 0.001));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(f32::NAN, 0.0, 2.0), 0.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn test_round_lerp() {
        assert_eq!(round_lerp(5, 32, 0.0), 5);
        assert_eq!(round_lerp(5, 32, 1.0), 32);
        // 5 + 27 * 0.5 = 18.5 rounds up
        assert_eq!(round_lerp(5, 32, 0.5), 19);
        assert_eq!(round_lerp(5, 16, 2.0), 27);
    }

    #[test]
    fn test_normal_matrix_non_uniform_scale() {
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        // A 45 degree normal leans toward the less-stretched axis
        let n = transform_normal(&m, &Vector3::new(1.0, 1.0, 0.0).normalize());
        assert!(n.x < n.y);
        assert!(approx_eq(n.norm(), 1.0, 1e-5));
    }
}
