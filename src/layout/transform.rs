//! Rigid placement of layout parts into world space.
//!
//! A layout instance is placed with a single transform: a yaw rotation about the
//! vertical axis followed by a translation to the instance origin. Each part's
//! authored offset is rotated on the ground plane, then shifted by the origin.
//! Heights are never rotated, only summed.
//!
//! ## Yaw Convention
//!
//! Angles are in degrees. The planar rotation uses the standard matrix:
//! ```text
//! x' = x * cos(θ) - y * sin(θ)
//! y' = x * sin(θ) + y * cos(θ)
//! ```
//! Part yaw and instance yaw are summed and wrapped into `[-180, 180)`.

use crate::layout::types::Vec3;

/// Wrap an angle in degrees into `[-180, 180)`.
///
/// In-range values are returned unchanged. Out-of-range values use a Euclidean
/// remainder, so arbitrarily large magnitudes wrap in constant time. NaN and
/// infinities come back as NaN.
pub fn normalize_yaw(yaw: f64) -> f64 {
    if (-180.0..180.0).contains(&yaw) {
        return yaw;
    }

    let mut wrapped = (yaw + 180.0).rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= 360.0 {
        wrapped -= 360.0;
    }
    wrapped - 180.0
}

/// The instance-level transform applied to every part of a layout.
#[derive(Debug, Clone, Copy)]
pub struct PlacementTransform {
    /// World-space translation applied after rotation
    pub origin: Vec3,
    /// Rotation about the vertical axis, in degrees
    pub yaw_degrees: f64,
}

impl PlacementTransform {
    pub fn new(origin: Vec3, yaw_degrees: f64) -> Self {
        Self {
            origin,
            yaw_degrees,
        }
    }

    /// Check if the rotation is effectively a no-op (0° yaw).
    pub fn is_identity_rotation(&self) -> bool {
        self.yaw_degrees.abs() < f64::EPSILON
    }

    /// Rotate a local offset about the vertical axis and translate it by the origin.
    pub fn transform_point(&self, offset: Vec3) -> Vec3 {
        if self.is_identity_rotation() {
            return self.origin.add(offset);
        }

        let radians = self.yaw_degrees.to_radians();
        let cos_a = radians.cos();
        let sin_a = radians.sin();

        let rotated = Vec3 {
            x: offset.x * cos_a - offset.y * sin_a,
            y: offset.x * sin_a + offset.y * cos_a,
            z: offset.z,
        };
        self.origin.add(rotated)
    }

    /// Combine a part's own yaw with the instance yaw.
    pub fn transform_yaw(&self, relative_yaw: f64) -> f64 {
        normalize_yaw(relative_yaw + self.yaw_degrees)
    }
}

/// Compose a part's relative offset and yaw with the instance placement.
///
/// Returns the world position and the normalized final yaw.
pub fn compose(
    offset: Vec3,
    relative_yaw: f64,
    origin: Vec3,
    global_yaw_degrees: f64,
) -> (Vec3, f64) {
    let t = PlacementTransform::new(origin, global_yaw_degrees);
    (t.transform_point(offset), t.transform_yaw(relative_yaw))
}
