//! Math utilities for surface picking and bounds tests.

use bevy::math::{Affine3A, Ray3d};
use bevy::prelude::*;

/// Threshold for parallel plane/ray detection.
const PLANE_EPSILON: f32 = 1e-5;

/// Intersect a ray with a plane. Returns the distance along the ray and the
/// intersection point, if any.
pub fn ray_plane_intersection(
    ray: &Ray3d,
    plane_origin: Vec3,
    plane_normal: Vec3,
) -> Option<(f32, Vec3)> {
    let denom = plane_normal.dot(*ray.direction);
    if denom.abs() < PLANE_EPSILON {
        return None;
    }
    let t = (plane_origin - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        None
    } else {
        Some((t, ray.origin + *ray.direction * t))
    }
}

/// Convert Euler angles in degrees to a rotation.
///
/// Angles apply Z first, then X, then Y, so the Y component is always a
/// rotation about the parent's vertical axis.
pub fn euler_degrees_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Half extents of the axis-aligned box enclosing a box with `half_extents`
/// rotated by `rotation`.
pub fn rotated_half_extents(rotation: Quat, half_extents: Vec3) -> Vec3 {
    let m = Mat3::from_quat(rotation);
    let h = half_extents.abs();
    Vec3::new(
        m.row(0).abs().dot(h),
        m.row(1).abs().dot(h),
        m.row(2).abs().dot(h),
    )
}

/// Bounds `(min, max)` of the box `center ± half_extents` after applying
/// `transform`.
pub fn transformed_bounds(transform: Affine3A, center: Vec3, half_extents: Vec3) -> (Vec3, Vec3) {
    let m = transform.matrix3;
    let h = half_extents.abs();
    let reach = Vec3::from(m.x_axis.abs() * h.x + m.y_axis.abs() * h.y + m.z_axis.abs() * h.z);
    let center = transform.transform_point3(center);
    (center - reach, center + reach)
}

/// Whether two axis-aligned boxes overlap. Touching faces count as overlap.
pub fn bounds_overlap(center_a: Vec3, half_a: Vec3, center_b: Vec3, half_b: Vec3) -> bool {
    let delta = (center_a - center_b).abs();
    let reach = half_a.abs() + half_b.abs();
    delta.cmple(reach).all()
}
