//! # Physics Integration
//!
//! Numerical integration of a single body's pose: Velocity-Verlet for the
//! linear part, an exact axis-angle step for orientation.

use crate::math::{Mat4, Vec3};

/// Velocity-Verlet step under constant acceleration:
/// `p += v·dt + ½·a·dt²`, then `v += a·dt`.
///
/// With the acceleration held constant over the step this is exact, which is
/// what makes free fall match the analytic parabola.
pub fn integrate_linear(position: &mut Vec3, velocity: &mut Vec3, acceleration: Vec3, dt: f32) {
    *position += *velocity * dt + acceleration * (0.5 * dt * dt);
    *velocity += acceleration * dt;
}

/// Advances a rotation matrix by angular velocity `omega` (world frame) over `dt`.
///
/// The increment is the rotation of `|ω|·dt` about `ω̂`, composed on the left
/// because `ω` is expressed in world space. The result is re-orthonormalized so
/// rounding drift never accumulates into scale or shear.
#[must_use]
pub fn integrate_rotation(rotation: &Mat4, omega: Vec3, dt: f32) -> Mat4 {
    let speed = omega.length();
    if speed * dt <= 0.0 {
        return *rotation;
    }
    (Mat4::rotation(omega, speed * dt) * *rotation).orthonormalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_acceleration_is_exact() {
        let mut p = Vec3::ZERO;
        let mut v = Vec3::ZERO;
        let g = Vec3::new(0.0, -9.81, 0.0);
        for _ in 0..100 {
            integrate_linear(&mut p, &mut v, g, 0.01);
        }
        assert!((p.y - 0.5 * -9.81 * 1.0).abs() < 1e-3, "y = {}", p.y);
        assert!((v.y + 9.81).abs() < 1e-4);
    }

    #[test]
    fn spinning_quarter_turn_about_y() {
        let omega = Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0);
        let mut r = Mat4::IDENTITY;
        for _ in 0..100 {
            r = integrate_rotation(&r, omega, 0.01);
        }
        // +X rotated a quarter turn about +Y ends up on -Z
        let x = r.transform_direction(Vec3::X);
        assert!((x - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-3, "{x:?}");
    }

    #[test]
    fn zero_angular_velocity_keeps_rotation() {
        let r = Mat4::rotation(Vec3::Z, 0.3);
        assert_eq!(integrate_rotation(&r, Vec3::ZERO, 0.1), r);
    }
}
