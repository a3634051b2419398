//! Impulse-based contact response

use super::CollisionConstraint;
use crate::body::RigidBody;
use crate::math::{Vec3, EPSILON};

/// Inverse effective mass of the pair along `direction` at the given lever
/// arms: `1/m_A + 1/m_B + (r_A×d)·I_A⁻¹(r_A×d) + (r_B×d)·I_B⁻¹(r_B×d)`.
#[must_use]
pub fn effective_mass(a: &RigidBody, b: &RigidBody, r_a: Vec3, r_b: Vec3, direction: Vec3) -> f32 {
    let ra_d = r_a.cross(direction);
    let rb_d = r_b.cross(direction);
    a.inverse_mass()
        + b.inverse_mass()
        + ra_d.dot(a.inverse_inertia_world().transform_direction(ra_d))
        + rb_d.dot(b.inverse_inertia_world().transform_direction(rb_d))
}

/// One velocity pass over a contact: restitution along the normal, then
/// Coulomb friction bounded by this pass's normal impulse.
///
/// Separating contacts are left alone. The normal impulse is added to
/// `constraint.accumulated_impulse`.
pub fn resolve_contact(a: &mut RigidBody, b: &mut RigidBody, constraint: &mut CollisionConstraint) {
    let n = constraint.normal;
    let point = constraint.contact_point;
    let r_a = point - a.world_center_of_mass();
    let r_b = point - b.world_center_of_mass();

    let relative = b.velocity_at(point) - a.velocity_at(point);
    let vn = relative.dot(n);
    if vn >= 0.0 {
        return;
    }

    let k = effective_mass(a, b, r_a, r_b, n);
    if k < EPSILON {
        return;
    }

    let j = -(1.0 + constraint.restitution) * vn / k;
    a.apply_impulse(-n * j, point);
    b.apply_impulse(n * j, point);
    constraint.accumulated_impulse += j;

    // friction, against the post-impulse sliding direction
    let relative = b.velocity_at(point) - a.velocity_at(point);
    let tangential = relative - n * relative.dot(n);
    if tangential.length_squared() < EPSILON * EPSILON {
        return;
    }
    let t = tangential.normalize();
    let kt = effective_mass(a, b, r_a, r_b, t);
    if kt < EPSILON {
        return;
    }

    let bound = (constraint.friction * j).abs();
    let jt = (-relative.dot(t) / kt).clamp(-bound, bound);
    a.apply_impulse(-t * jt, point);
    b.apply_impulse(t * jt, point);
}

/// Pushes the bodies apart along the normal by `max(0, depth − slop)·percent`.
///
/// Two dynamic bodies share the correction equally; a dynamic body paired
/// with a static one takes all of it. Velocities are untouched.
pub fn correct_penetration(
    a: &mut RigidBody,
    b: &mut RigidBody,
    constraint: &CollisionConstraint,
    slop: f32,
    percent: f32,
) {
    let magnitude = (constraint.depth - slop).max(0.0) * percent;
    if magnitude <= 0.0 {
        return;
    }
    let correction = constraint.normal * magnitude;

    match (a.is_static(), b.is_static()) {
        (false, false) => {
            a.set_position(a.position() - correction * 0.5);
            b.set_position(b.position() + correction * 0.5);
        }
        (false, true) => a.set_position(a.position() - correction),
        (true, false) => b.set_position(b.position() + correction),
        (true, true) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyHandle;
    use crate::collision::{narrow_phase, CollisionConstraint};
    use crate::material::Material;
    use std::sync::Arc;

    fn constraint_between(a: &RigidBody, b: &RigidBody) -> CollisionConstraint {
        let contact = narrow_phase(a, b).unwrap();
        CollisionConstraint::new(BodyHandle(0), BodyHandle(1), contact, a, b)
    }

    #[test]
    fn separating_contact_is_ignored() {
        let mat = Arc::new(Material::default());
        let mut a = RigidBody::sphere(1.0, mat.clone())
            .with_position(Vec3::new(-0.9, 0.0, 0.0))
            .with_velocity(Vec3::new(-1.0, 0.0, 0.0));
        let mut b = RigidBody::sphere(1.0, mat)
            .with_position(Vec3::new(0.9, 0.0, 0.0))
            .with_velocity(Vec3::new(1.0, 0.0, 0.0));
        let mut c = constraint_between(&a, &b);

        resolve_contact(&mut a, &mut b, &mut c);
        assert_eq!(a.velocity(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.velocity(), Vec3::new(1.0, 0.0, 0.0));
        assert!(c.accumulated_impulse.abs() < f32::EPSILON);
    }

    #[test]
    fn static_pair_is_not_corrected() {
        let wall = Arc::new(Material::immovable());
        let mut a = RigidBody::sphere(1.0, wall.clone()).with_position(Vec3::new(-0.5, 0.0, 0.0));
        let mut b = RigidBody::sphere(1.0, wall).with_position(Vec3::new(0.5, 0.0, 0.0));
        let c = constraint_between(&a, &b);

        correct_penetration(&mut a, &mut b, &c, 0.01, 0.4);
        assert_eq!(a.position(), Vec3::new(-0.5, 0.0, 0.0));
        assert_eq!(b.position(), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn dynamic_body_takes_full_correction_against_static() {
        let slab = Vec3::new(5.0, 0.5, 5.0);
        let mut ground = RigidBody::cuboid(slab, Arc::new(Material::immovable()));
        let mut ball = RigidBody::sphere(0.5, Arc::new(Material::default()))
            .with_position(Vec3::new(0.0, 0.8, 0.0));
        let c = constraint_between(&ground, &ball);
        assert!((c.depth - 0.2).abs() < 1e-5);

        correct_penetration(&mut ground, &mut ball, &c, 0.01, 0.4);
        let expected = 0.8 + (0.2 - 0.01) * 0.4;
        assert!((ball.position().y - expected).abs() < 1e-5);
        assert_eq!(ground.position(), Vec3::ZERO);
    }
}
