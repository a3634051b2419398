//! Narrow-phase dispatch over shape pairs

use super::{test_sphere_vs_box, test_sphere_vs_sphere, Contact};
use crate::body::RigidBody;
use crate::math::Vec3;
use crate::shapes::Shape;

/// Exact test between two leaf bodies. The returned normal always points
/// from `a` toward `b`.
///
/// Pairs are canonicalized so only sphere/sphere and sphere/cuboid need a
/// handler; every other pair reports no contact. Composites never reach this
/// point, the broad phase expands them with [`collect_leaves`] first.
#[must_use]
pub fn narrow_phase(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
    match (a.shape(), b.shape()) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            test_sphere_vs_sphere(a.position(), *ra, b.position(), *rb)
        }
        (Shape::Sphere { radius }, Shape::Cuboid { half_extents }) => {
            sphere_vs_oriented_box(a.position(), *radius, b, *half_extents)
        }
        (Shape::Cuboid { .. }, Shape::Sphere { .. }) => narrow_phase(b, a).map(Contact::flipped),
        (Shape::Composite(_), _)
        | (_, Shape::Composite(_))
        | (Shape::Sphere { .. }, Shape::Cylinder { .. } | Shape::Mesh(_))
        | (Shape::Cylinder { .. } | Shape::Mesh(_), Shape::Sphere { .. })
        | (
            Shape::Cuboid { .. } | Shape::Cylinder { .. } | Shape::Mesh(_),
            Shape::Cuboid { .. } | Shape::Cylinder { .. } | Shape::Mesh(_),
        ) => None,
    }
}

/// Runs the axis-aligned test in the box's local frame and rotates the
/// normal back out. The box test reports a box -> sphere normal, so the
/// result is flipped to point from the sphere.
fn sphere_vs_oriented_box(
    sphere_pos: Vec3,
    radius: f32,
    cuboid: &RigidBody,
    half_extents: Vec3,
) -> Option<Contact> {
    let rotation = cuboid.rotation();
    let local = rotation.transpose().transform_direction(sphere_pos - cuboid.position());
    let contact = test_sphere_vs_box(local, radius, Vec3::ZERO, half_extents)?;
    Some(Contact {
        normal: -rotation.transform_direction(contact.normal),
        depth: contact.depth,
    })
}

/// Pushes `body` itself, or recursively every part of it when it is a composite.
pub fn collect_leaves<'a>(body: &'a RigidBody, out: &mut Vec<&'a RigidBody>) {
    match body.as_composite() {
        Some(composite) => {
            for part in composite.parts() {
                collect_leaves(part.body(), out);
            }
        }
        None => out.push(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::CompositeBody;
    use crate::material::Material;
    use crate::math::Mat4;
    use std::sync::Arc;

    #[test]
    fn sphere_box_normal_points_from_first_to_second() {
        let mat = Arc::new(Material::default());
        let sphere = RigidBody::sphere(0.5, mat.clone()).with_position(Vec3::new(0.0, 1.4, 0.0));
        let ground = RigidBody::cuboid(Vec3::ONE, mat);

        let sb = narrow_phase(&sphere, &ground).unwrap();
        assert!((sb.normal + Vec3::Y).length() < 1e-6);
        let bs = narrow_phase(&ground, &sphere).unwrap();
        assert!((bs.normal - Vec3::Y).length() < 1e-6);
        assert!((sb.depth - bs.depth).abs() < 1e-6);
    }

    #[test]
    fn box_rotation_is_honored() {
        let mat = Arc::new(Material::default());
        // a plank lying along X, stood up along Y by a quarter turn
        let mut plank = RigidBody::cuboid(Vec3::new(2.0, 0.5, 0.5), mat.clone());
        let ball = RigidBody::sphere(0.5, mat).with_position(Vec3::new(0.0, 2.3, 0.0));
        assert!(narrow_phase(&ball, &plank).is_none());

        plank.set_rotation(&Mat4::rotation(Vec3::Z, std::f32::consts::FRAC_PI_2));
        let c = narrow_phase(&ball, &plank).unwrap();
        assert!((c.depth - 0.2).abs() < 1e-5);
        assert!((c.normal + Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn unsupported_pairs_never_collide() {
        let mat = Arc::new(Material::default());
        let a = RigidBody::cuboid(Vec3::ONE, mat.clone());
        let b = RigidBody::cuboid(Vec3::ONE, mat.clone());
        let c = RigidBody::cylinder(1.0, 1.0, 16, mat);
        assert!(narrow_phase(&a, &b).is_none());
        assert!(narrow_phase(&a, &c).is_none());
    }

    #[test]
    fn leaves_flatten_nested_composites() {
        let mat = Arc::new(Material::default());
        let mut inner = CompositeBody::new();
        inner.add_part(RigidBody::sphere(0.5, mat.clone()), Vec3::X, Vec3::ZERO, 0.0);
        inner.add_part(RigidBody::sphere(0.5, mat.clone()), -Vec3::X, Vec3::ZERO, 0.0);
        let mut outer = CompositeBody::new();
        outer.add_part(RigidBody::composite(inner, mat.clone()), Vec3::ZERO, Vec3::ZERO, 0.0);
        outer.add_part(RigidBody::cuboid(Vec3::ONE, mat.clone()), Vec3::Y * 3.0, Vec3::ZERO, 0.0);
        let body = RigidBody::composite(outer, mat);

        let mut leaves = Vec::new();
        collect_leaves(&body, &mut leaves);
        assert_eq!(leaves.len(), 3);
        assert!(leaves.iter().all(|l| l.as_composite().is_none()));
    }
}
