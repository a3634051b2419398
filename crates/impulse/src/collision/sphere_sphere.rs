//! Sphere-sphere narrow phase

use super::Contact;
use crate::math::Vec3;

/// Tests two spheres for overlap.
///
/// The normal is the unit vector from A's center toward B's; when the
/// centers coincide exactly it defaults to +Y.
#[must_use]
pub fn test_sphere_vs_sphere(
    pos_a: Vec3,
    radius_a: f32,
    pos_b: Vec3,
    radius_b: f32,
) -> Option<Contact> {
    let delta = pos_b - pos_a;
    let distance_squared = delta.length_squared();
    let radii = radius_a + radius_b;

    if distance_squared >= radii * radii {
        return None;
    }

    let distance = distance_squared.sqrt();
    let normal = if distance > 0.0 { delta / distance } else { Vec3::Y };

    Some(Contact {
        normal,
        depth: radii - distance,
    })
}
