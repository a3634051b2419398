//! Sphere-box narrow phase

use super::Contact;
use crate::math::Vec3;

/// Tests a sphere against an axis-aligned box.
///
/// The normal points from the closest point on the box toward the sphere
/// center, i.e. from the box toward the sphere. When the center lies inside
/// the box the direction from the box center to the sphere center is used
/// instead, falling back to +Y when the two centers coincide.
#[must_use]
pub fn test_sphere_vs_box(
    sphere_pos: Vec3,
    radius: f32,
    box_pos: Vec3,
    half_extents: Vec3,
) -> Option<Contact> {
    let closest = closest_point_on_box(sphere_pos, box_pos, half_extents);
    let delta = sphere_pos - closest;
    let distance_squared = delta.length_squared();

    if distance_squared >= radius * radius {
        return None;
    }

    let distance = distance_squared.sqrt();
    let normal = if distance > 0.0 {
        delta / distance
    } else {
        let from_center = (sphere_pos - box_pos).normalize();
        if from_center == Vec3::ZERO {
            Vec3::Y
        } else {
            from_center
        }
    };

    Some(Contact {
        normal,
        depth: radius - distance,
    })
}

/// Find the closest point on an axis-aligned box to a given point
#[must_use]
pub fn closest_point_on_box(point: Vec3, box_pos: Vec3, half_extents: Vec3) -> Vec3 {
    point.clamp(box_pos - half_extents, box_pos + half_extents)
}
