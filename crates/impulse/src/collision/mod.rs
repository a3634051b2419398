//! # Collision Detection and Response
//!
//! Narrow-phase tests for sphere-sphere and sphere-box pairs, a brute-force
//! broad phase that expands composite bodies into their parts, and the
//! impulse-based contact response used by the scene solver.

mod broad_phase;
mod dispatcher;
mod response;
mod sphere_box;
mod sphere_sphere;

pub use broad_phase::broad_phase;
pub use dispatcher::{collect_leaves, narrow_phase};
pub use response::{correct_penetration, effective_mass, resolve_contact};
pub use sphere_box::{closest_point_on_box, test_sphere_vs_box};
pub use sphere_sphere::test_sphere_vs_sphere;

use crate::body::{BodyHandle, RigidBody};
use crate::math::Vec3;

/// Result of a narrow-phase test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit contact normal
    pub normal: Vec3,
    /// Penetration depth (positive when overlapping)
    pub depth: f32,
}

impl Contact {
    /// Same contact seen from the other body.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            depth: self.depth,
        }
    }
}

/// A contact between two top-level bodies, rebuilt by every broad phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConstraint {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Unit normal pointing from A toward B
    pub normal: Vec3,
    pub depth: f32,
    /// Midpoint of the two touching shapes' centers
    pub contact_point: Vec3,
    /// Combined friction coefficient
    pub friction: f32,
    /// Combined restitution coefficient
    pub restitution: f32,
    /// Normal impulse applied so far this step
    pub accumulated_impulse: f32,
}

impl CollisionConstraint {
    /// `leaf_a`/`leaf_b` are the shapes that actually touched; for a
    /// composite they are parts of `body_a`/`body_b`.
    #[must_use]
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        contact: Contact,
        leaf_a: &RigidBody,
        leaf_b: &RigidBody,
    ) -> Self {
        let (mat_a, mat_b) = (leaf_a.material(), leaf_b.material());
        Self {
            body_a,
            body_b,
            normal: contact.normal,
            depth: contact.depth,
            contact_point: (leaf_a.position() + leaf_b.position()) * 0.5,
            friction: combine_friction(mat_a.friction, mat_b.friction),
            restitution: combine_restitution(mat_a.restitution, mat_b.restitution),
            accumulated_impulse: 0.0,
        }
    }
}

/// The less grippy surface wins.
#[must_use]
pub fn combine_friction(f1: f32, f2: f32) -> f32 {
    f1.min(f2)
}

/// The less bouncy surface wins.
#[must_use]
pub fn combine_restitution(r1: f32, r2: f32) -> f32 {
    r1.min(r2)
}
