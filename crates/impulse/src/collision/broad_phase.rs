//! Brute-force broad phase with composite expansion

use super::{collect_leaves, narrow_phase, CollisionConstraint};
use crate::body::{BodyHandle, RigidBody};

/// Finds every contact between distinct top-level bodies.
///
/// Bounds are refreshed first and used to reject pairs early, along with
/// pairs of static bodies that could never respond; surviving pairs
/// are expanded into their leaf shapes and each colliding leaf pair yields one
/// constraint addressed to the two top-level bodies. Parts of the same
/// composite are never tested against each other.
pub fn broad_phase(bodies: &mut [RigidBody]) -> Vec<CollisionConstraint> {
    for body in bodies.iter_mut() {
        body.compute_aabb();
    }

    let bodies: &[RigidBody] = bodies;
    let leaves: Vec<Vec<&RigidBody>> = bodies
        .iter()
        .map(|body| {
            let mut out = Vec::new();
            collect_leaves(body, &mut out);
            out
        })
        .collect();

    let mut constraints = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if bodies[i].is_static() && bodies[j].is_static() {
                continue;
            }
            if !bodies[i].aabb().overlaps(bodies[j].aabb()) {
                continue;
            }
            for leaf_a in &leaves[i] {
                for leaf_b in &leaves[j] {
                    let Some(contact) = narrow_phase(leaf_a, leaf_b) else {
                        continue;
                    };
                    tracing::trace!(
                        a = i,
                        b = j,
                        shape_a = leaf_a.shape().name(),
                        shape_b = leaf_b.shape().name(),
                        depth = contact.depth,
                        "contact"
                    );
                    let (a, b) = (BodyHandle(i), BodyHandle(j));
                    constraints.push(CollisionConstraint::new(a, b, contact, leaf_a, leaf_b));
                }
            }
        }
    }
    constraints
}
