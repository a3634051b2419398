//! # Scene
//!
//! The [`Scene`] owns every top-level body and the joints between them and
//! advances them with a fixed pipeline:
//!
//! 1. integrate forces and gravity,
//! 2. rebuild the contact list,
//! 3. run the velocity solver over joints and contacts,
//! 4. push overlapping bodies apart.

use crate::body::{pair_mut, BodyHandle, RigidBody};
use crate::collision::{self, CollisionConstraint};
use crate::composite::JointId;
use crate::config::SceneConfig;
use crate::error::PhysicsError;
use crate::joint::{FixedJoint, Joint, RevoluteJoint};
use crate::math::Vec3;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    config: SceneConfig,
    bodies: Vec<RigidBody>,
    joints: Vec<Joint>,
    contacts: Vec<CollisionConstraint>,
}

impl Scene {
    /// Empty scene with earth gravity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    /// Takes ownership of `body`; the handle stays valid for the scene's lifetime.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    #[must_use]
    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.index())
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.index())
    }

    #[must_use]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Hinge between two top-level bodies. Logs and returns `None` on bad handles.
    pub fn add_revolute_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        world_anchor: Vec3,
        axis: Vec3,
    ) -> Option<JointId> {
        self.try_add_revolute_joint(a, b, world_anchor, axis)
            .map_err(|e| tracing::warn!("revolute joint ignored: {e}"))
            .ok()
    }

    /// # Errors
    ///
    /// [`PhysicsError::InvalidBody`] for an unknown handle,
    /// [`PhysicsError::SelfJoint`] when `a == b`.
    pub fn try_add_revolute_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        world_anchor: Vec3,
        axis: Vec3,
    ) -> Result<JointId, PhysicsError> {
        self.check_pair(a, b)?;
        let joint = RevoluteJoint::new(
            a.index(),
            &self.bodies[a.index()],
            b.index(),
            &self.bodies[b.index()],
            world_anchor,
            axis,
        );
        self.joints.push(Joint::Revolute(joint));
        Ok(self.joints.len() - 1)
    }

    pub fn add_fixed_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        world_anchor: Vec3,
    ) -> Option<JointId> {
        self.try_add_fixed_joint(a, b, world_anchor)
            .map_err(|e| tracing::warn!("fixed joint ignored: {e}"))
            .ok()
    }

    /// # Errors
    ///
    /// Same as [`try_add_revolute_joint`](Self::try_add_revolute_joint).
    pub fn try_add_fixed_joint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        world_anchor: Vec3,
    ) -> Result<JointId, PhysicsError> {
        self.check_pair(a, b)?;
        let joint = FixedJoint::new(
            a.index(),
            &self.bodies[a.index()],
            b.index(),
            &self.bodies[b.index()],
            world_anchor,
        );
        self.joints.push(Joint::Fixed(joint));
        Ok(self.joints.len() - 1)
    }

    fn check_pair(&self, a: BodyHandle, b: BodyHandle) -> Result<(), PhysicsError> {
        let len = self.bodies.len();
        for index in [a.index(), b.index()] {
            if index >= len {
                return Err(PhysicsError::InvalidBody { index, len });
            }
        }
        if a == b {
            return Err(PhysicsError::SelfJoint(a.index()));
        }
        Ok(())
    }

    #[must_use]
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id)
    }

    /// Mutable access, e.g. to retune a motor with
    /// [`RevoluteJoint::set_motor`] between steps.
    pub fn joint_mut(&mut self, id: JointId) -> Option<&mut Joint> {
        self.joints.get_mut(id)
    }

    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// `(ω_A − ω_B) · axis` of a scene-level revolute joint.
    #[must_use]
    pub fn joint_relative_speed(&self, id: JointId) -> Option<f32> {
        let joint = self.joints.get(id)?.as_revolute()?;
        let (a, b) = joint.bodies();
        Some(joint.relative_speed(self.bodies.get(a)?, self.bodies.get(b)?))
    }

    /// Contacts found by the most recent broad phase.
    #[must_use]
    pub fn contacts(&self) -> &[CollisionConstraint] {
        &self.contacts
    }

    /// Advances the scene by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.integrate(dt);
        self.broad_phase();
        self.solve_constraints(dt);
        self.resolve_penetration();
    }

    /// Calls [`step`](Self::step) `steps` times.
    pub fn run(&mut self, dt: f32, steps: usize) {
        tracing::debug!(dt, steps, bodies = self.bodies.len(), "running scene");
        for _ in 0..steps {
            self.step(dt);
        }
    }

    /// Moves every body under gravity and its accumulated forces.
    pub fn integrate(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        tracing::trace!(dt, "integrate");
        for body in &mut self.bodies {
            body.update_physics(dt, gravity);
        }
    }

    /// Replaces the contact list with the current overlaps.
    pub fn broad_phase(&mut self) {
        self.contacts = collision::broad_phase(&mut self.bodies);
        tracing::debug!(contacts = self.contacts.len(), "broad phase");
    }

    /// Runs the configured number of passes over scene joints, composite
    /// joints and contacts, in that order within each pass.
    pub fn solve_constraints(&mut self, dt: f32) {
        for contact in &mut self.contacts {
            contact.accumulated_impulse = 0.0;
        }

        for _ in 0..self.config.solver_iterations {
            for joint in &self.joints {
                let (a, b) = joint.bodies();
                if let Some((body_a, body_b)) = pair_mut(&mut self.bodies, a, b) {
                    joint.apply_constraint(body_a, body_b, dt);
                }
            }

            for body in &mut self.bodies {
                if let Some(composite) = body.as_composite_mut() {
                    composite.solve_joints(dt);
                }
            }

            for contact in &mut self.contacts {
                let (a, b) = (contact.body_a.index(), contact.body_b.index());
                if let Some((a, b)) = pair_mut(&mut self.bodies, a, b) {
                    collision::resolve_contact(a, b, contact);
                }
            }
        }
    }

    /// Positional correction, once per touching body pair.
    ///
    /// A composite resting on several parts produces one contact per part;
    /// only the deepest of them drives the correction.
    pub fn resolve_penetration(&mut self) {
        let SceneConfig {
            penetration_slop,
            penetration_correction,
            ..
        } = self.config;
        for contact in deepest_per_pair(&self.contacts) {
            let (a, b) = (contact.body_a.index(), contact.body_b.index());
            if let Some((a, b)) = pair_mut(&mut self.bodies, a, b) {
                collision::correct_penetration(
                    a,
                    b,
                    contact,
                    penetration_slop,
                    penetration_correction,
                );
            }
        }
    }
}

/// The deepest contact of every distinct `(body_a, body_b)` pair, in first-seen order.
fn deepest_per_pair(contacts: &[CollisionConstraint]) -> Vec<&CollisionConstraint> {
    let mut deepest: Vec<&CollisionConstraint> = Vec::new();
    for contact in contacts {
        let pair = (contact.body_a, contact.body_b);
        match deepest.iter_mut().find(|kept| (kept.body_a, kept.body_b) == pair) {
            Some(kept) if contact.depth > kept.depth => *kept = contact,
            Some(_) => {}
            None => deepest.push(contact),
        }
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use std::sync::Arc;

    #[test]
    fn bad_joint_handles_are_rejected() {
        let mut scene = Scene::new();
        let a = scene.add_body(RigidBody::sphere(1.0, Arc::new(Material::default())));

        assert_eq!(
            scene.try_add_revolute_joint(a, BodyHandle(4), Vec3::ZERO, Vec3::Z),
            Err(PhysicsError::InvalidBody { index: 4, len: 1 })
        );
        assert_eq!(scene.try_add_fixed_joint(a, a, Vec3::ZERO), Err(PhysicsError::SelfJoint(0)));
        assert!(scene.add_revolute_joint(a, a, Vec3::ZERO, Vec3::Z).is_none());
        assert!(scene.joints().is_empty());
    }

    #[test]
    fn relative_speed_only_for_revolute_joints() {
        let mat = Arc::new(Material::default());
        let mut scene = Scene::with_config(SceneConfig {
            gravity: Vec3::ZERO,
            ..SceneConfig::default()
        });
        let a = scene.add_body(RigidBody::sphere(0.5, mat.clone()));
        let b = scene.add_body(RigidBody::sphere(0.5, mat).with_position(Vec3::new(3.0, 0.0, 0.0)));
        let hinge = scene.add_revolute_joint(a, b, Vec3::new(1.5, 0.0, 0.0), Vec3::Z).unwrap();
        let weld = scene.add_fixed_joint(a, b, Vec3::new(1.5, 0.0, 0.0)).unwrap();

        scene.body_mut(a).unwrap().set_angular_velocity(Vec3::new(0.0, 0.0, 2.0));
        let speed = scene.joint_relative_speed(hinge).unwrap();
        assert!((speed - 2.0).abs() < 1e-6);
        assert!(scene.joint_relative_speed(weld).is_none());
        assert!(scene.joint_relative_speed(7).is_none());
    }
}
