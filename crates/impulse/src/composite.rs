//! # Composite Bodies
//!
//! A [`CompositeBody`] is a rigid assembly of parts placed at fixed local
//! transforms around a common origin, plus the joints linking those parts.
//! Its mass, center of mass and inertia tensor are re-aggregated from the
//! parts every time one is added.

use crate::body::{pair_mut, MassProperties, RigidBody};
use crate::error::PhysicsError;
use crate::joint::{FixedJoint, Joint, RevoluteJoint};
use crate::math::{Mat4, Vec3};
use crate::shapes::BoundingBox;

/// Zero-based index of a part, assigned in insertion order.
pub type PartId = usize;
/// Zero-based index of a joint, assigned in insertion order.
pub type JointId = usize;

#[derive(Debug, Clone)]
pub struct Part {
    body: RigidBody,
    local_transform: Mat4,
}

impl Part {
    #[must_use]
    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }

    /// Placement relative to the composite's origin.
    #[must_use]
    pub fn local_transform(&self) -> &Mat4 {
        &self.local_transform
    }

    /// The part's own center of mass in the composite frame.
    fn center_in_composite(&self) -> Vec3 {
        self.local_transform
            .transform_point(self.body.mass_properties().center_of_mass)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompositeBody {
    parts: Vec<Part>,
    joints: Vec<Joint>,
    // World transform of the owning body as of the last placement.
    frame: Mat4,
    mass_properties: MassProperties,
}

impl CompositeBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `body` at `local_position`, turned by `angle` radians about
    /// `rotation_axis`, and returns its part ID. Aggregate mass properties
    /// are recomputed before returning.
    pub fn add_part(
        &mut self,
        mut body: RigidBody,
        local_position: Vec3,
        rotation_axis: Vec3,
        angle: f32,
    ) -> PartId {
        let local_transform =
            Mat4::translation(local_position) * Mat4::rotation(rotation_axis, angle);
        body.place(&(self.frame * local_transform));
        self.parts.push(Part { body, local_transform });
        self.recompute_mass_properties();
        self.parts.len() - 1
    }

    /// Hinge between two parts through `world_anchor`; `None` (and a warning)
    /// if either ID is invalid.
    pub fn add_revolute_joint(
        &mut self,
        part_a: PartId,
        part_b: PartId,
        world_anchor: Vec3,
        axis: Vec3,
    ) -> Option<JointId> {
        self.try_add_revolute_joint(part_a, part_b, world_anchor, axis)
            .map_err(|e| tracing::warn!("revolute joint ignored: {e}"))
            .ok()
    }

    /// # Errors
    ///
    /// [`PhysicsError::InvalidPart`] for an unknown ID and
    /// [`PhysicsError::SelfJoint`] when both IDs are equal.
    pub fn try_add_revolute_joint(
        &mut self,
        part_a: PartId,
        part_b: PartId,
        world_anchor: Vec3,
        axis: Vec3,
    ) -> Result<JointId, PhysicsError> {
        self.check_pair(part_a, part_b)?;
        let joint = RevoluteJoint::new(
            part_a,
            &self.parts[part_a].body,
            part_b,
            &self.parts[part_b].body,
            world_anchor,
            axis,
        );
        self.joints.push(Joint::Revolute(joint));
        Ok(self.joints.len() - 1)
    }

    pub fn add_fixed_joint(
        &mut self,
        part_a: PartId,
        part_b: PartId,
        world_anchor: Vec3,
    ) -> Option<JointId> {
        self.try_add_fixed_joint(part_a, part_b, world_anchor)
            .map_err(|e| tracing::warn!("fixed joint ignored: {e}"))
            .ok()
    }

    /// # Errors
    ///
    /// See [`try_add_revolute_joint`](Self::try_add_revolute_joint).
    pub fn try_add_fixed_joint(
        &mut self,
        part_a: PartId,
        part_b: PartId,
        world_anchor: Vec3,
    ) -> Result<JointId, PhysicsError> {
        self.check_pair(part_a, part_b)?;
        let joint = FixedJoint::new(
            part_a,
            &self.parts[part_a].body,
            part_b,
            &self.parts[part_b].body,
            world_anchor,
        );
        self.joints.push(Joint::Fixed(joint));
        Ok(self.joints.len() - 1)
    }

    fn check_pair(&self, part_a: PartId, part_b: PartId) -> Result<(), PhysicsError> {
        let len = self.parts.len();
        for id in [part_a, part_b] {
            if id >= len {
                return Err(PhysicsError::InvalidPart { id, len });
            }
        }
        if part_a == part_b {
            return Err(PhysicsError::SelfJoint(part_a));
        }
        Ok(())
    }

    /// Re-derives mass, center of mass and inertia from the current parts.
    ///
    /// Each part's tensor is rotated into the composite frame and shifted to
    /// the composite center of mass with the parallel-axis theorem,
    /// `m·(|d|²·I₃ − d⊗d)`.
    fn recompute_mass_properties(&mut self) {
        let total: f32 = self.parts.iter().map(|p| p.body.mass()).sum();

        let center_of_mass = if total > 0.0 {
            self.parts
                .iter()
                .map(|p| p.center_in_composite() * p.body.mass())
                .fold(Vec3::ZERO, |acc, v| acc + v)
                / total
        } else {
            Vec3::ZERO
        };

        let inertia = self.parts.iter().fold(Mat4::ZERO, |acc, p| {
            let mass = p.body.mass();
            let r = p.local_transform.rotation_part();
            let own = r * p.body.mass_properties().inertia * r.transpose();

            let d = p.center_in_composite() - center_of_mass;
            let outer = Mat4::from_cols(d * d.x, d * d.y, d * d.z, Vec3::ZERO);
            let shift = (Mat4::from_diagonal(Vec3::splat(d.length_squared())) - outer) * mass;

            acc + own + shift
        });

        self.mass_properties = MassProperties::new(total, center_of_mass, inertia);
    }

    /// Places every part at `parent · local_transform`.
    pub fn update_child_transforms(&mut self, parent: &Mat4) {
        self.frame = *parent;
        for part in &mut self.parts {
            part.body.place(&(*parent * part.local_transform));
        }
    }

    /// Union of the parts' freshly recomputed bounds, `None` without parts.
    pub fn compute_aabb(&mut self, parent: &Mat4) -> Option<BoundingBox> {
        self.update_child_transforms(parent);
        self.parts
            .iter_mut()
            .map(|p| p.body.compute_aabb())
            .reduce(|acc, b| acc.union(&b))
    }

    /// Applies every internal joint once, including those of nested composites.
    pub fn solve_joints(&mut self, dt: f32) {
        for joint in &self.joints {
            let (a, b) = joint.bodies();
            if let Some((part_a, part_b)) = pair_mut(&mut self.parts, a, b) {
                joint.apply_constraint(&mut part_a.body, &mut part_b.body, dt);
            }
        }
        for part in &mut self.parts {
            if let Some(nested) = part.body.as_composite_mut() {
                nested.solve_joints(dt);
            }
        }
    }

    #[must_use]
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass_properties
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    #[must_use]
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    #[must_use]
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id)
    }

    #[must_use]
    pub fn revolute_joint(&self, id: JointId) -> Option<&RevoluteJoint> {
        self.joints.get(id).and_then(Joint::as_revolute)
    }

    pub fn revolute_joint_mut(&mut self, id: JointId) -> Option<&mut RevoluteJoint> {
        self.joints.get_mut(id).and_then(Joint::as_revolute_mut)
    }

    /// Relative angular speed of revolute joint `id` about its axis.
    #[must_use]
    pub fn joint_relative_speed(&self, id: JointId) -> Option<f32> {
        let joint = self.revolute_joint(id)?;
        let (a, b) = joint.bodies();
        Some(joint.relative_speed(&self.parts.get(a)?.body, &self.parts.get(b)?.body))
    }
}
