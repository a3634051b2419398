//! # Joints
//!
//! Bilateral constraints between two bodies. A joint stores the *indices* of
//! its bodies in whatever arena owns them (part IDs inside a
//! [`CompositeBody`](crate::CompositeBody), [`BodyHandle`](crate::BodyHandle)
//! indices inside a [`Scene`](crate::Scene)); the owner resolves them to
//! `&mut RigidBody` pairs and calls [`Joint::apply_constraint`].

use crate::body::RigidBody;
use crate::math::{Vec3, EPSILON};

/// Hinge sub-iterations per `apply_constraint` call.
pub const JOINT_ITERATIONS: usize = 8;
/// Baumgarte positional-correction factor.
pub const BAUMGARTE: f32 = 0.2;
/// Anchor drift tolerated before positional correction kicks in.
pub const ANCHOR_SLOP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointKind {
    Revolute,
    Fixed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Joint {
    Revolute(RevoluteJoint),
    Fixed(FixedJoint),
}

impl Joint {
    #[must_use]
    pub const fn kind(&self) -> JointKind {
        match self {
            Self::Revolute(_) => JointKind::Revolute,
            Self::Fixed(_) => JointKind::Fixed,
        }
    }

    /// Arena indices of body A and body B.
    #[must_use]
    pub const fn bodies(&self) -> (usize, usize) {
        match self {
            Self::Revolute(j) => (j.body_a, j.body_b),
            Self::Fixed(j) => (j.body_a, j.body_b),
        }
    }

    /// Shared anchor point, stored in each body's local frame.
    #[must_use]
    pub const fn anchors(&self) -> &Anchors {
        match self {
            Self::Revolute(j) => &j.anchors,
            Self::Fixed(j) => &j.anchors,
        }
    }

    /// One solver pass of this joint on the already-resolved body pair.
    pub fn apply_constraint(&self, a: &mut RigidBody, b: &mut RigidBody, dt: f32) {
        match self {
            Self::Revolute(j) => j.apply_constraint(a, b, dt),
            Self::Fixed(j) => j.apply_constraint(a, b, dt),
        }
    }

    #[must_use]
    pub fn as_revolute(&self) -> Option<&RevoluteJoint> {
        match self {
            Self::Revolute(j) => Some(j),
            Self::Fixed(_) => None,
        }
    }

    pub fn as_revolute_mut(&mut self) -> Option<&mut RevoluteJoint> {
        match self {
            Self::Revolute(j) => Some(j),
            Self::Fixed(_) => None,
        }
    }
}

/// Anchor point fixed in each body's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    pub local_a: Vec3,
    pub local_b: Vec3,
}

impl Anchors {
    /// Expresses the shared `world_anchor` in each body's current local frame.
    /// The result never changes afterwards, however the bodies move.
    #[must_use]
    pub fn new(a: &RigidBody, b: &RigidBody, world_anchor: Vec3) -> Self {
        Self {
            local_a: a.transform().affine_inverse().transform_point(world_anchor),
            local_b: b.transform().affine_inverse().transform_point(world_anchor),
        }
    }

    /// Current world positions of both anchors.
    #[must_use]
    pub fn world(&self, a: &RigidBody, b: &RigidBody) -> (Vec3, Vec3) {
        (
            a.transform().transform_point(self.local_a),
            b.transform().transform_point(self.local_b),
        )
    }

    /// Drives the anchors' relative velocity, biased by their separation,
    /// toward zero with per-axis impulses at the anchor points.
    pub fn solve(&self, a: &mut RigidBody, b: &mut RigidBody, dt: f32) {
        for _ in 0..JOINT_ITERATIONS {
            let (anchor_a, anchor_b) = self.world(a, b);
            let r_a = anchor_a - a.world_center_of_mass();
            let r_b = anchor_b - b.world_center_of_mass();

            let relative_velocity = b.velocity_at(anchor_b) - a.velocity_at(anchor_a);

            let error = anchor_b - anchor_a;
            let bias = if dt > 0.0 {
                BAUMGARTE / dt * (error.length() - ANCHOR_SLOP).max(0.0)
            } else {
                0.0
            };
            let velocity_error = relative_velocity + error.normalize() * bias;

            let inv_mass = a.inverse_mass() + b.inverse_mass();
            let inv_inertia_a = a.inverse_inertia_world();
            let inv_inertia_b = b.inverse_inertia_world();

            for axis in 0..3 {
                let n = Vec3::axis(axis);
                let ra_n = r_a.cross(n);
                let rb_n = r_b.cross(n);
                let k = inv_mass
                    + ra_n.dot(inv_inertia_a.transform_direction(ra_n))
                    + rb_n.dot(inv_inertia_b.transform_direction(rb_n));
                if k <= EPSILON {
                    continue;
                }
                let lambda = velocity_error.dot(n) / k;
                a.apply_impulse(n * lambda, anchor_a);
                b.apply_impulse(-n * lambda, anchor_b);
            }
        }
    }
}

/// Hinge about `axis` through a shared anchor, with an optional velocity motor.
#[derive(Debug, Clone, PartialEq)]
pub struct RevoluteJoint {
    body_a: usize,
    body_b: usize,
    anchors: Anchors,
    axis: Vec3,
    motor_speed: f32,
    max_motor_force: f32,
}

impl RevoluteJoint {
    /// `a`/`b` are the bodies found at `body_a`/`body_b`; their current
    /// transforms fix the local anchors. `axis` is a world direction and is
    /// normalized (a zero axis disables the motor).
    #[must_use]
    pub fn new(
        body_a: usize,
        a: &RigidBody,
        body_b: usize,
        b: &RigidBody,
        world_anchor: Vec3,
        axis: Vec3,
    ) -> Self {
        Self {
            body_a,
            body_b,
            anchors: Anchors::new(a, b, world_anchor),
            axis: axis.normalize(),
            motor_speed: 0.0,
            max_motor_force: 0.0,
        }
    }

    /// Target relative speed (rad/s) and the largest torque the motor may
    /// use to reach it. A `max_force` of 0 switches the motor off.
    pub fn set_motor(&mut self, speed: f32, max_force: f32) {
        self.motor_speed = speed;
        self.max_motor_force = max_force;
    }

    #[must_use]
    pub fn motor_speed(&self) -> f32 {
        self.motor_speed
    }

    #[must_use]
    pub fn max_motor_force(&self) -> f32 {
        self.max_motor_force
    }

    #[must_use]
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    #[must_use]
    pub fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    /// Anchor in A's local frame and in B's.
    #[must_use]
    pub fn local_anchors(&self) -> (Vec3, Vec3) {
        (self.anchors.local_a, self.anchors.local_b)
    }

    #[must_use]
    pub fn bodies(&self) -> (usize, usize) {
        (self.body_a, self.body_b)
    }

    /// `(ω_A − ω_B) · axis`.
    #[must_use]
    pub fn relative_speed(&self, a: &RigidBody, b: &RigidBody) -> f32 {
        (a.angular_velocity() - b.angular_velocity()).dot(self.axis)
    }

    pub fn apply_constraint(&self, a: &mut RigidBody, b: &mut RigidBody, dt: f32) {
        if self.max_motor_force > 0.0 {
            self.drive_motor(a, b, dt);
        }
        self.anchors.solve(a, b, dt);
    }

    fn drive_motor(&self, a: &mut RigidBody, b: &mut RigidBody, dt: f32) {
        let k = self.axis.dot(a.inverse_inertia_world().transform_direction(self.axis))
            + self.axis.dot(b.inverse_inertia_world().transform_direction(self.axis));
        if k < EPSILON {
            return;
        }

        let max_impulse = self.max_motor_force * dt;
        if max_impulse <= 0.0 {
            return;
        }
        let lambda = ((self.motor_speed - self.relative_speed(a, b)) / k)
            .clamp(-max_impulse, max_impulse);

        let impulse = self.axis * lambda;
        a.apply_angular_impulse(impulse);
        b.apply_angular_impulse(-impulse);
    }
}

/// Weld: anchors stay together and the bodies may not rotate relative to
/// each other.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedJoint {
    body_a: usize,
    body_b: usize,
    anchors: Anchors,
}

impl FixedJoint {
    #[must_use]
    pub fn new(
        body_a: usize,
        a: &RigidBody,
        body_b: usize,
        b: &RigidBody,
        world_anchor: Vec3,
    ) -> Self {
        Self {
            body_a,
            body_b,
            anchors: Anchors::new(a, b, world_anchor),
        }
    }

    #[must_use]
    pub fn anchors(&self) -> &Anchors {
        &self.anchors
    }

    #[must_use]
    pub fn bodies(&self) -> (usize, usize) {
        (self.body_a, self.body_b)
    }

    pub fn apply_constraint(&self, a: &mut RigidBody, b: &mut RigidBody, dt: f32) {
        for _ in 0..JOINT_ITERATIONS {
            let inv_inertia_a = a.inverse_inertia_world();
            let inv_inertia_b = b.inverse_inertia_world();
            for axis in 0..3 {
                let n = Vec3::axis(axis);
                let k = n.dot(inv_inertia_a.transform_direction(n))
                    + n.dot(inv_inertia_b.transform_direction(n));
                if k <= EPSILON {
                    continue;
                }
                let lambda = -(a.angular_velocity() - b.angular_velocity()).dot(n) / k;
                a.apply_angular_impulse(n * lambda);
                b.apply_angular_impulse(-n * lambda);
            }
        }
        self.anchors.solve(a, b, dt);
    }
}
