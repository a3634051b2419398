//! # Rigid Bodies
//!
//! A [`RigidBody`] owns one physical object's kinematic state, its mass
//! properties and its world transform. Static bodies (mass ≤ 0) are never moved
//! by forces, impulses or integration.

use std::sync::Arc;

use crate::composite::CompositeBody;
use crate::integrator::{integrate_linear, integrate_rotation};
use crate::material::Material;
use crate::math::{Mat4, Vec3};
use crate::shapes::{BoundingBox, Shape, TriangleMesh};

/// Index of a top-level body in a [`Scene`](crate::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub usize);

impl BodyHandle {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Mass, local center of mass and inertia tensor with its cached inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f32,
    /// Center of mass in the body's local frame
    pub center_of_mass: Vec3,
    /// Inertia tensor about the center of mass, local frame (upper 3×3)
    pub inertia: Mat4,
    /// Zero for static bodies and singular tensors
    pub inverse_inertia: Mat4,
}

impl MassProperties {
    #[must_use]
    pub fn new(mass: f32, center_of_mass: Vec3, inertia: Mat4) -> Self {
        let inverse_inertia = if mass > 0.0 {
            inertia.inverse3().unwrap_or(Mat4::ZERO)
        } else {
            Mat4::ZERO
        };
        Self {
            mass,
            center_of_mass,
            inertia,
            inverse_inertia,
        }
    }

    #[must_use]
    pub fn inverse_mass(&self) -> f32 {
        if self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }
}

impl Default for MassProperties {
    fn default() -> Self {
        Self::new(0.0, Vec3::ZERO, Mat4::ZERO)
    }
}

#[derive(Debug, Clone)]
pub struct RigidBody {
    shape: Shape,
    material: Arc<Material>,
    // Unused for composites, which aggregate their parts instead.
    mass_properties: MassProperties,

    position: Vec3,
    rotation: Mat4,
    velocity: Vec3,
    acceleration: Vec3,
    angular_velocity: Vec3,

    transform: Mat4,
    aabb: BoundingBox,
}

impl RigidBody {
    /// Creates a body at the origin, at rest, with mass taken from `material`.
    #[must_use]
    pub fn new(shape: Shape, material: Arc<Material>) -> Self {
        let mass = material.mass;
        let mass_properties = MassProperties::new(mass, Vec3::ZERO, shape.inertia_tensor(mass));
        let mut body = Self {
            shape,
            material,
            mass_properties,
            position: Vec3::ZERO,
            rotation: Mat4::IDENTITY,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            transform: Mat4::IDENTITY,
            aabb: BoundingBox::default(),
        };
        body.refresh_transform();
        body.compute_aabb();
        body
    }

    #[must_use]
    pub fn sphere(radius: f32, material: Arc<Material>) -> Self {
        Self::new(Shape::Sphere { radius }, material)
    }

    /// Box described by half its size along each axis.
    #[must_use]
    pub fn cuboid(half_extents: Vec3, material: Arc<Material>) -> Self {
        Self::new(Shape::Cuboid { half_extents }, material)
    }

    #[must_use]
    pub fn cylinder(height: f32, radius: f32, sides: u32, material: Arc<Material>) -> Self {
        Self::new(Shape::Cylinder { height, radius, sides }, material)
    }

    #[must_use]
    pub fn mesh(mesh: TriangleMesh, material: Arc<Material>) -> Self {
        Self::new(Shape::Mesh(mesh), material)
    }

    /// Wraps a composite. Its mass comes from the parts; `material` only
    /// supplies appearance.
    #[must_use]
    pub fn composite(composite: CompositeBody, material: Arc<Material>) -> Self {
        Self::new(Shape::Composite(composite), material)
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    // ---- read accessors ----

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    #[must_use]
    pub fn mass_properties(&self) -> &MassProperties {
        match &self.shape {
            Shape::Composite(c) => c.mass_properties(),
            _ => &self.mass_properties,
        }
    }

    #[must_use]
    pub fn mass(&self) -> f32 {
        self.mass_properties().mass
    }

    #[must_use]
    pub fn inverse_mass(&self) -> f32 {
        self.mass_properties().inverse_mass()
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.mass_properties().is_static()
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Orientation as a pure rotation matrix.
    #[must_use]
    pub fn rotation(&self) -> &Mat4 {
        &self.rotation
    }

    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[must_use]
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Acceleration accumulated by [`apply_force`](Self::apply_force) since the last step.
    #[must_use]
    pub fn pending_acceleration(&self) -> Vec3 {
        self.acceleration
    }

    #[must_use]
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Bounds as of the last [`compute_aabb`](Self::compute_aabb).
    #[must_use]
    pub fn aabb(&self) -> &BoundingBox {
        &self.aabb
    }

    #[must_use]
    pub fn as_composite(&self) -> Option<&CompositeBody> {
        match &self.shape {
            Shape::Composite(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut CompositeBody> {
        match &mut self.shape {
            Shape::Composite(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn world_center_of_mass(&self) -> Vec3 {
        self.transform
            .transform_point(self.mass_properties().center_of_mass)
    }

    /// `R · I⁻¹ · Rᵀ`; zero for static bodies.
    #[must_use]
    pub fn inverse_inertia_world(&self) -> Mat4 {
        let props = self.mass_properties();
        if props.is_static() {
            return Mat4::ZERO;
        }
        self.rotation * props.inverse_inertia * self.rotation.transpose()
    }

    /// Velocity of the material point at `world_point`.
    #[must_use]
    pub fn velocity_at(&self, world_point: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(world_point - self.world_center_of_mass())
    }

    // ---- mutators ----

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh_transform();
    }

    /// Replaces the orientation with the rotation block of `rotation`.
    pub fn set_rotation(&mut self, rotation: &Mat4) {
        self.rotation = rotation.rotation_part().orthonormalized();
        self.refresh_transform();
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }

    /// F = ma: accumulates `force / mass` until the next step.
    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_static() {
            return;
        }
        self.acceleration += force * self.inverse_mass();
    }

    /// Applies `impulse` at `world_point`, changing both linear and angular velocity.
    pub fn apply_impulse(&mut self, impulse: Vec3, world_point: Vec3) {
        if self.is_static() {
            return;
        }
        let r = world_point - self.world_center_of_mass();
        self.velocity += impulse * self.inverse_mass();
        self.angular_velocity += self.inverse_inertia_world().transform_direction(r.cross(impulse));
    }

    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        if self.is_static() {
            return;
        }
        self.angular_velocity += self.inverse_inertia_world().transform_direction(impulse);
    }

    /// Advances the body by `dt` under `gravity` plus any accumulated force.
    ///
    /// The center of mass follows the Velocity-Verlet update and the body
    /// turns about it; the origin is then placed back relative to the new
    /// center of mass.
    pub fn update_physics(&mut self, dt: f32, gravity: Vec3) {
        if self.is_static() {
            self.acceleration = Vec3::ZERO;
            self.refresh_transform();
            return;
        }

        self.acceleration += gravity;

        let local_com = self.mass_properties().center_of_mass;
        let mut com = self.world_center_of_mass();
        integrate_linear(&mut com, &mut self.velocity, self.acceleration, dt);
        self.rotation = integrate_rotation(&self.rotation, self.angular_velocity, dt);
        self.position = com - self.rotation.transform_direction(local_com);

        self.acceleration = Vec3::ZERO;
        self.refresh_transform();
    }

    /// Recomputes the world-space bounds from the current pose.
    ///
    /// Cuboids and cylinders are bounded by their rotated box, so the result
    /// grows as they turn away from the world axes.
    pub fn compute_aabb(&mut self) -> BoundingBox {
        let position = self.position;
        let rotation = self.rotation;
        let aabb = match &mut self.shape {
            Shape::Sphere { radius } => {
                BoundingBox::from_center_half_extents(position, Vec3::splat(*radius))
            }
            Shape::Cuboid { half_extents } => {
                BoundingBox::from_oriented_box(position, &rotation, *half_extents)
            }
            Shape::Cylinder { height, radius, .. } => BoundingBox::from_oriented_box(
                position,
                &rotation,
                Vec3::new(*radius, *height * 0.5, *radius),
            ),
            Shape::Mesh(mesh) => {
                let transform = self.transform;
                let corners = mesh.vertices.iter().map(|v| transform.transform_point(*v));
                BoundingBox::from_points(corners).unwrap_or_else(|| BoundingBox::point(position))
            }
            Shape::Composite(composite) => composite
                .compute_aabb(&self.transform)
                .unwrap_or_else(|| BoundingBox::point(position)),
        };
        self.aabb = aabb;
        aabb
    }

    /// Places the body at a world transform (translation + rotation block).
    pub(crate) fn place(&mut self, world: &Mat4) {
        self.position = world.get_translation();
        self.rotation = world.rotation_part();
        self.refresh_transform();
    }

    /// Rebuilds `transform` from position and rotation and re-places composite
    /// children, keeping every pose-derived value current after a mutation.
    fn refresh_transform(&mut self) {
        self.transform = Mat4::translation(self.position) * self.rotation;
        if let Shape::Composite(composite) = &mut self.shape {
            composite.update_child_transforms(&self.transform);
        }
    }
}

/// Mutable references to two distinct elements of a slice, `None` when the
/// indices are equal or out of range.
pub(crate) fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }
    if a < b {
        let (head, tail) = items.split_at_mut(b);
        Some((&mut head[a], &mut tail[0]))
    } else {
        let (head, tail) = items.split_at_mut(a);
        Some((&mut tail[0], &mut head[b]))
    }
}
