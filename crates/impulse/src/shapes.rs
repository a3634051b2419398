//! # Shapes and Bounding Volumes
//!
//! [`Shape`] is the closed set of geometries a [`RigidBody`](crate::RigidBody)
//! can carry. Everything that depends on geometry (inertia, bounds, narrow
//! phase) matches on it exhaustively.

use crate::composite::CompositeBody;
use crate::math::{Mat4, Vec3};

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounds of a box with `half_extents` along the columns of `rotation`.
    #[must_use]
    pub fn from_oriented_box(center: Vec3, rotation: &Mat4, half_extents: Vec3) -> Self {
        let m = &rotation.m;
        let reach = |row: usize| {
            m[0][row].abs() * half_extents.x
                + m[1][row].abs() * half_extents.y
                + m[2][row].abs() * half_extents.z
        };
        Self::from_center_half_extents(center, Vec3::new(reach(0), reach(1), reach(2)))
    }

    /// Degenerate box containing a single point.
    #[must_use]
    pub fn point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing every point, `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        points
            .into_iter()
            .map(Self::point)
            .reduce(|acc, b| acc.union(&b))
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Check if two bounding boxes overlap (touching counts).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Triangle soup supplied by a mesh importer. The core never interprets the
/// triangles; vertices only feed the bounding box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    #[must_use]
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Geometry of a rigid body.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Box in the body's local frame. Bounds and contacts follow the body's
    /// rotation.
    Cuboid { half_extents: Vec3 },
    /// Upright cylinder along the local Y axis. `sides` is a tessellation hint
    /// for renderers.
    Cylinder { height: f32, radius: f32, sides: u32 },
    Mesh(TriangleMesh),
    Composite(CompositeBody),
}

impl Shape {
    /// Solid-body inertia tensor about the shape's own center for `mass`.
    ///
    /// Meshes and composites return zero: meshes have no volume model and a
    /// composite's tensor is aggregated from its parts instead.
    #[must_use]
    pub fn inertia_tensor(&self, mass: f32) -> Mat4 {
        match self {
            Self::Sphere { radius } => {
                Mat4::from_diagonal(Vec3::splat(0.4 * mass * radius * radius))
            }
            Self::Cuboid { half_extents } => {
                let size = *half_extents * 2.0;
                let (x2, y2, z2) = (size.x * size.x, size.y * size.y, size.z * size.z);
                let k = mass / 12.0;
                Mat4::from_diagonal(Vec3::new(k * (y2 + z2), k * (x2 + z2), k * (x2 + y2)))
            }
            Self::Cylinder { height, radius, .. } => {
                let r2 = radius * radius;
                let side = mass / 12.0 * (3.0 * r2 + height * height);
                Mat4::from_diagonal(Vec3::new(side, 0.5 * mass * r2, side))
            }
            Self::Mesh(_) | Self::Composite(_) => Mat4::ZERO,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Cuboid { .. } => "cuboid",
            Self::Cylinder { .. } => "cylinder",
            Self::Mesh(_) => "mesh",
            Self::Composite(_) => "composite",
        }
    }
}
