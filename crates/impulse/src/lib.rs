#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]
//! # Impulse Physics Engine
//!
//! A small rigid-body simulator: bodies with mass properties, rigid
//! composite assemblies with internal joints, a revolute joint with a
//! velocity motor, sphere contacts and a fixed-order step loop.
//!
//! ## Key Components
//!
//! -   **Math:** [`Vec3`] and the column-major [`Mat4`] in the [`math`] module.
//! -   **Bodies:** [`RigidBody`] carries a closed [`Shape`], a shared
//!     [`Material`] and its kinematic state. Bodies with mass ≤ 0 are static.
//! -   **Composites:** [`CompositeBody`] aggregates parts into one rigid body,
//!     re-deriving mass, center of mass and inertia as parts are added.
//! -   **Joints:** [`RevoluteJoint`] (hinge with motor) and [`FixedJoint`].
//! -   **Collision:** sphere-sphere and sphere-box detection with an impulse
//!     solver, in the [`collision`] module.
//! -   **Scene:** [`Scene::step`] integrates, detects, solves and corrects,
//!     always in that order.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use impulse::{Material, RigidBody, Scene, Vec3};
//!
//! let mut scene = Scene::new();
//! let ground = Arc::new(Material::immovable());
//! scene.add_body(RigidBody::cuboid(Vec3::new(10.0, 0.5, 10.0), ground));
//! let ball = scene.add_body(
//!     RigidBody::sphere(0.5, Arc::new(Material::bouncy()))
//!         .with_position(Vec3::new(0.0, 3.0, 0.0)),
//! );
//!
//! scene.run(1.0 / 60.0, 120);
//! assert!(scene.body(ball).unwrap().position().y > 0.5);
//! ```

pub mod body;
pub mod collision;
pub mod composite;
pub mod config;
pub mod error;
pub mod integrator;
pub mod joint;
pub mod material;
pub mod math;
pub mod scene;
pub mod shapes;

pub use body::{BodyHandle, MassProperties, RigidBody};
pub use collision::{CollisionConstraint, Contact};
pub use composite::{CompositeBody, JointId, Part, PartId};
pub use config::SceneConfig;
pub use error::PhysicsError;
pub use joint::{FixedJoint, Joint, JointKind, RevoluteJoint};
pub use material::Material;
pub use math::{Mat4, Vec3, EPSILON};
pub use scene::Scene;
pub use shapes::{BoundingBox, Shape, TriangleMesh};
