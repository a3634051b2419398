//! # Math Kernel
//!
//! Small fixed-size value types shared by every other module: [`Vec3`] for
//! points and directions, [`Mat4`] for transforms and inertia tensors.

mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;

/// Threshold below which effective masses and denominators are treated as zero.
pub const EPSILON: f32 = 1e-6;
