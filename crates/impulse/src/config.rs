//! Scene-wide tuning knobs.

use crate::math::Vec3;

/// Parameters of the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Constant acceleration applied to every dynamic body
    pub gravity: Vec3,
    /// Velocity-solver passes per step (joints then contacts in each pass)
    pub solver_iterations: usize,
    /// Penetration tolerated without positional correction
    pub penetration_slop: f32,
    /// Fraction of the remaining penetration removed per step (0-1)
    pub penetration_correction: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            solver_iterations: 8,
            penetration_slop: 0.01,
            penetration_correction: 0.4,
        }
    }
}
