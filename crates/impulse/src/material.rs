use crate::math::Vec3;

/// Surface and mass description shared between bodies.
///
/// Materials are immutable once built and are handed around as
/// `Arc<Material>`; a body never writes derived quantities back into one.
/// `color` and `shininess` are carried for renderers and ignored by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Mass in kilograms; zero or negative makes the body immovable
    pub mass: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Restitution (bounciness), 0 = perfectly inelastic, 1 = elastic
    pub restitution: f32,
    pub color: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            mass: 1.0,
            friction: 0.5,
            restitution: 0.5,
            color: Vec3::new(0.8, 0.8, 0.8),
            shininess: 32.0,
        }
    }
}

impl Material {
    #[must_use]
    pub fn new(mass: f32, friction: f32, restitution: f32) -> Self {
        Self {
            mass,
            friction,
            restitution,
            ..Self::default()
        }
    }

    /// Zero-mass material for static scenery.
    #[must_use]
    pub fn immovable() -> Self {
        Self {
            mass: 0.0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bouncy() -> Self {
        Self::new(1.0, 0.3, 0.9)
    }

    #[must_use]
    pub fn slippery() -> Self {
        Self::new(1.0, 0.05, 0.2)
    }

    #[must_use]
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }
}
