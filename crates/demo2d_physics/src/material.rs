//! Physical material properties for fixtures

use serde::{Deserialize, Serialize};

/// Physical material properties of a fixture
///
/// Materials define how heavy a fixture is (density, in kg/m²) and how it
/// interacts during collisions: friction (how much it resists sliding) and
/// restitution (bounciness).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Mass per unit area
    pub density: f32,
    /// Friction coefficient (0.0 = ice, 1.0 = rubber)
    pub friction: f32,
    /// Restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.3,
            restitution: 0.0,
        }
    }
}

impl PhysicsMaterial {
    /// Light and floaty, used for crates in the buoyancy demo
    pub const WOOD: Self = Self {
        density: 1.0,
        friction: 0.5,
        restitution: 0.2,
    };

    /// Heavy enough to sink
    pub const METAL: Self = Self {
        density: 7.0,
        friction: 0.3,
        restitution: 0.3,
    };

    /// Bouncy and grippy
    pub const RUBBER: Self = Self {
        density: 1.2,
        friction: 0.9,
        restitution: 0.8,
    };

    /// Ragdoll limbs
    pub const FLESH: Self = Self {
        density: 20.0,
        friction: 0.4,
        restitution: 0.3,
    };

    /// Static boundaries
    pub const GROUND: Self = Self {
        density: 0.0,
        friction: 0.7,
        restitution: 0.1,
    };

    /// Create a new physics material
    ///
    /// Density is clamped to be non-negative, friction and restitution
    /// to the range [0.0, 1.0].
    pub fn new(density: f32, friction: f32, restitution: f32) -> Self {
        Self {
            density: density.max(0.0),
            friction: friction.clamp(0.0, 1.0),
            restitution: restitution.clamp(0.0, 1.0),
        }
    }

    /// Combine two materials for collision response
    ///
    /// Uses geometric mean for friction and maximum for restitution.
    /// Density is irrelevant for a contact and is taken from `self`.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            density: self.density,
            friction: (self.friction * other.friction).sqrt(),
            restitution: self.restitution.max(other.restitution),
        }
    }
}
