//! 2D rotation and rigid transform
//!
//! In 2D a rotation happens in the single XY plane, so it is fully described
//! by one angle. We cache the cosine and sine to avoid recomputing them every
//! time a point is transformed.

use crate::Vec2;

/// 2D rotation stored as cosine/sine of the angle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rot2 {
    /// Cosine of the angle
    pub c: f32,
    /// Sine of the angle
    pub s: f32,
}

impl Default for Rot2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rot2 {
    /// Identity rotation (no rotation)
    pub const IDENTITY: Self = Self { c: 1.0, s: 0.0 };

    /// Create a rotation from an angle in radians (counter-clockwise)
    pub fn from_angle(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self { c, s }
    }

    /// The rotation angle in radians, in (-π, π]
    pub fn angle(&self) -> f32 {
        self.s.atan2(self.c)
    }

    /// Rotate a vector
    #[inline]
    pub fn rotate(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.c * v.x - self.s * v.y, self.s * v.x + self.c * v.y)
    }

    /// Rotate a vector by the inverse of this rotation
    #[inline]
    pub fn inverse_rotate(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.c * v.x + self.s * v.y, -self.s * v.x + self.c * v.y)
    }
}

/// A rigid 2D transform: rotation followed by translation
///
/// Maps body-local coordinates to world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform2 {
    /// Translation (body origin in world space)
    pub position: Vec2,
    /// Rotation of the body
    pub rotation: Rot2,
}

impl Transform2 {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: Rot2::IDENTITY,
    };

    /// Create a transform from a position and an angle
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            rotation: Rot2::from_angle(angle),
        }
    }

    /// Create a pure translation
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            rotation: Rot2::IDENTITY,
        }
    }

    /// Transform a local point into world space
    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        self.rotation.rotate(p) + self.position
    }

    /// Transform a world point into local space
    #[inline]
    pub fn apply_inverse(&self, p: Vec2) -> Vec2 {
        self.rotation.inverse_rotate(p - self.position)
    }

    /// Rotate a local direction into world space (no translation)
    #[inline]
    pub fn apply_direction(&self, d: Vec2) -> Vec2 {
        self.rotation.rotate(d)
    }
}
