//! Collision detection against static planes
//!
//! Provides circle/polygon vs plane contact generation and collision
//! filtering via layer masks.

use bitflags::bitflags;

use crate::material::PhysicsMaterial;
use crate::shapes::{Plane2D, Shape};
use demo2d_math::{Polygon, Transform2, Vec2};

bitflags! {
    /// Collision layers for filtering which fixtures touch which colliders
    ///
    /// Each layer is a bit in a 32-bit mask. Fixtures can belong to multiple
    /// layers and define which layers they collide with via a mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most objects
        const DEFAULT = 1 << 0;
        /// Static world geometry (screen bounds, ground)
        const STATIC = 1 << 1;
        /// Ragdoll limbs
        const RAGDOLL = 1 << 2;
        /// All layers (collide with everything)
        const ALL = 0xFFFFFFFF;
    }
}

/// Collision filter determining what a fixture collides with
///
/// Two filters A and B collide if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this object belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this object can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }
}

impl CollisionFilter {
    /// Create a new collision filter with specified layer and mask
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Check if this filter allows collision with another filter
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }

    /// Static world geometry, touched by everything
    pub fn static_world() -> Self {
        Self {
            layer: CollisionLayer::STATIC,
            mask: CollisionLayer::ALL,
        }
    }

    /// Ragdoll limbs
    pub fn ragdoll() -> Self {
        Self {
            layer: CollisionLayer::RAGDOLL,
            mask: CollisionLayer::ALL,
        }
    }
}

/// An immovable plane bounding the world (floor, walls, ceiling)
#[derive(Clone, Copy, Debug)]
pub struct StaticPlane {
    pub plane: Plane2D,
    pub material: PhysicsMaterial,
    pub filter: CollisionFilter,
}

impl StaticPlane {
    /// Create a static plane from a normal and distance
    pub fn new(normal: Vec2, distance: f32, material: PhysicsMaterial) -> Self {
        Self {
            plane: Plane2D::new(normal, distance),
            material,
            filter: CollisionFilter::static_world(),
        }
    }

    /// Horizontal floor at the given height
    pub fn floor(y: f32, material: PhysicsMaterial) -> Self {
        Self::new(Vec2::Y, y, material)
    }

    /// Set the collision filter
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Contact information from a collision
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Deepest point of the shape, in world space
    pub point: Vec2,
    /// Normal pointing from the plane toward the shape
    pub normal: Vec2,
    /// Penetration depth (positive means overlapping)
    pub penetration: f32,
}

impl Contact {
    /// Create a new contact
    pub fn new(point: Vec2, normal: Vec2, penetration: f32) -> Self {
        Self {
            point,
            normal,
            penetration,
        }
    }
}

/// Test circle vs plane collision
///
/// The contact normal is the plane normal; the contact point is the point of
/// the circle deepest below the plane.
pub fn circle_vs_plane(center: Vec2, radius: f32, plane: &Plane2D) -> Option<Contact> {
    let penetration = radius - plane.signed_distance(center);

    if penetration > 0.0 {
        let point = center - plane.normal * radius;
        Some(Contact::new(point, plane.normal, penetration))
    } else {
        None
    }
}

/// Test polygon vs plane collision
///
/// `polygon` must already be in world space. Uses the vertex deepest below
/// the plane.
pub fn polygon_vs_plane(polygon: &Polygon, plane: &Plane2D) -> Option<Contact> {
    let (deepest, distance) = polygon
        .vertices()
        .iter()
        .map(|v| (*v, plane.signed_distance(*v)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    if distance < 0.0 {
        Some(Contact::new(deepest, plane.normal, -distance))
    } else {
        None
    }
}

/// Contact between a body-local shape and a plane
pub fn shape_vs_plane(shape: &Shape, xf: &Transform2, plane: &Plane2D) -> Option<Contact> {
    match shape {
        Shape::Circle(c) => circle_vs_plane(xf.apply(c.center), c.radius, plane),
        Shape::Polygon(p) => polygon_vs_plane(&p.transformed(xf), plane),
    }
}
