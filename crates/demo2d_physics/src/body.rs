//! Rigid body types for 2D physics simulation

use crate::collision::CollisionFilter;
use crate::material::PhysicsMaterial;
use crate::shapes::{Aabb, Shape};
use demo2d_math::{Rot2, Transform2, Vec2};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing to prevent the ABA problem where a handle
    /// could point to a reused slot. If a body is removed and its slot reused,
    /// old keys will return None instead of pointing to the wrong body.
    /// Two keys compare equal only when they name the same body.
    pub struct BodyKey;
}

/// How a body participates in the simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves, infinite mass
    Static,
    /// Moves only by its velocity, unaffected by forces
    Kinematic,
    /// Fully simulated
    Dynamic,
}

/// A collision shape bound to a body, with its material and filter
#[derive(Clone, Debug, PartialEq)]
pub struct Fixture {
    pub shape: Shape,
    pub material: PhysicsMaterial,
    pub filter: CollisionFilter,
}

impl Fixture {
    /// Create a fixture with the default collision filter
    pub fn new(shape: Shape, material: PhysicsMaterial) -> Self {
        Self {
            shape,
            material,
            filter: CollisionFilter::default(),
        }
    }

    /// Set the collision filter of this fixture
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Identifies one fixture of one body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixtureRef {
    pub body: BodyKey,
    pub index: usize,
}

/// A 2D rigid body made of one or more fixtures
#[derive(Clone, Debug)]
pub struct RigidBody2D {
    body_type: BodyType,
    /// Body origin and rotation in world space
    transform: Transform2,
    /// Rotation angle in radians (unwrapped, unlike `transform.rotation`)
    angle: f32,
    /// Center of mass in body-local coordinates
    local_center: Vec2,
    /// Center of mass in world coordinates
    world_center: Vec2,
    /// Linear velocity of the center of mass (m/s)
    pub linear_velocity: Vec2,
    /// Angular velocity (rad/s, counter-clockwise)
    pub angular_velocity: f32,
    /// Linear velocity damping per second
    pub linear_damping: f32,
    /// Angular velocity damping per second
    pub angular_damping: f32,
    /// Multiplier applied to world gravity
    pub gravity_scale: f32,
    force: Vec2,
    torque: f32,
    mass: f32,
    inv_mass: f32,
    /// Rotational inertia about the center of mass
    inertia: f32,
    inv_inertia: f32,
    fixtures: Vec<Fixture>,
    /// Application tag; `Some(0)` marks bodies that ray casts ignore
    user_tag: Option<i32>,
}

impl RigidBody2D {
    /// Create a body of the given type at a position, with no fixtures
    pub fn new(body_type: BodyType, position: Vec2) -> Self {
        let mut body = Self {
            body_type,
            transform: Transform2::from_position(position),
            angle: 0.0,
            local_center: Vec2::ZERO,
            world_center: position,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
            force: Vec2::ZERO,
            torque: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            fixtures: Vec::new(),
            user_tag: None,
        };
        body.reset_mass_data();
        body
    }

    /// Create a dynamic body at a position
    pub fn dynamic(position: Vec2) -> Self {
        Self::new(BodyType::Dynamic, position)
    }

    /// Create a static body at a position
    pub fn fixed(position: Vec2) -> Self {
        Self::new(BodyType::Static, position)
    }

    /// Attach a fixture with the default filter
    pub fn with_fixture(self, shape: Shape, material: PhysicsMaterial) -> Self {
        self.with_fixture_def(Fixture::new(shape, material))
    }

    /// Attach a fully specified fixture
    pub fn with_fixture_def(mut self, fixture: Fixture) -> Self {
        self.add_fixture(fixture);
        self
    }

    /// Set the initial rotation
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.set_transform(self.transform.position, angle);
        self
    }

    /// Set the linear velocity of this body
    pub fn with_linear_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set the angular velocity of this body
    pub fn with_angular_velocity(mut self, omega: f32) -> Self {
        self.angular_velocity = omega;
        self
    }

    /// Set linear and angular damping
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear.max(0.0);
        self.angular_damping = angular.max(0.0);
        self
    }

    /// Set the gravity multiplier
    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Attach an application tag
    pub fn with_user_tag(mut self, tag: i32) -> Self {
        self.user_tag = Some(tag);
        self
    }

    /// Add a fixture and recompute mass properties
    pub fn add_fixture(&mut self, fixture: Fixture) {
        self.fixtures.push(fixture);
        self.reset_mass_data();
    }

    /// Body type
    #[inline]
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// True for static bodies
    #[inline]
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// True for dynamic bodies
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// Body origin in world space
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Rotation angle in radians
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Body transform (local -> world)
    #[inline]
    pub fn transform(&self) -> &Transform2 {
        &self.transform
    }

    /// Center of mass in world space
    #[inline]
    pub fn world_center(&self) -> Vec2 {
        self.world_center
    }

    /// Center of mass in body-local space
    #[inline]
    pub fn local_center(&self) -> Vec2 {
        self.local_center
    }

    /// Total mass (zero for static and kinematic bodies)
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Inverse mass (zero for static and kinematic bodies)
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Rotational inertia about the center of mass
    #[inline]
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    /// Inverse rotational inertia
    #[inline]
    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    /// Fixtures attached to this body
    #[inline]
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Application tag, if any
    #[inline]
    pub fn user_tag(&self) -> Option<i32> {
        self.user_tag
    }

    /// Replace the application tag
    pub fn set_user_tag(&mut self, tag: Option<i32>) {
        self.user_tag = tag;
    }

    /// Teleport the body origin and set its rotation
    pub fn set_transform(&mut self, position: Vec2, angle: f32) {
        self.angle = angle;
        self.transform = Transform2::new(position, angle);
        self.world_center = self.transform.apply(self.local_center);
    }

    /// Move the center of mass and rotation, then re-derive the origin
    pub(crate) fn set_center_and_angle(&mut self, center: Vec2, angle: f32) {
        self.angle = angle;
        self.world_center = center;
        let rotation = Rot2::from_angle(angle);
        self.transform = Transform2 {
            position: center - rotation.rotate(self.local_center),
            rotation,
        };
    }

    /// Convert a body-local point to world space
    #[inline]
    pub fn world_point(&self, local: Vec2) -> Vec2 {
        self.transform.apply(local)
    }

    /// Convert a world point to body-local space
    #[inline]
    pub fn local_point(&self, world: Vec2) -> Vec2 {
        self.transform.apply_inverse(world)
    }

    /// Velocity of a world point rigidly attached to this body
    pub fn velocity_at_point(&self, point: Vec2) -> Vec2 {
        self.linear_velocity + Vec2::scalar_cross(self.angular_velocity, point - self.world_center)
    }

    /// Accumulate a force through the center of mass
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_dynamic() {
            self.force += force;
        }
    }

    /// Accumulate a force at a world point (also produces torque)
    pub fn apply_force_at_point(&mut self, force: Vec2, point: Vec2) {
        if self.is_dynamic() {
            self.force += force;
            self.torque += (point - self.world_center).cross(force);
        }
    }

    /// Accumulate a torque
    pub fn apply_torque(&mut self, torque: f32) {
        if self.is_dynamic() {
            self.torque += torque;
        }
    }

    /// Apply an instantaneous impulse at a world point
    pub fn apply_linear_impulse(&mut self, impulse: Vec2, point: Vec2) {
        if self.is_dynamic() {
            self.linear_velocity += impulse * self.inv_mass;
            self.angular_velocity += self.inv_inertia * (point - self.world_center).cross(impulse);
        }
    }

    /// Accumulated force since the last step
    #[inline]
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Accumulated torque since the last step
    #[inline]
    pub fn torque(&self) -> f32 {
        self.torque
    }

    pub(crate) fn clear_forces(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// World-space bounds of one fixture
    pub fn fixture_aabb(&self, index: usize) -> Option<Aabb> {
        self.fixtures.get(index).map(|f| f.shape.aabb(&self.transform))
    }

    /// Test whether a world point is inside any fixture of this body
    pub fn test_point(&self, point: Vec2) -> bool {
        self.fixtures.iter().any(|f| f.shape.test_point(&self.transform, point))
    }

    /// Recompute mass, center of mass and inertia from the fixtures
    ///
    /// Static and kinematic bodies have zero mass. A dynamic body without
    /// density gets unit mass so it still responds to forces.
    pub fn reset_mass_data(&mut self) {
        self.mass = 0.0;
        self.inv_mass = 0.0;
        self.inertia = 0.0;
        self.inv_inertia = 0.0;
        self.local_center = Vec2::ZERO;

        if self.body_type != BodyType::Dynamic {
            self.world_center = self.transform.position;
            return;
        }

        let mut center = Vec2::ZERO;
        let mut inertia_about_origin = 0.0;
        for fixture in &self.fixtures {
            if fixture.material.density == 0.0 {
                continue;
            }
            let md = fixture.shape.mass_data(fixture.material.density);
            self.mass += md.mass;
            center += md.center * md.mass;
            inertia_about_origin += md.inertia;
        }

        if self.mass > 0.0 {
            self.inv_mass = 1.0 / self.mass;
            center = center * self.inv_mass;
        } else {
            self.mass = 1.0;
            self.inv_mass = 1.0;
        }

        // Shift the inertia from the body origin to the center of mass
        let inertia = inertia_about_origin - self.mass * center.length_squared();
        if inertia > 0.0 {
            self.inertia = inertia;
            self.inv_inertia = 1.0 / inertia;
        }

        self.local_center = center;
        self.world_center = self.transform.apply(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_dynamic_box_mass() {
        let body = RigidBody2D::dynamic(Vec2::new(1.0, 2.0))
            .with_fixture(Shape::rect(1.0, 0.5), PhysicsMaterial::new(2.0, 0.3, 0.0));

        assert!(approx(body.mass(), 4.0));
        assert!(approx(body.inv_mass(), 0.25));
        // I = m (w^2 + h^2) / 12 with w = 2, h = 1
        assert!(approx(body.inertia(), 4.0 * 5.0 / 12.0));
        assert_eq!(body.world_center(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_static_body_has_no_mass() {
        let body = RigidBody2D::fixed(Vec2::ZERO)
            .with_fixture(Shape::rect(5.0, 0.5), PhysicsMaterial::GROUND);
        assert!(body.is_static());
        assert_eq!(body.mass(), 0.0);
        assert_eq!(body.inv_mass(), 0.0);
    }

    #[test]
    fn test_dynamic_without_density_gets_unit_mass() {
        let body = RigidBody2D::dynamic(Vec2::ZERO)
            .with_fixture(Shape::circle(1.0), PhysicsMaterial::GROUND);
        assert_eq!(body.mass(), 1.0);
    }

    #[test]
    fn test_offset_fixture_moves_center_of_mass() {
        let shape = Shape::Circle(crate::shapes::Circle::new(Vec2::new(2.0, 0.0), 0.5));
        let body = RigidBody2D::dynamic(Vec2::new(1.0, 0.0))
            .with_fixture(shape, PhysicsMaterial::WOOD)
            .with_angle(std::f32::consts::FRAC_PI_2);

        assert!(approx(body.local_center().x, 2.0));
        assert!(approx(body.world_center().x, 1.0));
        assert!(approx(body.world_center().y, 2.0));
    }

    #[test]
    fn test_user_tag() {
        let body = RigidBody2D::dynamic(Vec2::ZERO);
        assert_eq!(body.user_tag(), None);
        let body = body.with_user_tag(0);
        assert_eq!(body.user_tag(), Some(0));
    }

    #[test]
    fn test_force_at_point_produces_torque() {
        let mut body = RigidBody2D::dynamic(Vec2::ZERO)
            .with_fixture(Shape::rect(1.0, 1.0), PhysicsMaterial::WOOD);
        body.apply_force_at_point(Vec2::Y, Vec2::new(1.0, 0.0));
        assert_eq!(body.force(), Vec2::Y);
        assert!(approx(body.torque(), 1.0));

        body.clear_forces();
        assert_eq!(body.force(), Vec2::ZERO);
    }

    #[test]
    fn test_static_body_ignores_forces() {
        let mut body = RigidBody2D::fixed(Vec2::ZERO);
        body.apply_force(Vec2::new(10.0, 0.0));
        body.apply_linear_impulse(Vec2::new(10.0, 0.0), Vec2::ZERO);
        assert_eq!(body.force(), Vec2::ZERO);
        assert_eq!(body.linear_velocity, Vec2::ZERO);
    }

    #[test]
    fn test_velocity_at_point() {
        let body = RigidBody2D::dynamic(Vec2::ZERO)
            .with_fixture(Shape::circle(1.0), PhysicsMaterial::WOOD)
            .with_angular_velocity(1.0);
        let v = body.velocity_at_point(Vec2::new(1.0, 0.0));
        assert!(approx(v.x, 0.0));
        assert!(approx(v.y, 1.0));
    }

    #[test]
    fn test_local_world_point_round_trip() {
        let body = RigidBody2D::dynamic(Vec2::new(3.0, 4.0)).with_angle(0.4);
        let local = Vec2::new(0.25, -1.0);
        let back = body.local_point(body.world_point(local));
        assert!(approx(back.x, local.x) && approx(back.y, local.y));
    }

    #[test]
    fn test_test_point() {
        let body = RigidBody2D::dynamic(Vec2::new(5.0, 5.0))
            .with_fixture(Shape::rect(1.0, 1.0), PhysicsMaterial::WOOD);
        assert!(body.test_point(Vec2::new(5.5, 5.5)));
        assert!(!body.test_point(Vec2::ZERO));
    }
}
