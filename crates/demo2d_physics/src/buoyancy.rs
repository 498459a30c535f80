//! Buoyancy controller
//!
//! Applies buoyancy and drag to a set of bodies floating in a fluid whose
//! surface is the line `normal · p = offset`.

use crate::body::{BodyKey, RigidBody2D};
use demo2d_math::Vec2;
use slotmap::SlotMap;

/// Fluid volume acting on registered bodies every step
#[derive(Clone, Debug)]
pub struct BuoyancyController {
    /// Surface normal, pointing out of the fluid
    pub normal: Vec2,
    /// Surface height along the normal
    pub offset: f32,
    /// Fluid density
    pub density: f32,
    /// Linear drag coefficient
    pub linear_drag: f32,
    /// Angular drag coefficient
    pub angular_drag: f32,
    /// Fluid velocity, for currents
    pub velocity: Vec2,
    /// Weight submerged area by fixture density
    pub use_density: bool,
    /// Use the world gravity instead of `gravity`
    pub use_world_gravity: bool,
    /// Gravity used when `use_world_gravity` is false
    pub gravity: Vec2,
    bodies: Vec<BodyKey>,
}

impl Default for BuoyancyController {
    fn default() -> Self {
        Self {
            normal: Vec2::Y,
            offset: 0.0,
            density: 2.0,
            linear_drag: 2.0,
            angular_drag: 1.0,
            velocity: Vec2::ZERO,
            use_density: false,
            use_world_gravity: true,
            gravity: Vec2::ZERO,
            bodies: Vec::new(),
        }
    }
}

impl BuoyancyController {
    /// Fluid with the surface `normal · p = offset`
    pub fn new(normal: Vec2, offset: f32) -> Self {
        Self {
            normal: normal.normalized(),
            offset,
            ..Default::default()
        }
    }

    /// Register a body; registering twice has no effect
    pub fn add_body(&mut self, body: BodyKey) {
        if !self.bodies.contains(&body) {
            self.bodies.push(body);
        }
    }

    /// Unregister a body
    pub fn remove_body(&mut self, body: BodyKey) {
        self.bodies.retain(|b| *b != body);
    }

    /// Registered bodies
    pub fn bodies(&self) -> &[BodyKey] {
        &self.bodies
    }

    /// Apply buoyancy, drag and angular drag to every registered body
    pub fn apply(&self, bodies: &mut SlotMap<BodyKey, RigidBody2D>, world_gravity: Vec2) {
        let gravity = if self.use_world_gravity { world_gravity } else { self.gravity };

        for key in &self.bodies {
            if let Some(body) = bodies.get_mut(*key) {
                self.apply_to_body(body, gravity);
            }
        }
    }

    fn apply_to_body(&self, body: &mut RigidBody2D, gravity: Vec2) {
        if !body.is_dynamic() {
            return;
        }

        let mut area = 0.0;
        let mut area_center = Vec2::ZERO;
        let mut mass = 0.0;
        let mut mass_center = Vec2::ZERO;

        for fixture in body.fixtures() {
            let submerged = fixture.shape.submerged(body.transform(), self.normal, self.offset);
            let Some((wet_area, centroid)) = submerged else {
                continue;
            };
            let density = if self.use_density { fixture.material.density } else { 1.0 };
            area += wet_area;
            area_center += centroid * wet_area;
            mass += wet_area * density;
            mass_center += centroid * (wet_area * density);
        }

        if area < f32::EPSILON {
            return;
        }
        area_center = area_center * (1.0 / area);
        mass_center = if mass > f32::EPSILON { mass_center * (1.0 / mass) } else { area_center };

        let buoyancy = gravity * (-self.density * area);
        body.apply_force_at_point(buoyancy, mass_center);

        let relative = body.velocity_at_point(area_center) - self.velocity;
        let drag = relative * (-self.linear_drag * area);
        body.apply_force_at_point(drag, area_center);

        let torque =
            -body.inertia() / body.mass() * area * body.angular_velocity * self.angular_drag;
        body.apply_torque(torque);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::PhysicsMaterial;
    use crate::shapes::Shape;

    fn world_with(body: RigidBody2D) -> (SlotMap<BodyKey, RigidBody2D>, BodyKey) {
        let mut bodies = SlotMap::with_key();
        let key = bodies.insert(body);
        (bodies, key)
    }

    #[test]
    fn test_submerged_body_pushed_up() {
        let (mut bodies, key) = world_with(
            RigidBody2D::dynamic(Vec2::new(0.0, -2.0))
                .with_fixture(Shape::rect(0.5, 0.5), PhysicsMaterial::WOOD),
        );
        let mut water = BuoyancyController::new(Vec2::Y, 0.0);
        water.add_body(key);
        water.apply(&mut bodies, Vec2::new(0.0, -20.0));

        // Fully submerged box of area 1 in fluid density 2
        let force = bodies[key].force();
        assert!((force.y - 40.0).abs() < 1e-3);
        assert!(force.x.abs() < 1e-5);
    }

    #[test]
    fn test_dry_body_unaffected() {
        let (mut bodies, key) = world_with(
            RigidBody2D::dynamic(Vec2::new(0.0, 5.0))
                .with_fixture(Shape::circle(0.5), PhysicsMaterial::WOOD),
        );
        let mut water = BuoyancyController::new(Vec2::Y, 0.0);
        water.add_body(key);
        water.apply(&mut bodies, Vec2::new(0.0, -20.0));
        assert_eq!(bodies[key].force(), Vec2::ZERO);
    }

    #[test]
    fn test_unregistered_body_unaffected() {
        let (mut bodies, key) = world_with(
            RigidBody2D::dynamic(Vec2::new(0.0, -2.0))
                .with_fixture(Shape::rect(0.5, 0.5), PhysicsMaterial::WOOD),
        );
        let water = BuoyancyController::new(Vec2::Y, 0.0);
        water.apply(&mut bodies, Vec2::new(0.0, -20.0));
        assert_eq!(bodies[key].force(), Vec2::ZERO);
    }

    #[test]
    fn test_linear_drag_opposes_motion() {
        let (mut bodies, key) = world_with(
            RigidBody2D::dynamic(Vec2::new(0.0, -2.0))
                .with_fixture(Shape::rect(0.5, 0.5), PhysicsMaterial::WOOD)
                .with_linear_velocity(Vec2::new(3.0, 0.0)),
        );
        let mut water = BuoyancyController::new(Vec2::Y, 0.0);
        water.add_body(key);
        water.apply(&mut bodies, Vec2::ZERO);
        assert!(bodies[key].force().x < 0.0);
    }

    #[test]
    fn test_add_body_is_idempotent() {
        let (_, key) = world_with(RigidBody2D::dynamic(Vec2::ZERO));
        let mut water = BuoyancyController::default();
        water.add_body(key);
        water.add_body(key);
        assert_eq!(water.bodies().len(), 1);
        water.remove_body(key);
        assert!(water.bodies().is_empty());
    }
}
