//! Physics world and simulation

use crate::body::{BodyKey, FixtureRef, RigidBody2D};
use crate::buoyancy::BuoyancyController;
use crate::collision::{shape_vs_plane, StaticPlane};
use crate::joint::{Joint, JointKey, MouseJoint, RevoluteJoint, RevoluteJointDef};
use crate::query::{PointQuery, QueryCallback, RayCastCallback, RayCastDirective, RayHit};
use crate::shapes::{Aabb, Shape};
use demo2d_math::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// Half extent of the box used by point queries (m)
pub const POINT_QUERY_EXTENT: f32 = 0.001;

/// Approach speed below which contacts do not bounce (m/s)
const RESTITUTION_THRESHOLD: f32 = 1.0;
/// Penetration allowed before position correction kicks in (m)
const CONTACT_SLOP: f32 = 0.005;
/// Fraction of the remaining penetration corrected each step
const CONTACT_BAUMGARTE: f32 = 0.8;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity acceleration (m/s²)
    pub gravity: Vec2,
    /// Joint and contact velocity passes per step
    pub velocity_iterations: u32,
    /// Joint position correction passes per step
    pub position_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -20.0),
            velocity_iterations: 8,
            position_iterations: 3,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }
}

/// One fixture point below a static plane
#[derive(Clone, Copy, Debug)]
struct PlaneContact {
    point: Vec2,
    normal: Vec2,
    penetration: f32,
    friction: f32,
    restitution: f32,
}

/// The physics world containing all rigid bodies and joints
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody2D>,
    joints: SlotMap<JointKey, Joint>,
    /// World bounds
    static_planes: Vec<StaticPlane>,
    buoyancy: Option<BuoyancyController>,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            joints: SlotMap::with_key(),
            static_planes: Vec::new(),
            buoyancy: None,
            config,
        }
    }

    /// Add a static plane to the world
    pub fn add_static_plane(&mut self, plane: StaticPlane) {
        self.static_planes.push(plane);
    }

    /// Get immutable access to static planes
    pub fn static_planes(&self) -> &[StaticPlane] {
        &self.static_planes
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody2D) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body from the world and return it
    ///
    /// Every joint attached to the body is destroyed with it.
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody2D> {
        let body = self.bodies.remove(key)?;
        self.joints.retain(|_, joint| !joint.involves(key));
        if let Some(buoyancy) = &mut self.buoyancy {
            buoyancy.remove_body(key);
        }
        Some(body)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody2D> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody2D> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Iterate over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody2D)> {
        self.bodies.iter()
    }

    /// Drag `body` toward `target`, grabbing it at `target`
    pub fn create_mouse_joint(
        &mut self,
        body: BodyKey,
        target: Vec2,
        max_force: f32,
    ) -> Option<JointKey> {
        let joint = MouseJoint::new(body, self.bodies.get(body)?, target, max_force);
        Some(self.joints.insert(Joint::Mouse(joint)))
    }

    /// Pin two bodies together
    pub fn create_revolute_joint(&mut self, def: RevoluteJointDef) -> Option<JointKey> {
        let a = self.bodies.get(def.body_a)?;
        let b = self.bodies.get(def.body_b)?;
        if def.body_a == def.body_b {
            return None;
        }
        let joint = RevoluteJoint::new(&def, a, b);
        Some(self.joints.insert(Joint::Revolute(joint)))
    }

    /// Destroy a joint; returns false if it no longer exists
    pub fn destroy_joint(&mut self, key: JointKey) -> bool {
        self.joints.remove(key).is_some()
    }

    pub fn get_joint(&self, key: JointKey) -> Option<&Joint> {
        self.joints.get(key)
    }

    /// Mutable access to a mouse joint, for retargeting
    pub fn mouse_joint_mut(&mut self, key: JointKey) -> Option<&mut MouseJoint> {
        match self.joints.get_mut(key)? {
            Joint::Mouse(joint) => Some(joint),
            Joint::Revolute(_) => None,
        }
    }

    /// Get the number of joints in the world
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Install a fluid volume, replacing any previous one
    pub fn set_buoyancy(&mut self, controller: BuoyancyController) {
        self.buoyancy = Some(controller);
    }

    pub fn buoyancy(&self) -> Option<&BuoyancyController> {
        self.buoyancy.as_ref()
    }

    pub fn buoyancy_mut(&mut self) -> Option<&mut BuoyancyController> {
        self.buoyancy.as_mut()
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs:
    /// 1. Buoyancy forces on registered bodies
    /// 2. Velocity integration (gravity, forces, damping)
    /// 3. Joint velocity iterations
    /// 4. Position integration
    /// 5. Joint position iterations
    /// 6. Static plane contact resolution
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        // Phase 1: External forces
        if let Some(buoyancy) = &self.buoyancy {
            buoyancy.apply(&mut self.bodies, self.config.gravity);
        }

        // Phase 2: Integrate velocities
        let gravity = self.config.gravity;
        for body in self.bodies.values_mut() {
            if !body.is_dynamic() {
                continue;
            }
            let acceleration = gravity * body.gravity_scale + body.force() * body.inv_mass();
            body.linear_velocity += acceleration * dt;
            body.angular_velocity += body.torque() * body.inv_inertia() * dt;
            body.linear_velocity = body.linear_velocity * (1.0 / (1.0 + dt * body.linear_damping));
            body.angular_velocity *= 1.0 / (1.0 + dt * body.angular_damping);
        }

        // Phase 3: Joint velocity constraints
        for joint in self.joints.values_mut() {
            match joint {
                Joint::Mouse(j) => {
                    if let Some(body) = self.bodies.get_mut(j.body()) {
                        j.init_velocity(body, dt);
                    }
                }
                Joint::Revolute(j) => {
                    let (a, b) = j.bodies();
                    if let (Some(a), Some(b)) = (self.bodies.get(a), self.bodies.get(b)) {
                        j.init_velocity(a, b, dt);
                    }
                }
            }
        }
        for _ in 0..self.config.velocity_iterations {
            for joint in self.joints.values_mut() {
                match joint {
                    Joint::Mouse(j) => {
                        if let Some(body) = self.bodies.get_mut(j.body()) {
                            j.solve_velocity(body);
                        }
                    }
                    Joint::Revolute(j) => {
                        let (a, b) = j.bodies();
                        if let Some([a, b]) = self.bodies.get_disjoint_mut([a, b]) {
                            j.solve_velocity(a, b);
                        }
                    }
                }
            }
        }

        // Phase 4: Integrate positions
        for body in self.bodies.values_mut() {
            if body.is_static() {
                continue;
            }
            let center = body.world_center() + body.linear_velocity * dt;
            let angle = body.angle() + body.angular_velocity * dt;
            body.set_center_and_angle(center, angle);
        }

        // Phase 5: Joint position correction
        for _ in 0..self.config.position_iterations {
            let mut solved = true;
            for joint in self.joints.values() {
                if let Joint::Revolute(j) = joint {
                    let (a, b) = j.bodies();
                    if let Some([a, b]) = self.bodies.get_disjoint_mut([a, b]) {
                        solved &= j.solve_position(a, b);
                    }
                }
            }
            if solved {
                break;
            }
        }

        // Phase 6: Static plane contacts
        self.resolve_static_contacts();

        for body in self.bodies.values_mut() {
            body.clear_forces();
        }
    }

    /// Points of a body below each static plane it may touch
    fn plane_contacts(&self, body: &RigidBody2D) -> Vec<PlaneContact> {
        let mut contacts = Vec::new();
        let xf = body.transform();

        for fixture in body.fixtures() {
            for plane in &self.static_planes {
                if !fixture.filter.collides_with(&plane.filter) {
                    continue;
                }
                let Some(deepest) = shape_vs_plane(&fixture.shape, xf, &plane.plane) else {
                    continue;
                };
                let combined = fixture.material.combine(&plane.material);
                let mut push = |point: Vec2, penetration: f32| {
                    contacts.push(PlaneContact {
                        point,
                        normal: plane.plane.normal,
                        penetration,
                        friction: combined.friction,
                        restitution: combined.restitution,
                    });
                };

                match &fixture.shape {
                    Shape::Circle(_) => push(deepest.point, deepest.penetration),
                    Shape::Polygon(p) => {
                        // Every vertex below the plane is a contact point
                        for v in p.vertices() {
                            let point = xf.apply(*v);
                            let distance = plane.plane.signed_distance(point);
                            if distance < 0.0 {
                                push(point, -distance);
                            }
                        }
                    }
                }
            }
        }

        contacts
    }

    /// Resolve collisions between bodies and static planes
    fn resolve_static_contacts(&mut self) {
        if self.static_planes.is_empty() {
            return;
        }

        let keys: Vec<BodyKey> = self.bodies.keys().collect();
        for key in keys {
            let contacts = match self.bodies.get(key) {
                Some(body) if body.is_dynamic() => self.plane_contacts(body),
                _ => continue,
            };
            if contacts.is_empty() {
                continue;
            }
            let Some(body) = self.bodies.get_mut(key) else {
                continue;
            };

            for _ in 0..self.config.velocity_iterations.max(1) {
                for contact in &contacts {
                    Self::apply_contact_impulse(body, contact);
                }
            }

            // Push the body out along each plane by its deepest penetration
            let mut correction = Vec2::ZERO;
            for contact in &contacts {
                let needed = (contact.penetration - CONTACT_SLOP).max(0.0) * CONTACT_BAUMGARTE;
                let already = correction.dot(contact.normal);
                if needed > already {
                    correction += contact.normal * (needed - already);
                }
            }
            if correction != Vec2::ZERO {
                let center = body.world_center() + correction;
                let angle = body.angle();
                body.set_center_and_angle(center, angle);
            }
        }
    }

    fn apply_contact_impulse(body: &mut RigidBody2D, contact: &PlaneContact) {
        let n = contact.normal;
        let r = contact.point - body.world_center();
        let vn = body.velocity_at_point(contact.point).dot(n);
        if vn >= 0.0 {
            return;
        }

        let rn = r.cross(n);
        let k_normal = body.inv_mass() + body.inv_inertia() * rn * rn;
        if k_normal <= 0.0 {
            return;
        }
        let restitution = if -vn > RESTITUTION_THRESHOLD { contact.restitution } else { 0.0 };
        let jn = -(1.0 + restitution) * vn / k_normal;
        body.apply_linear_impulse(n * jn, contact.point);

        let t = n.perp();
        let vt = body.velocity_at_point(contact.point).dot(t);
        let rt = r.cross(t);
        let k_tangent = body.inv_mass() + body.inv_inertia() * rt * rt;
        if k_tangent > 0.0 {
            let max_friction = contact.friction * jn;
            let jt = (-vt / k_tangent).clamp(-max_friction, max_friction);
            body.apply_linear_impulse(t * jt, contact.point);
        }
    }

    /// Cast the segment `p1 -> p2` through every fixture in the world
    ///
    /// Each boundary crossing is reported in increasing fraction order. The
    /// callback may filter a crossing, stop the query, clip the ray or let it
    /// pass through. The world stays borrowed for the whole query, so bodies
    /// can only be changed once this returns.
    pub fn ray_cast<C: RayCastCallback + ?Sized>(&self, p1: Vec2, p2: Vec2, callback: &mut C) {
        if (p2 - p1).length_squared() < f32::EPSILON {
            return;
        }

        let bounds = Aabb::from_segment(p1, p2);
        let mut crossings = Vec::new();
        for (key, body) in &self.bodies {
            for (index, fixture) in body.fixtures().iter().enumerate() {
                if !fixture.shape.aabb(body.transform()).overlaps(&bounds) {
                    continue;
                }
                for crossing in fixture.shape.ray_crossings(body.transform(), p1, p2) {
                    crossings.push((FixtureRef { body: key, index }, body, crossing));
                }
            }
        }
        crossings.sort_by(|a, b| a.2.fraction.total_cmp(&b.2.fraction));

        let mut max_fraction = 1.0;
        let mut reported = 0usize;
        for (fixture, body, crossing) in crossings {
            if crossing.fraction > max_fraction {
                break;
            }
            let hit = RayHit {
                fixture,
                body,
                point: crossing.point,
                normal: crossing.normal,
                fraction: crossing.fraction,
            };
            reported += 1;
            match callback.report_fixture(&hit) {
                RayCastDirective::Filter | RayCastDirective::Continue => {}
                RayCastDirective::Stop => break,
                RayCastDirective::Clip(fraction) => max_fraction = fraction.min(max_fraction),
            }
        }

        log::trace!("Ray cast {:?} -> {:?} reported {} crossings", p1, p2, reported);
    }

    /// Report every fixture whose bounds overlap `aabb`
    ///
    /// Stops as soon as the callback returns false.
    pub fn query_aabb<C: QueryCallback + ?Sized>(&self, aabb: &Aabb, callback: &mut C) {
        for (key, body) in &self.bodies {
            for (index, fixture) in body.fixtures().iter().enumerate() {
                if !fixture.shape.aabb(body.transform()).overlaps(aabb) {
                    continue;
                }
                if !callback.report_fixture(FixtureRef { body: key, index }, body) {
                    return;
                }
            }
        }
    }

    /// First non-static body with a fixture containing `point`
    pub fn query_point(&self, point: Vec2) -> Option<BodyKey> {
        let aabb = Aabb::from_center_half_extents(point, Vec2::splat(POINT_QUERY_EXTENT));
        let mut query = PointQuery::new(point);
        self.query_aabb(&aabb, &mut query);
        query.found
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
