//! Joints connecting bodies to targets or to each other
//!
//! Two joint kinds are supported:
//! - [`MouseJoint`]: a soft spring dragging one body point toward a target
//! - [`RevoluteJoint`]: a pin shared by two bodies, with optional angle limits
//!
//! Joints are solved with sequential impulses. Accumulated impulses are reset
//! at the start of every step (no warm starting).

use crate::body::{BodyKey, RigidBody2D};
use demo2d_math::Vec2;
use slotmap::new_key_type;
use std::f32::consts::PI;

new_key_type! {
    /// Key to a joint in the physics world
    pub struct JointKey;
}

/// Default spring frequency of a mouse joint (Hz)
pub const DEFAULT_MOUSE_FREQUENCY: f32 = 5.0;
/// Default damping ratio of a mouse joint
pub const DEFAULT_MOUSE_DAMPING: f32 = 0.7;

/// Position error tolerated before a revolute joint stops correcting (m)
const LINEAR_SLOP: f32 = 0.005;
/// Angular error tolerated by joint limits (rad)
const ANGULAR_SLOP: f32 = 2.0 / 180.0 * PI;
/// Largest angular correction applied in one position iteration (rad)
const MAX_ANGULAR_CORRECTION: f32 = 8.0 / 180.0 * PI;

/// Solve the 2x2 system `k * x = b`
fn solve22(k: [[f32; 2]; 2], b: Vec2) -> Vec2 {
    let det = k[0][0] * k[1][1] - k[0][1] * k[1][0];
    if det.abs() < f32::EPSILON {
        return Vec2::ZERO;
    }
    let inv = 1.0 / det;
    Vec2::new(
        inv * (k[1][1] * b.x - k[0][1] * b.y),
        inv * (k[0][0] * b.y - k[1][0] * b.x),
    )
}

/// Effective mass matrix of a point constraint between two bodies
fn point_mass_matrix(a: &RigidBody2D, b: &RigidBody2D, ra: Vec2, rb: Vec2) -> [[f32; 2]; 2] {
    let (ma, mb) = (a.inv_mass(), b.inv_mass());
    let (ia, ib) = (a.inv_inertia(), b.inv_inertia());
    let k00 = ma + mb + ra.y * ra.y * ia + rb.y * rb.y * ib;
    let k01 = -ra.y * ra.x * ia - rb.y * rb.x * ib;
    let k11 = ma + mb + ra.x * ra.x * ia + rb.x * rb.x * ib;
    [[k00, k01], [k01, k11]]
}

/// Offset of a body-local anchor from the center of mass, in world space
fn anchor_arm(body: &RigidBody2D, local_anchor: Vec2) -> Vec2 {
    body.transform().apply_direction(local_anchor - body.local_center())
}

/// Soft constraint pulling a point of a body toward a world target
#[derive(Clone, Debug)]
pub struct MouseJoint {
    body: BodyKey,
    /// Grabbed point in body-local coordinates
    local_anchor: Vec2,
    target: Vec2,
    /// Largest force the joint may apply (N)
    pub max_force: f32,
    pub frequency_hz: f32,
    pub damping_ratio: f32,

    // Per-step solver state
    impulse: Vec2,
    gamma: f32,
    bias: Vec2,
    mass: [[f32; 2]; 2],
    arm: Vec2,
    max_impulse: f32,
}

impl MouseJoint {
    /// Grab `body` at the world point `target`
    pub fn new(key: BodyKey, body: &RigidBody2D, target: Vec2, max_force: f32) -> Self {
        Self {
            body: key,
            local_anchor: body.local_point(target),
            target,
            max_force,
            frequency_hz: DEFAULT_MOUSE_FREQUENCY,
            damping_ratio: DEFAULT_MOUSE_DAMPING,
            impulse: Vec2::ZERO,
            gamma: 0.0,
            bias: Vec2::ZERO,
            mass: [[0.0; 2]; 2],
            arm: Vec2::ZERO,
            max_impulse: 0.0,
        }
    }

    /// The dragged body
    pub fn body(&self) -> BodyKey {
        self.body
    }

    /// Current world target
    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Move the world target
    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Grabbed point in body-local coordinates
    pub fn local_anchor(&self) -> Vec2 {
        self.local_anchor
    }

    pub(crate) fn init_velocity(&mut self, body: &mut RigidBody2D, dt: f32) {
        let mass = body.mass();
        let omega = 2.0 * PI * self.frequency_hz;
        let d = 2.0 * mass * self.damping_ratio * omega;
        let k = mass * omega * omega;

        let gamma = dt * (d + dt * k);
        self.gamma = if gamma != 0.0 { 1.0 / gamma } else { 0.0 };
        let beta = dt * k * self.gamma;

        self.arm = anchor_arm(body, self.local_anchor);
        let r = self.arm;
        let (m, i) = (body.inv_mass(), body.inv_inertia());
        let k00 = m + i * r.y * r.y + self.gamma;
        let k01 = -i * r.x * r.y;
        let k11 = m + i * r.x * r.x + self.gamma;
        self.mass = invert22([[k00, k01], [k01, k11]]);

        self.bias = (body.world_center() + r - self.target) * beta;
        self.impulse = Vec2::ZERO;
        self.max_impulse = dt * self.max_force;

        // Keep the grabbed body from spinning forever
        body.angular_velocity *= 0.98;
    }

    pub(crate) fn solve_velocity(&mut self, body: &mut RigidBody2D) {
        let r = self.arm;
        let cdot = body.linear_velocity + Vec2::scalar_cross(body.angular_velocity, r);
        let rhs = -(cdot + self.bias + self.impulse * self.gamma);
        let mut impulse = Vec2::new(
            self.mass[0][0] * rhs.x + self.mass[0][1] * rhs.y,
            self.mass[1][0] * rhs.x + self.mass[1][1] * rhs.y,
        );

        let old = self.impulse;
        self.impulse += impulse;
        if self.impulse.length_squared() > self.max_impulse * self.max_impulse {
            self.impulse = self.impulse.normalized() * self.max_impulse;
        }
        impulse = self.impulse - old;

        body.linear_velocity += impulse * body.inv_mass();
        body.angular_velocity += body.inv_inertia() * r.cross(impulse);
    }
}

fn invert22(k: [[f32; 2]; 2]) -> [[f32; 2]; 2] {
    let det = k[0][0] * k[1][1] - k[0][1] * k[1][0];
    if det.abs() < f32::EPSILON {
        return [[0.0; 2]; 2];
    }
    let inv = 1.0 / det;
    [[inv * k[1][1], -inv * k[0][1]], [-inv * k[1][0], inv * k[0][0]]]
}

/// Parameters for creating a revolute joint
#[derive(Clone, Copy, Debug)]
pub struct RevoluteJointDef {
    pub body_a: BodyKey,
    pub body_b: BodyKey,
    /// Shared pivot in world coordinates
    pub anchor: Vec2,
    /// Allowed range of `angle_b - angle_a` relative to the initial pose
    pub limits: Option<(f32, f32)>,
}

impl RevoluteJointDef {
    /// Pin two bodies at a world point
    pub fn new(body_a: BodyKey, body_b: BodyKey, anchor: Vec2) -> Self {
        Self {
            body_a,
            body_b,
            anchor,
            limits: None,
        }
    }

    /// Restrict the relative angle to `[lower, upper]`
    pub fn with_limits(mut self, lower: f32, upper: f32) -> Self {
        self.limits = Some((lower.min(upper), lower.max(upper)));
        self
    }
}

/// Pin joint between two bodies
#[derive(Clone, Debug)]
pub struct RevoluteJoint {
    body_a: BodyKey,
    body_b: BodyKey,
    local_anchor_a: Vec2,
    local_anchor_b: Vec2,
    reference_angle: f32,
    limits: Option<(f32, f32)>,

    arm_a: Vec2,
    arm_b: Vec2,
    lower_impulse: f32,
    upper_impulse: f32,
    inv_dt: f32,
}

impl RevoluteJoint {
    /// Build the joint from its definition and the current body poses
    pub fn new(def: &RevoluteJointDef, a: &RigidBody2D, b: &RigidBody2D) -> Self {
        Self {
            body_a: def.body_a,
            body_b: def.body_b,
            local_anchor_a: a.local_point(def.anchor),
            local_anchor_b: b.local_point(def.anchor),
            reference_angle: b.angle() - a.angle(),
            limits: def.limits,
            arm_a: Vec2::ZERO,
            arm_b: Vec2::ZERO,
            lower_impulse: 0.0,
            upper_impulse: 0.0,
            inv_dt: 0.0,
        }
    }

    /// The two connected bodies
    pub fn bodies(&self) -> (BodyKey, BodyKey) {
        (self.body_a, self.body_b)
    }

    /// Angle limits, if any
    pub fn limits(&self) -> Option<(f32, f32)> {
        self.limits
    }

    /// Relative angle of body B with respect to body A
    pub fn joint_angle(&self, a: &RigidBody2D, b: &RigidBody2D) -> f32 {
        b.angle() - a.angle() - self.reference_angle
    }

    /// World positions of the pivot as seen by each body
    pub fn world_anchors(&self, a: &RigidBody2D, b: &RigidBody2D) -> (Vec2, Vec2) {
        (a.world_point(self.local_anchor_a), b.world_point(self.local_anchor_b))
    }

    pub(crate) fn init_velocity(&mut self, a: &RigidBody2D, b: &RigidBody2D, dt: f32) {
        self.arm_a = anchor_arm(a, self.local_anchor_a);
        self.arm_b = anchor_arm(b, self.local_anchor_b);
        self.lower_impulse = 0.0;
        self.upper_impulse = 0.0;
        self.inv_dt = if dt > 0.0 { 1.0 / dt } else { 0.0 };
    }

    pub(crate) fn solve_velocity(&mut self, a: &mut RigidBody2D, b: &mut RigidBody2D) {
        let (ia, ib) = (a.inv_inertia(), b.inv_inertia());

        if let Some((lower, upper)) = self.limits {
            let axial = ia + ib;
            if axial > 0.0 {
                let axial_mass = 1.0 / axial;
                let angle = self.joint_angle(a, b);

                // Lower limit, speculative when not yet reached
                let c = angle - lower;
                let bias = if c > 0.0 { c * self.inv_dt } else { 0.0 };
                let cdot = b.angular_velocity - a.angular_velocity;
                let impulse = -axial_mass * (cdot + bias);
                let accumulated = (self.lower_impulse + impulse).max(0.0);
                let impulse = accumulated - self.lower_impulse;
                self.lower_impulse = accumulated;
                a.angular_velocity -= ia * impulse;
                b.angular_velocity += ib * impulse;

                // Upper limit
                let c = upper - angle;
                let bias = if c > 0.0 { c * self.inv_dt } else { 0.0 };
                let cdot = a.angular_velocity - b.angular_velocity;
                let impulse = -axial_mass * (cdot + bias);
                let accumulated = (self.upper_impulse + impulse).max(0.0);
                let impulse = accumulated - self.upper_impulse;
                self.upper_impulse = accumulated;
                a.angular_velocity += ia * impulse;
                b.angular_velocity -= ib * impulse;
            }
        }

        let (ra, rb) = (self.arm_a, self.arm_b);
        let cdot = b.linear_velocity + Vec2::scalar_cross(b.angular_velocity, rb)
            - a.linear_velocity
            - Vec2::scalar_cross(a.angular_velocity, ra);
        let impulse = solve22(point_mass_matrix(a, b, ra, rb), -cdot);

        a.linear_velocity -= impulse * a.inv_mass();
        a.angular_velocity -= ia * ra.cross(impulse);
        b.linear_velocity += impulse * b.inv_mass();
        b.angular_velocity += ib * rb.cross(impulse);
    }

    /// Push the bodies back onto the pivot; returns true once within tolerance
    pub(crate) fn solve_position(&self, a: &mut RigidBody2D, b: &mut RigidBody2D) -> bool {
        let (ia, ib) = (a.inv_inertia(), b.inv_inertia());
        let mut angular_error = 0.0;

        if let Some((lower, upper)) = self.limits {
            if ia + ib > 0.0 {
                let angle = self.joint_angle(a, b);
                let c = if (upper - lower).abs() < 2.0 * ANGULAR_SLOP {
                    (angle - lower).clamp(-MAX_ANGULAR_CORRECTION, MAX_ANGULAR_CORRECTION)
                } else if angle <= lower {
                    (angle - lower + ANGULAR_SLOP).clamp(-MAX_ANGULAR_CORRECTION, 0.0)
                } else if angle >= upper {
                    (angle - upper - ANGULAR_SLOP).clamp(0.0, MAX_ANGULAR_CORRECTION)
                } else {
                    0.0
                };

                let impulse = -c / (ia + ib);
                let new_a = a.angle() - ia * impulse;
                let new_b = b.angle() + ib * impulse;
                a.set_center_and_angle(a.world_center(), new_a);
                b.set_center_and_angle(b.world_center(), new_b);
                angular_error = c.abs();
            }
        }

        let ra = anchor_arm(a, self.local_anchor_a);
        let rb = anchor_arm(b, self.local_anchor_b);
        let c = b.world_center() + rb - a.world_center() - ra;
        let position_error = c.length();

        let impulse = -solve22(point_mass_matrix(a, b, ra, rb), c);
        let center_a = a.world_center() - impulse * a.inv_mass();
        let angle_a = a.angle() - ia * ra.cross(impulse);
        let center_b = b.world_center() + impulse * b.inv_mass();
        let angle_b = b.angle() + ib * rb.cross(impulse);
        if a.is_dynamic() {
            a.set_center_and_angle(center_a, angle_a);
        }
        if b.is_dynamic() {
            b.set_center_and_angle(center_b, angle_b);
        }

        position_error <= LINEAR_SLOP && angular_error <= ANGULAR_SLOP
    }
}

/// A joint stored in the physics world
#[derive(Clone, Debug)]
pub enum Joint {
    Mouse(MouseJoint),
    Revolute(RevoluteJoint),
}

impl Joint {
    /// True if the joint is attached to `body`
    pub fn involves(&self, body: BodyKey) -> bool {
        match self {
            Joint::Mouse(j) => j.body == body,
            Joint::Revolute(j) => j.body_a == body || j.body_b == body,
        }
    }

    /// Mouse joint view, if this is one
    pub fn as_mouse(&self) -> Option<&MouseJoint> {
        match self {
            Joint::Mouse(j) => Some(j),
            Joint::Revolute(_) => None,
        }
    }

    /// Revolute joint view, if this is one
    pub fn as_revolute(&self) -> Option<&RevoluteJoint> {
        match self {
            Joint::Revolute(j) => Some(j),
            Joint::Mouse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve22() {
        let k = [[2.0, 1.0], [1.0, 3.0]];
        let x = solve22(k, Vec2::new(3.0, 4.0));
        assert!((x.x - 1.0).abs() < 1e-5);
        assert!((x.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_solve22_singular_is_zero() {
        let k = [[1.0, 1.0], [1.0, 1.0]];
        assert_eq!(solve22(k, Vec2::new(1.0, 2.0)), Vec2::ZERO);
    }

    #[test]
    fn test_invert22() {
        let inv = invert22([[4.0, 0.0], [0.0, 2.0]]);
        assert!((inv[0][0] - 0.25).abs() < 1e-6);
        assert!((inv[1][1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_revolute_def_orders_limits() {
        let mut keys = slotmap::SlotMap::<BodyKey, ()>::with_key();
        let a = keys.insert(());
        let b = keys.insert(());
        let def = RevoluteJointDef::new(a, b, Vec2::ZERO).with_limits(0.5, -0.5);
        assert_eq!(def.limits, Some((-0.5, 0.5)));
    }
}
