//! Ragdolls made of boxes and a circle held together by limited pins
//!
//! Limb sizes and joint positions are laid out in screen pixels relative to
//! the top of the head, then converted to world metres.

use crate::coords::ScreenMapping;
use crate::scene::{DemoScene, SceneBase};
use demo2d_math::Vec2;
use demo2d_physics::{
    BodyKey, CollisionFilter, Fixture, PhysicsConfig, PhysicsMaterial, PhysicsWorld,
    RevoluteJointDef, RigidBody2D, Shape,
};

/// Bodies in one ragdoll
pub const RAGDOLL_BODY_COUNT: usize = 12;
/// Joints in one ragdoll
pub const RAGDOLL_JOINT_COUNT: usize = 11;

/// Limb keys of one ragdoll
#[derive(Clone, Copy, Debug)]
pub struct Ragdoll {
    pub head: BodyKey,
    pub torso: [BodyKey; 3],
    pub upper_arms: [BodyKey; 2],
    pub lower_arms: [BodyKey; 2],
    pub upper_legs: [BodyKey; 2],
    pub lower_legs: [BodyKey; 2],
}

impl Ragdoll {
    /// Every limb, head first
    pub fn bodies(&self) -> [BodyKey; RAGDOLL_BODY_COUNT] {
        [
            self.head,
            self.torso[0],
            self.torso[1],
            self.torso[2],
            self.upper_arms[0],
            self.upper_arms[1],
            self.lower_arms[0],
            self.lower_arms[1],
            self.upper_legs[0],
            self.upper_legs[1],
            self.lower_legs[0],
            self.lower_legs[1],
        ]
    }
}

/// Screen-space layout helper: pixel offsets from the head position
struct Builder<'a> {
    world: &'a mut PhysicsWorld,
    mapping: ScreenMapping,
    origin: Vec2,
}

impl Builder<'_> {
    fn point(&self, dx: f32, dy: f32) -> Vec2 {
        self.mapping.to_world(self.origin + Vec2::new(dx, dy))
    }

    fn body(&mut self, shape: Shape, dx: f32, dy: f32) -> BodyKey {
        let fixture =
            Fixture::new(shape, PhysicsMaterial::FLESH).with_filter(CollisionFilter::ragdoll());
        let body = RigidBody2D::dynamic(self.point(dx, dy)).with_fixture_def(fixture);
        self.world.add_body(body)
    }

    fn limb(&mut self, half_w: f32, half_h: f32, dx: f32, dy: f32) -> BodyKey {
        let shape = Shape::rect(self.mapping.to_metres(half_w), self.mapping.to_metres(half_h));
        self.body(shape, dx, dy)
    }

    /// Pin two limbs; limits are in degrees as seen on screen
    fn pin(&mut self, a: BodyKey, b: BodyKey, dx: f32, dy: f32, lower: f32, upper: f32) {
        // The y flip mirrors rotations, so screen limits swap and negate
        let def = RevoluteJointDef::new(a, b, self.point(dx, dy))
            .with_limits(-upper.to_radians(), -lower.to_radians());
        if self.world.create_revolute_joint(def).is_none() {
            log::warn!("Failed to pin ragdoll limbs");
        }
    }
}

/// Build one ragdoll whose head is at `head` (screen pixels)
pub fn spawn_ragdoll(world: &mut PhysicsWorld, mapping: ScreenMapping, head: Vec2) -> Ragdoll {
    let mut b = Builder {
        world,
        mapping,
        origin: head,
    };

    let head = b.body(Shape::circle(mapping.to_metres(12.5)), 0.0, 0.0);
    let torso = [
        b.limb(15.0, 10.0, 0.0, 25.0),
        b.limb(15.0, 10.0, 0.0, 43.0),
        b.limb(15.0, 10.0, 0.0, 58.0),
    ];
    let upper_arms = [b.limb(18.0, 6.5, -30.0, 20.0), b.limb(18.0, 6.5, 30.0, 20.0)];
    let lower_arms = [b.limb(17.0, 6.0, -57.0, 20.0), b.limb(17.0, 6.0, 57.0, 20.0)];
    let upper_legs = [b.limb(7.5, 22.0, -8.0, 85.0), b.limb(7.5, 22.0, 8.0, 85.0)];
    let lower_legs = [b.limb(6.0, 20.0, -8.0, 120.0), b.limb(6.0, 20.0, 8.0, 120.0)];

    // Head to shoulders
    b.pin(torso[0], head, 0.0, 15.0, -40.0, 40.0);
    // Upper arms to shoulders
    b.pin(torso[0], upper_arms[0], -18.0, 20.0, -85.0, 130.0);
    b.pin(torso[0], upper_arms[1], 18.0, 20.0, -130.0, 85.0);
    // Lower arms to upper arms
    b.pin(upper_arms[0], lower_arms[0], -45.0, 20.0, -130.0, 10.0);
    b.pin(upper_arms[1], lower_arms[1], 45.0, 20.0, -10.0, 130.0);
    // Shoulders to stomach to hips
    b.pin(torso[0], torso[1], 0.0, 35.0, -15.0, 15.0);
    b.pin(torso[1], torso[2], 0.0, 50.0, -15.0, 15.0);
    // Hips to upper legs
    b.pin(torso[2], upper_legs[0], -8.0, 72.0, -25.0, 45.0);
    b.pin(torso[2], upper_legs[1], 8.0, 72.0, -45.0, 25.0);
    // Upper legs to lower legs
    b.pin(upper_legs[0], lower_legs[0], -8.0, 105.0, -25.0, 115.0);
    b.pin(upper_legs[1], lower_legs[1], 8.0, 105.0, -115.0, 25.0);

    Ragdoll {
        head,
        torso,
        upper_arms,
        lower_arms,
        upper_legs,
        lower_legs,
    }
}

pub struct RagdollScene {
    base: SceneBase,
    ragdolls: Vec<Ragdoll>,
}

impl RagdollScene {
    pub fn new(mapping: ScreenMapping, physics: PhysicsConfig, count: usize) -> Self {
        let mut base = SceneBase::new(mapping, physics);
        let ragdolls = (0..count)
            .map(|i| {
                let x = mapping.screen_width * (i as f32 + 1.0) / (count as f32 + 1.0);
                let y = 20.0 + 30.0 * (i % 2) as f32;
                spawn_ragdoll(base.world_mut(), mapping, Vec2::new(x, y))
            })
            .collect();

        log::info!("Built ragdoll scene with {} ragdolls", count);
        Self { base, ragdolls }
    }

    pub fn ragdolls(&self) -> &[Ragdoll] {
        &self.ragdolls
    }
}

impl DemoScene for RagdollScene {
    fn name(&self) -> &str {
        "Ragdoll"
    }

    fn base(&self) -> &SceneBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SceneBase {
        &mut self.base
    }
}
