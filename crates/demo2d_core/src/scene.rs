//! Shared scene behaviour
//!
//! Every demo owns a [`SceneBase`]: a physics world bounded by the screen
//! edges, plus the touch joints that let fingers drag bodies around.

use crate::coords::ScreenMapping;
use crate::touch::{TouchEvent, TouchJointList, TouchPhase};
use demo2d_math::{Polygon, Vec2};
use demo2d_physics::{
    BodyKey, CollisionFilter, Fixture, JointKey, PhysicsConfig, PhysicsMaterial, PhysicsWorld,
    RigidBody2D, Shape, StaticPlane, FILTERED_TAG,
};

/// Mouse joint strength per unit of body mass
pub const MOUSE_FORCE_PER_MASS: f32 = 1000.0;

/// Thickness of the edge fixtures on the ground body (m)
const EDGE_THICKNESS: f32 = 0.1;

/// A runnable demo scene
pub trait DemoScene {
    /// Display name
    fn name(&self) -> &str;

    fn base(&self) -> &SceneBase;

    fn base_mut(&mut self) -> &mut SceneBase;

    fn world(&self) -> &PhysicsWorld {
        self.base().world()
    }

    fn world_mut(&mut self) -> &mut PhysicsWorld {
        self.base_mut().world_mut()
    }

    /// React to a touch; by default touches drag bodies
    fn on_touch(&mut self, event: &TouchEvent) {
        self.base_mut().handle_touch(event);
    }

    /// Advance the simulation
    fn update(&mut self, dt: f32) {
        self.base_mut().step(dt);
    }
}

/// World, screen bounds and touch dragging shared by all scenes
pub struct SceneBase {
    world: PhysicsWorld,
    mapping: ScreenMapping,
    ground: BodyKey,
    touch_joints: TouchJointList,
}

impl SceneBase {
    /// Create a world whose bounds follow the screen edges
    ///
    /// The bounds are both static planes (for contacts) and fixtures of a
    /// static ground body tagged [`FILTERED_TAG`], so ray casts ignore them.
    pub fn new(mapping: ScreenMapping, physics: PhysicsConfig) -> Self {
        let mut world = PhysicsWorld::with_config(physics);
        let size = mapping.world_size();

        world.add_static_plane(StaticPlane::new(Vec2::Y, 0.0, PhysicsMaterial::GROUND));
        world.add_static_plane(StaticPlane::new(-Vec2::Y, -size.y, PhysicsMaterial::GROUND));
        world.add_static_plane(StaticPlane::new(Vec2::X, 0.0, PhysicsMaterial::GROUND));
        world.add_static_plane(StaticPlane::new(-Vec2::X, -size.x, PhysicsMaterial::GROUND));

        let half = EDGE_THICKNESS * 0.5;
        let edges = [
            (size.x * 0.5, half, Vec2::new(size.x * 0.5, -half)),
            (size.x * 0.5, half, Vec2::new(size.x * 0.5, size.y + half)),
            (half, size.y * 0.5, Vec2::new(-half, size.y * 0.5)),
            (half, size.y * 0.5, Vec2::new(size.x + half, size.y * 0.5)),
        ];
        let mut ground = RigidBody2D::fixed(Vec2::ZERO).with_user_tag(FILTERED_TAG);
        for (hw, hh, center) in edges {
            let edge = Shape::Polygon(Polygon::oriented_rect(hw, hh, center, 0.0));
            ground.add_fixture(
                Fixture::new(edge, PhysicsMaterial::GROUND)
                    .with_filter(CollisionFilter::static_world()),
            );
        }
        let ground = world.add_body(ground);

        Self {
            world,
            mapping,
            ground,
            touch_joints: TouchJointList::new(),
        }
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn mapping(&self) -> &ScreenMapping {
        &self.mapping
    }

    /// Static body holding the screen edges
    pub fn ground(&self) -> BodyKey {
        self.ground
    }

    pub fn touch_joints(&self) -> &TouchJointList {
        &self.touch_joints
    }

    /// Drag bodies with touches
    ///
    /// Began grabs the body under the finger with a mouse joint, Moved
    /// retargets it, Ended and Cancelled release it.
    pub fn handle_touch(&mut self, event: &TouchEvent) {
        let location = self.mapping.to_world(event.location);
        match event.phase {
            TouchPhase::Began => {
                self.grab(event.id, location);
            }
            TouchPhase::Moved => {
                if let Some(key) = self.touch_joints.get(event.id) {
                    if let Some(joint) = self.world.mouse_joint_mut(key) {
                        joint.set_target(location);
                    }
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.release(event.id);
            }
        }
    }

    /// Attach a mouse joint to the body under `location`
    pub fn grab(&mut self, touch_id: u64, location: Vec2) -> Option<JointKey> {
        let body = self.world.query_point(location)?;
        let mass = self.world.get_body(body)?.mass();
        let joint = self
            .world
            .create_mouse_joint(body, location, MOUSE_FORCE_PER_MASS * mass)?;

        if let Some(stale) = self.touch_joints.insert(touch_id, joint) {
            self.world.destroy_joint(stale);
        }
        if let Some(body) = self.world.get_body_mut(body) {
            body.angular_velocity = 0.0;
        }
        log::debug!("Touch {} grabbed a body at {:?}", touch_id, location);
        Some(joint)
    }

    /// Destroy the joint dragged by a touch
    pub fn release(&mut self, touch_id: u64) -> bool {
        match self.touch_joints.remove(touch_id) {
            Some(joint) => {
                // The joint is already gone if its body was destroyed
                let existed = self.world.destroy_joint(joint);
                log::debug!("Touch {} released its joint", touch_id);
                existed
            }
            None => false,
        }
    }

    /// Drop every touch joint
    pub fn release_all(&mut self) {
        for joint in self.touch_joints.drain() {
            self.world.destroy_joint(joint);
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.world.step(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_with_box() -> (SceneBase, BodyKey) {
        let mut base = SceneBase::new(ScreenMapping::default(), PhysicsConfig::new(Vec2::ZERO));
        let body = base.world_mut().add_body(
            RigidBody2D::dynamic(Vec2::new(5.0, 5.0))
                .with_fixture(Shape::rect(1.0, 1.0), PhysicsMaterial::WOOD),
        );
        (base, body)
    }

    #[test]
    fn test_bounds_are_filtered_ground() {
        let base = SceneBase::new(ScreenMapping::default(), PhysicsConfig::default());
        assert_eq!(base.world().static_planes().len(), 4);
        let ground = base.world().get_body(base.ground()).unwrap();
        assert!(ground.is_static());
        assert_eq!(ground.user_tag(), Some(FILTERED_TAG));
        assert_eq!(ground.fixtures().len(), 4);
    }

    #[test]
    fn test_touch_began_on_body_creates_joint() {
        let (mut base, body) = base_with_box();
        // (5, 5) metres is (160, 160) pixels on a 320 pixel high screen
        base.handle_touch(&TouchEvent::began(1, Vec2::new(160.0, 160.0)));

        assert_eq!(base.touch_joints().len(), 1);
        let key = base.touch_joints().get(1).unwrap();
        let joint = base.world().get_joint(key).and_then(|j| j.as_mouse()).unwrap();
        assert_eq!(joint.body(), body);
        let mass = base.world().get_body(body).unwrap().mass();
        assert_eq!(joint.max_force, MOUSE_FORCE_PER_MASS * mass);
    }

    #[test]
    fn test_touch_began_on_empty_space_does_nothing() {
        let (mut base, _) = base_with_box();
        base.handle_touch(&TouchEvent::began(1, Vec2::new(10.0, 10.0)));
        assert!(base.touch_joints().is_empty());
        assert_eq!(base.world().joint_count(), 0);
    }

    #[test]
    fn test_touch_moved_retargets_and_ended_releases() {
        let (mut base, _) = base_with_box();
        base.handle_touch(&TouchEvent::began(1, Vec2::new(160.0, 160.0)));
        base.handle_touch(&TouchEvent::moved(1, Vec2::new(320.0, 160.0)));

        let key = base.touch_joints().get(1).unwrap();
        let target = base.world().get_joint(key).and_then(|j| j.as_mouse()).unwrap().target();
        assert_eq!(target, Vec2::new(10.0, 5.0));

        base.handle_touch(&TouchEvent::ended(1, Vec2::new(320.0, 160.0)));
        assert!(base.touch_joints().is_empty());
        assert_eq!(base.world().joint_count(), 0);
    }

    #[test]
    fn test_multi_touch_drags_independently() {
        let (mut base, _) = base_with_box();
        base.world_mut().add_body(
            RigidBody2D::dynamic(Vec2::new(10.0, 5.0))
                .with_fixture(Shape::circle(1.0), PhysicsMaterial::WOOD),
        );
        base.handle_touch(&TouchEvent::began(1, Vec2::new(160.0, 160.0)));
        base.handle_touch(&TouchEvent::began(2, Vec2::new(320.0, 160.0)));
        assert_eq!(base.world().joint_count(), 2);

        base.handle_touch(&TouchEvent::cancelled(1, Vec2::ZERO));
        assert_eq!(base.world().joint_count(), 1);
        assert!(base.touch_joints().get(2).is_some());
    }

    #[test]
    fn test_release_after_body_removed() {
        let (mut base, body) = base_with_box();
        base.handle_touch(&TouchEvent::began(1, Vec2::new(160.0, 160.0)));
        base.world_mut().remove_body(body);

        assert!(!base.release(1));
        assert!(base.touch_joints().is_empty());
    }
}
