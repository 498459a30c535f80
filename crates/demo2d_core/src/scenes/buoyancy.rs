//! Floating boxes and balls
//!
//! Water fills the lower half of the screen. Bodies dropped from above sink,
//! bob up and settle on the surface; touches drag them around.

use crate::coords::ScreenMapping;
use crate::scene::{DemoScene, SceneBase};
use demo2d_math::Vec2;
use demo2d_physics::{BuoyancyController, PhysicsConfig, PhysicsMaterial, RigidBody2D, Shape};

/// Number of floating bodies
pub const FLOATING_BODY_COUNT: usize = 8;

pub struct BuoyancyScene {
    base: SceneBase,
}

impl BuoyancyScene {
    pub fn new(mapping: ScreenMapping, physics: PhysicsConfig) -> Self {
        let mut base = SceneBase::new(mapping, physics);
        let size = mapping.world_size();

        let mut water = BuoyancyController::new(Vec2::Y, size.y * 0.5);
        water.density = 2.0;
        water.linear_drag = 5.0;
        water.angular_drag = 2.0;

        let world = base.world_mut();
        for i in 0..FLOATING_BODY_COUNT {
            let x = size.x * (i as f32 + 1.0) / (FLOATING_BODY_COUNT as f32 + 1.0);
            let y = size.y * (0.6 + 0.1 * (i % 3) as f32);
            let extent = 0.3 + 0.1 * (i % 4) as f32;

            let shape = if i % 2 == 0 {
                Shape::rect(extent, extent * 0.75)
            } else {
                Shape::circle(extent)
            };
            let body = RigidBody2D::dynamic(Vec2::new(x, y))
                .with_fixture(shape, PhysicsMaterial::WOOD)
                .with_angle(0.3 * i as f32);
            water.add_body(world.add_body(body));
        }
        world.set_buoyancy(water);

        log::info!("Built buoyancy scene with {} floating bodies", FLOATING_BODY_COUNT);
        Self { base }
    }
}

impl DemoScene for BuoyancyScene {
    fn name(&self) -> &str {
        "Buoyancy"
    }

    fn base(&self) -> &SceneBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SceneBase {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_contents() {
        let scene = BuoyancyScene::new(ScreenMapping::default(), PhysicsConfig::default());
        // Floating bodies plus the ground
        assert_eq!(scene.world().body_count(), FLOATING_BODY_COUNT + 1);
        let water = scene.world().buoyancy().unwrap();
        assert_eq!(water.bodies().len(), FLOATING_BODY_COUNT);
        assert_eq!(water.offset, 5.0);
    }

    #[test]
    fn test_bodies_float_near_surface() {
        let mut scene = BuoyancyScene::new(ScreenMapping::default(), PhysicsConfig::default());
        for _ in 0..600 {
            scene.update(1.0 / 60.0);
        }

        let surface = scene.world().buoyancy().unwrap().offset;
        let keys: Vec<_> = scene.world().buoyancy().unwrap().bodies().to_vec();
        for key in keys {
            let y = scene.world().get_body(key).unwrap().world_center().y;
            assert!((y - surface).abs() < 1.5, "body at y = {}", y);
        }
    }
}
