//! Screen <-> world coordinate conversion
//!
//! Touch locations arrive in screen pixels with the origin at the top-left
//! corner and y pointing down. The world uses metres with y pointing up.
//! Conversion goes through GL coordinates (pixels, origin bottom-left).

use demo2d_math::Vec2;
use serde::{Deserialize, Serialize};

/// Pixels per metre
pub const PTM_RATIO: f32 = 32.0;

/// Screen geometry used to map touches into the physics world
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenMapping {
    pub ptm_ratio: f32,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for ScreenMapping {
    fn default() -> Self {
        Self {
            ptm_ratio: PTM_RATIO,
            screen_width: 480.0,
            screen_height: 320.0,
        }
    }
}

impl ScreenMapping {
    pub fn new(screen_width: f32, screen_height: f32, ptm_ratio: f32) -> Self {
        Self {
            ptm_ratio,
            screen_width,
            screen_height,
        }
    }

    /// Flip a y-down screen location into GL space
    pub fn to_gl(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x, self.screen_height - screen.y)
    }

    /// Screen pixels to world metres
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        self.to_gl(screen) * (1.0 / self.ptm_ratio)
    }

    /// World metres to screen pixels
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        let gl = world * self.ptm_ratio;
        Vec2::new(gl.x, self.screen_height - gl.y)
    }

    /// Pixels to metres for a length
    pub fn to_metres(&self, pixels: f32) -> f32 {
        pixels / self.ptm_ratio
    }

    /// Size of the visible world in metres
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height) * (1.0 / self.ptm_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_left_maps_to_world_top() {
        let mapping = ScreenMapping::default();
        assert_eq!(mapping.to_world(Vec2::ZERO), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_bottom_left_is_world_origin() {
        let mapping = ScreenMapping::default();
        assert_eq!(mapping.to_world(Vec2::new(0.0, 320.0)), Vec2::ZERO);
    }

    #[test]
    fn test_round_trip() {
        let mapping = ScreenMapping::new(1024.0, 768.0, 32.0);
        let screen = Vec2::new(100.0, 700.0);
        let back = mapping.to_screen(mapping.to_world(screen));
        assert!((back - screen).length() < 1e-3);
    }

    #[test]
    fn test_world_size() {
        let mapping = ScreenMapping::default();
        assert_eq!(mapping.world_size(), Vec2::new(15.0, 10.0));
        assert_eq!(mapping.to_metres(64.0), 2.0);
    }
}
