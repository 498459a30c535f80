//! Switching between demo scenes
//!
//! The SceneManager keeps the demos in a fixed order and builds a fresh
//! scene whenever the user moves to the next or previous one. Moving past
//! either end wraps around.

use crate::coords::ScreenMapping;
use crate::layout::SceneLayout;
use crate::scene::DemoScene;
use crate::scenes::{BuoyancyScene, RagdollScene, SliceScene};
use demo2d_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The available demos, in presentation order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneKind {
    Buoyancy,
    Ragdoll,
    Slice,
}

impl SceneKind {
    /// Every demo in presentation order
    pub const ALL: [SceneKind; 3] = [SceneKind::Buoyancy, SceneKind::Ragdoll, SceneKind::Slice];

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Buoyancy => "buoyancy",
            SceneKind::Ragdoll => "ragdoll",
            SceneKind::Slice => "slice",
        }
    }
}

impl FromStr for SceneKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SceneError::UnknownScene(s.to_string()))
    }
}

/// Error from scene management
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// No demo has this name
    UnknownScene(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownScene(name) => write!(f, "Unknown scene: {}", name),
        }
    }
}

impl std::error::Error for SceneError {}

/// Everything needed to build a scene
#[derive(Clone, Debug)]
pub struct SceneSettings {
    pub mapping: ScreenMapping,
    pub physics: PhysicsConfig,
    pub ragdoll_count: usize,
    /// Replaces the built-in slice layout
    pub slice_layout: Option<SceneLayout>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            mapping: ScreenMapping::default(),
            physics: PhysicsConfig::default(),
            ragdoll_count: 2,
            slice_layout: None,
        }
    }
}

/// Cycles through the demos
pub struct SceneManager {
    settings: SceneSettings,
    index: usize,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new(SceneSettings::default())
    }
}

impl SceneManager {
    /// Create a manager positioned on the first demo
    pub fn new(settings: SceneSettings) -> Self {
        Self { settings, index: 0 }
    }

    /// Position the manager on `kind`
    pub fn with_start(mut self, kind: SceneKind) -> Self {
        self.index = Self::index_of(kind);
        self
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn current_kind(&self) -> SceneKind {
        SceneKind::ALL[self.index]
    }

    /// Build a fresh instance of the current demo
    pub fn current(&self) -> Box<dyn DemoScene> {
        self.build(self.current_kind())
    }

    /// Advance to the next demo and build it
    pub fn next(&mut self) -> Box<dyn DemoScene> {
        self.index = (self.index + 1) % SceneKind::ALL.len();
        self.current()
    }

    /// Go back to the previous demo and build it
    pub fn previous(&mut self) -> Box<dyn DemoScene> {
        self.index = (self.index + SceneKind::ALL.len() - 1) % SceneKind::ALL.len();
        self.current()
    }

    /// Build a demo with the manager's settings
    pub fn build(&self, kind: SceneKind) -> Box<dyn DemoScene> {
        let s = &self.settings;
        match kind {
            SceneKind::Buoyancy => Box::new(BuoyancyScene::new(s.mapping, s.physics.clone())),
            SceneKind::Ragdoll => Box::new(RagdollScene::new(
                s.mapping,
                s.physics.clone(),
                s.ragdoll_count,
            )),
            SceneKind::Slice => match &s.slice_layout {
                Some(layout) => {
                    match SliceScene::with_layout(s.mapping, s.physics.clone(), layout) {
                        Ok(scene) => Box::new(scene),
                        Err(e) => {
                            log::warn!(
                                "Invalid slice layout '{}': {}. Using built-in layout.",
                                layout.name,
                                e
                            );
                            Box::new(SliceScene::new(s.mapping, s.physics.clone()))
                        }
                    }
                }
                None => Box::new(SliceScene::new(s.mapping, s.physics.clone())),
            },
        }
    }

    fn index_of(kind: SceneKind) -> usize {
        SceneKind::ALL.iter().position(|k| *k == kind).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scene_kind() {
        assert_eq!("slice".parse::<SceneKind>(), Ok(SceneKind::Slice));
        assert_eq!(" Ragdoll ".parse::<SceneKind>(), Ok(SceneKind::Ragdoll));
        assert_eq!(
            "teleport".parse::<SceneKind>(),
            Err(SceneError::UnknownScene("teleport".to_string()))
        );
    }

    #[test]
    fn test_next_wraps() {
        let mut manager = SceneManager::default();
        assert_eq!(manager.current_kind(), SceneKind::Buoyancy);
        assert_eq!(manager.next().name(), "Ragdoll");
        assert_eq!(manager.next().name(), "Slice");
        assert_eq!(manager.next().name(), "Buoyancy");
    }

    #[test]
    fn test_previous_wraps() {
        let mut manager = SceneManager::default();
        assert_eq!(manager.previous().name(), "Slice");
        assert_eq!(manager.current_kind(), SceneKind::Slice);
        assert_eq!(manager.previous().name(), "Ragdoll");
    }

    #[test]
    fn test_with_start() {
        let manager = SceneManager::default().with_start(SceneKind::Slice);
        assert_eq!(manager.current().name(), "Slice");
    }

    #[test]
    fn test_current_is_fresh_each_time() {
        let manager = SceneManager::default().with_start(SceneKind::Slice);
        let mut first = manager.current();
        first.update(0.5);
        let second = manager.current();
        assert_eq!(first.world().body_count(), second.world().body_count());
    }

    #[test]
    fn test_invalid_slice_layout_falls_back() {
        use crate::layout::{BodyTemplate, ShapeTemplate};
        use demo2d_math::Vec2;

        let mut layout = SceneLayout::new("Broken");
        layout.add_body(BodyTemplate::new(
            ShapeTemplate::Polygon {
                vertices: vec![Vec2::ZERO],
            },
            Vec2::ZERO,
        ));
        let settings = SceneSettings {
            slice_layout: Some(layout),
            ..Default::default()
        };
        let scene = SceneManager::new(settings).build(SceneKind::Slice);
        assert_eq!(scene.world().body_count(), 5);
    }
}
