//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`D2D_SECTION__KEY`)

use demo2d_core::{SceneKind, SceneLayout, SceneSettings, ScreenMapping, PTM_RATIO};
use demo2d_math::Vec2;
use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Screen size and pixel scale
    #[serde(default)]
    pub screen: ScreenConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Which demo runs and how long
    #[serde(default)]
    pub demo: DemoConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`D2D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // D2D_DEMO__START_SCENE=ragdoll -> demo.start_scene = "ragdoll"
        figment = figment.merge(Env::prefixed("D2D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Settings the scene manager builds every demo with
    ///
    /// A slice layout that fails to load is logged and skipped, leaving the
    /// built-in layout in place.
    pub fn scene_settings(&self) -> SceneSettings {
        let slice_layout = self.demo.slice_layout.as_ref().and_then(|path| {
            SceneLayout::load(path)
                .map_err(|e| log::warn!("Failed to load slice layout '{}': {}", path, e))
                .ok()
        });

        SceneSettings {
            mapping: self.screen.to_mapping(),
            physics: self.physics.to_physics_config(),
            ragdoll_count: self.demo.ragdoll_count,
            slice_layout,
        }
    }
}

/// Screen configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
    /// Pixels per metre
    pub ptm_ratio: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 320.0,
            ptm_ratio: PTM_RATIO,
        }
    }
}

impl ScreenConfig {
    pub fn to_mapping(&self) -> ScreenMapping {
        ScreenMapping::new(self.width, self.height, self.ptm_ratio)
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity (negative = downward)
    pub gravity: f32,
    /// Velocity solver iterations per step
    pub velocity_iterations: u32,
    /// Position solver iterations per step
    pub position_iterations: u32,
    /// Fixed simulation step in seconds
    pub fixed_timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            velocity_iterations: 8,
            position_iterations: 3,
            fixed_timestep: 1.0 / 60.0,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the physics engine's configuration
    pub fn to_physics_config(&self) -> demo2d_physics::PhysicsConfig {
        demo2d_physics::PhysicsConfig {
            gravity: Vec2::new(0.0, self.gravity),
            velocity_iterations: self.velocity_iterations,
            position_iterations: self.position_iterations,
        }
    }
}

/// Demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Demo to start with (buoyancy, ragdoll, slice)
    pub start_scene: String,
    /// Frames to simulate before exiting
    pub frames: u64,
    /// RON layout replacing the built-in slice scene
    pub slice_layout: Option<String>,
    /// Ragdolls in the ragdoll demo
    pub ragdoll_count: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            start_scene: "slice".to_string(),
            frames: 300,
            slice_layout: None,
            ragdoll_count: 2,
        }
    }
}

impl DemoConfig {
    /// The configured start scene, falling back to the first demo
    pub fn start_kind(&self) -> SceneKind {
        self.start_scene.parse().unwrap_or_else(|e| {
            log::warn!("{}. Starting with {}.", e, SceneKind::ALL[0].name());
            SceneKind::ALL[0]
        })
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
