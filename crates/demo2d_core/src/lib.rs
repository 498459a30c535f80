//! Demo scenes for demo2d
//!
//! This crate wires touch input to the physics world:
//!
//! - [`ScreenMapping`] - Screen pixel <-> world metre conversion
//! - [`TouchEvent`], [`TouchJointList`] - Touch input and the mouse joints it drives
//! - [`DemoScene`], [`SceneBase`] - Scene trait and the shared bounded world
//! - [`BuoyancyScene`], [`RagdollScene`], [`SliceScene`] - The demos
//! - [`slice_body`] - Cutting a body in two along a line
//! - [`SceneLayout`] - Loadable/saveable list of bodies
//! - [`SceneManager`] - Cycling through the demos

mod coords;
pub mod layout;
mod scene;
mod scene_manager;
pub mod scenes;
pub mod slice;
mod touch;

pub use coords::{ScreenMapping, PTM_RATIO};
pub use layout::{BodyTemplate, LayoutError, SceneLayout, ShapeTemplate};
pub use scene::{DemoScene, SceneBase, MOUSE_FORCE_PER_MASS};
pub use scene_manager::{SceneError, SceneKind, SceneManager, SceneSettings};
pub use scenes::{BuoyancyScene, RagdollScene, RayCastLaser, SliceScene};
pub use slice::{slice_body, SliceError, SlicePieces, MAX_POLYGON_VERTICES, MIN_SLICE_AREA};
pub use touch::{TouchEvent, TouchJoint, TouchJointList, TouchPhase};

// Re-export physics types for convenient access through demo2d_core
pub use demo2d_physics::{BodyKey, PhysicsConfig, PhysicsWorld, RayIntersectionClassifier};
