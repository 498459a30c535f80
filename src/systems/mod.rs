//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod simulation;

pub use simulation::{SimulationSystem, MAX_FRAME_DT, MIN_FIXED_TIMESTEP};
