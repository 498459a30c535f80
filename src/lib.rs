//! demo2d - Touch-driven 2D physics demos
//!
//! Headless runner for the buoyancy, ragdoll and slice demos in
//! `demo2d_core`, with layered configuration and scripted touch input.

pub mod app;
pub mod config;
pub mod input;
pub mod systems;
