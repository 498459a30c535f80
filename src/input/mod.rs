//! Input handling module
//!
//! Provides scripted touch gestures for the headless runner.

mod gesture;

pub use gesture::{GestureScript, ScriptedTouch, SWIPE_FRAMES};
