//! 2D Mathematics Library
//!
//! This crate provides the small amount of 2D math the demo scenes need.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components (metres in world space)
//! - [`Rot2`] - 2D rotation stored as cosine/sine
//! - [`Transform2`] - Rigid transform (translation + rotation)
//!
//! ## Shape Types
//!
//! - [`Polygon`] - Convex counter-clockwise polygon with clipping and splitting

mod vec2;
mod rot2;
pub mod polygon;

pub use vec2::Vec2;
pub use rot2::{Rot2, Transform2};
pub use polygon::{Polygon, PolygonError};
