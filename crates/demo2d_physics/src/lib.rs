//! 2D physics for the demo2d scenes
//!
//! This crate provides a small rigid body world, including:
//! - Collision shapes (circles, convex polygons) and static bounding planes
//! - Rigid body dynamics with gravity, damping and plane contacts
//! - Mouse and revolute joints
//! - A buoyancy controller
//! - Pass-through ray casts, region and point queries
//! - Classification of ray-cast hits for body slicing

pub mod body;
pub mod buoyancy;
pub mod collision;
pub mod joint;
pub mod material;
pub mod query;
pub mod raycast;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, BodyType, Fixture, FixtureRef, RigidBody2D};
pub use buoyancy::BuoyancyController;
pub use collision::{
    circle_vs_plane, polygon_vs_plane, shape_vs_plane, CollisionFilter, CollisionLayer, Contact,
    StaticPlane,
};
pub use joint::{Joint, JointKey, MouseJoint, RevoluteJoint, RevoluteJointDef};
pub use material::PhysicsMaterial;
pub use query::{
    ClosestHit, ClosestHitInfo, PointQuery, QueryCallback, RayCastCallback, RayCastDirective,
    RayHit,
};
pub use raycast::{
    ClassifierState, IntersectionRecord, RayIntersectionClassifier, FILTERED_TAG, MAX_COUNT,
};
pub use shapes::{Aabb, Circle, MassData, Plane2D, RayCrossing, Shape};
pub use world::{PhysicsConfig, PhysicsWorld};
