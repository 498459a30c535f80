//! The demo scenes

mod buoyancy;
mod ragdoll;
mod slice;

pub use buoyancy::{BuoyancyScene, FLOATING_BODY_COUNT};
pub use ragdoll::{spawn_ragdoll, Ragdoll, RagdollScene, RAGDOLL_BODY_COUNT, RAGDOLL_JOINT_COUNT};
pub use slice::{default_layout, RayCastLaser, SliceScene};
