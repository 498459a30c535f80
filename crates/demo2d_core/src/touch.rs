//! Touch events and the mouse joints they drive

use demo2d_math::Vec2;
use demo2d_physics::JointKey;
use serde::{Deserialize, Serialize};

/// Stage of a touch's lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// One touch update, located in screen pixels (y down)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Stable identifier for the finger across its phases
    pub id: u64,
    pub phase: TouchPhase,
    pub location: Vec2,
}

impl TouchEvent {
    pub fn new(id: u64, phase: TouchPhase, location: Vec2) -> Self {
        Self { id, phase, location }
    }

    pub fn began(id: u64, location: Vec2) -> Self {
        Self::new(id, TouchPhase::Began, location)
    }

    pub fn moved(id: u64, location: Vec2) -> Self {
        Self::new(id, TouchPhase::Moved, location)
    }

    pub fn ended(id: u64, location: Vec2) -> Self {
        Self::new(id, TouchPhase::Ended, location)
    }

    pub fn cancelled(id: u64, location: Vec2) -> Self {
        Self::new(id, TouchPhase::Cancelled, location)
    }

    /// True for the phases that finish a touch
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, TouchPhase::Ended | TouchPhase::Cancelled)
    }
}

/// A touch bound to the mouse joint it is dragging
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchJoint {
    pub touch_id: u64,
    pub joint: JointKey,
}

/// Active touch joints, at most one per touch
#[derive(Clone, Debug, Default)]
pub struct TouchJointList {
    entries: Vec<TouchJoint>,
}

impl TouchJointList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a touch to a joint, replacing any earlier binding of that touch
    ///
    /// Returns the joint previously bound to the touch.
    pub fn insert(&mut self, touch_id: u64, joint: JointKey) -> Option<JointKey> {
        let previous = self.remove(touch_id);
        self.entries.push(TouchJoint { touch_id, joint });
        previous
    }

    /// Joint dragged by a touch
    pub fn get(&self, touch_id: u64) -> Option<JointKey> {
        self.entries.iter().find(|e| e.touch_id == touch_id).map(|e| e.joint)
    }

    /// Unbind a touch, returning its joint
    pub fn remove(&mut self, touch_id: u64) -> Option<JointKey> {
        let index = self.entries.iter().position(|e| e.touch_id == touch_id)?;
        Some(self.entries.remove(index).joint)
    }

    /// Remove every binding, returning the joints in insertion order
    pub fn drain(&mut self) -> Vec<JointKey> {
        self.entries.drain(..).map(|e| e.joint).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TouchJoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
