//! Scripted touch gestures
//!
//! There is no touch screen in the headless runner, so each demo gets a
//! recorded gesture instead. Drags and swipes are expanded up front into
//! one touch event per frame and replayed by frame number.

use demo2d_core::{SceneKind, SceneSettings, TouchEvent};
use demo2d_math::Vec2;

/// Frames a swipe takes from touch down to touch up
pub const SWIPE_FRAMES: u64 = 6;

/// A touch event due on a given frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedTouch {
    pub frame: u64,
    pub event: TouchEvent,
}

/// Touch events ordered by frame
#[derive(Clone, Debug, Default)]
pub struct GestureScript {
    touches: Vec<ScriptedTouch>,
}

impl GestureScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press at `from`, move in a straight line and lift at `to`
    ///
    /// The touch goes down on `start_frame` and lifts `frames` frames later,
    /// with one Moved event on every frame in between.
    pub fn drag(mut self, id: u64, from: Vec2, to: Vec2, start_frame: u64, frames: u64) -> Self {
        let frames = frames.max(1);
        self.push(start_frame, TouchEvent::began(id, from));
        for i in 1..frames {
            let t = i as f32 / frames as f32;
            self.push(start_frame + i, TouchEvent::moved(id, from.lerp(to, t)));
        }
        self.push(start_frame + frames, TouchEvent::ended(id, to));
        self
    }

    /// A quick drag lasting [`SWIPE_FRAMES`]
    pub fn swipe(self, id: u64, from: Vec2, to: Vec2, start_frame: u64) -> Self {
        self.drag(id, from, to, start_frame, SWIPE_FRAMES)
    }

    /// Events due on `frame`, in the order they were scripted
    pub fn events_at(&self, frame: u64) -> impl Iterator<Item = &TouchEvent> {
        self.touches
            .iter()
            .filter(move |touch| touch.frame == frame)
            .map(|touch| &touch.event)
    }

    /// Frame of the final event
    pub fn last_frame(&self) -> Option<u64> {
        self.touches.last().map(|touch| touch.frame)
    }

    pub fn touches(&self) -> &[ScriptedTouch] {
        &self.touches
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// The gesture replayed for each demo
    ///
    /// Buoyancy drags the first floating body up out of the water, ragdoll
    /// throws the first ragdoll by its head and slice swipes across the row
    /// of bodies.
    pub fn for_scene(kind: SceneKind, settings: &SceneSettings) -> Self {
        let w = settings.mapping.screen_width;
        let h = settings.mapping.screen_height;
        match kind {
            SceneKind::Buoyancy => Self::new().drag(
                1,
                Vec2::new(w / 9.0, h * 0.4),
                Vec2::new(w * 0.5, h * 0.15),
                0,
                60,
            ),
            SceneKind::Ragdoll if settings.ragdoll_count > 0 => {
                let head = Vec2::new(w / (settings.ragdoll_count as f32 + 1.0), 20.0);
                Self::new().drag(1, head, Vec2::new(w * 0.5, h * 0.2), 0, 45)
            }
            SceneKind::Ragdoll => Self::new(),
            SceneKind::Slice => {
                Self::new().swipe(1, Vec2::new(8.0, h * 0.6), Vec2::new(w - 8.0, h * 0.6), 2)
            }
        }
    }

    fn push(&mut self, frame: u64, event: TouchEvent) {
        // Stable insert keeps same-frame events in scripting order
        let index = self.touches.partition_point(|touch| touch.frame <= frame);
        self.touches.insert(index, ScriptedTouch { frame, event });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demo2d_core::TouchPhase;

    #[test]
    fn test_drag_expands_to_every_frame() {
        let script = GestureScript::new().drag(3, Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0), 5, 4);
        assert_eq!(script.len(), 5);
        assert_eq!(script.last_frame(), Some(9));

        let phases: Vec<TouchPhase> = script.touches().iter().map(|t| t.event.phase).collect();
        assert_eq!(
            phases,
            vec![
                TouchPhase::Began,
                TouchPhase::Moved,
                TouchPhase::Moved,
                TouchPhase::Moved,
                TouchPhase::Ended
            ]
        );

        let mid: Vec<&TouchEvent> = script.events_at(7).collect();
        assert_eq!(mid.len(), 1);
        assert_eq!(mid[0].location, Vec2::new(20.0, 0.0));
        assert_eq!(mid[0].id, 3);
    }

    #[test]
    fn test_zero_length_drag_still_lifts() {
        let script = GestureScript::new().drag(1, Vec2::ZERO, Vec2::X, 0, 0);
        assert_eq!(script.len(), 2);
        assert_eq!(script.events_at(1).next().map(|e| e.phase), Some(TouchPhase::Ended));
    }

    #[test]
    fn test_events_are_ordered_by_frame() {
        let script = GestureScript::new()
            .swipe(2, Vec2::ZERO, Vec2::X, 20)
            .swipe(1, Vec2::ZERO, Vec2::X, 0);
        let frames: Vec<u64> = script.touches().iter().map(|t| t.frame).collect();
        let mut sorted = frames.clone();
        sorted.sort();
        assert_eq!(frames, sorted);
        assert_eq!(script.events_at(0).next().map(|e| e.id), Some(1));
    }

    #[test]
    fn test_same_frame_keeps_script_order() {
        let script = GestureScript::new()
            .drag(1, Vec2::ZERO, Vec2::X, 0, 2)
            .drag(2, Vec2::ZERO, Vec2::X, 2, 2);
        // Touch 1 lifts on frame 2 as touch 2 goes down
        let ids: Vec<u64> = script.events_at(2).map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_slice_swipe_crosses_screen() {
        let settings = SceneSettings::default();
        let script = GestureScript::for_scene(SceneKind::Slice, &settings);
        let first = script.touches()[0].event;
        let last = script.touches()[script.len() - 1].event;
        assert_eq!(first.phase, TouchPhase::Began);
        assert_eq!(last.phase, TouchPhase::Ended);
        assert!(last.location.x - first.location.x > settings.mapping.screen_width * 0.9);
    }

    #[test]
    fn test_ragdoll_without_ragdolls_is_empty() {
        let settings = SceneSettings {
            ragdoll_count: 0,
            ..Default::default()
        };
        assert!(GestureScript::for_scene(SceneKind::Ragdoll, &settings).is_empty());
    }
}
