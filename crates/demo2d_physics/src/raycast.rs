//! Classification of the bodies struck by one pass-through ray cast
//!
//! A [`RayIntersectionClassifier`] records every `(body, point)` crossing a
//! ray cast reports, up to [`MAX_COUNT`] records, then answers which bodies
//! were struck and which were struck at exactly two points (entry and exit),
//! making them candidates for slicing.
//!
//! Create one classifier per query. World mutation based on its results must
//! wait until [`PhysicsWorld::ray_cast`](crate::world::PhysicsWorld::ray_cast)
//! has returned.

use crate::body::BodyKey;
use crate::query::{RayCastCallback, RayCastDirective, RayHit};
use arrayvec::ArrayVec;
use demo2d_math::Vec2;

/// Maximum number of crossings recorded by one classifier
pub const MAX_COUNT: usize = 20;

/// User tag marking bodies that ray casts pass through without recording
pub const FILTERED_TAG: i32 = 0;

/// One crossing of the ray with a body boundary
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionRecord {
    pub body: BodyKey,
    pub point: Vec2,
}

/// Whether the classifier still accepts reports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassifierState {
    Collecting,
    Finalized,
}

/// Bounded collector of ray crossings
#[derive(Clone, Debug)]
pub struct RayIntersectionClassifier {
    records: ArrayVec<IntersectionRecord, MAX_COUNT>,
    state: ClassifierState,
}

impl Default for RayIntersectionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RayIntersectionClassifier {
    pub fn new() -> Self {
        Self {
            records: ArrayVec::new(),
            state: ClassifierState::Collecting,
        }
    }

    /// Record one crossing and tell the ray cast how to proceed
    ///
    /// Bodies tagged [`FILTERED_TAG`] are never recorded and yield
    /// [`RayCastDirective::Filter`]. Filling the last slot yields
    /// [`RayCastDirective::Stop`] and finalizes the classifier.
    ///
    /// # Panics
    ///
    /// Panics if called when [`MAX_COUNT`] records are already stored; the
    /// ray cast should have stopped on the previous report.
    pub fn report(&mut self, body: BodyKey, point: Vec2, marker: Option<i32>) -> RayCastDirective {
        if marker == Some(FILTERED_TAG) {
            return RayCastDirective::Filter;
        }

        assert!(
            self.records.len() < MAX_COUNT,
            "ray intersection capacity of {} exceeded: the ray cast ignored a stop directive",
            MAX_COUNT
        );

        self.records.push(IntersectionRecord { body, point });

        if self.records.is_full() {
            self.state = ClassifierState::Finalized;
            RayCastDirective::Stop
        } else {
            RayCastDirective::Continue
        }
    }

    /// Mark the query as complete (the ray was exhausted)
    pub fn finish(&mut self) {
        self.state = ClassifierState::Finalized;
    }

    pub fn state(&self) -> ClassifierState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == ClassifierState::Finalized
    }

    /// Recorded crossings in report order
    pub fn records(&self) -> &[IntersectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Each struck body once, in order of first appearance
    pub fn distinct_bodies(&self) -> Vec<BodyKey> {
        let mut bodies: Vec<BodyKey> = Vec::with_capacity(self.records.len());
        for record in &self.records {
            if !bodies.contains(&record.body) {
                bodies.push(record.body);
            }
        }
        bodies
    }

    /// Bodies struck at exactly two points, in first-appearance order
    ///
    /// Bodies crossed once or more than twice (a concave outline, for
    /// example) are left out even if a cut would be possible.
    pub fn sliceable_bodies(&self) -> Vec<BodyKey> {
        self.distinct_bodies()
            .into_iter()
            .filter(|body| self.count_for(*body) == 2)
            .collect()
    }

    /// First two crossing points of `body` in report order
    pub fn intersection_points_for(&self, body: BodyKey) -> Option<(Vec2, Vec2)> {
        let mut points = self.records.iter().filter(|r| r.body == body).map(|r| r.point);
        let first = points.next()?;
        let second = points.next()?;
        Some((first, second))
    }

    fn count_for(&self, body: BodyKey) -> usize {
        self.records.iter().filter(|r| r.body == body).count()
    }
}

impl RayCastCallback for RayIntersectionClassifier {
    fn report_fixture(&mut self, hit: &RayHit<'_>) -> RayCastDirective {
        self.report(hit.body_key(), hit.point, hit.body.user_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<BodyKey> {
        let mut map = SlotMap::<BodyKey, ()>::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn p(x: f32) -> Vec2 {
        Vec2::new(x, 0.0)
    }

    #[test]
    fn test_empty_classifier() {
        let classifier = RayIntersectionClassifier::new();
        let body = keys(1)[0];
        assert!(classifier.is_empty());
        assert!(classifier.distinct_bodies().is_empty());
        assert!(classifier.sliceable_bodies().is_empty());
        assert_eq!(classifier.intersection_points_for(body), None);
        assert_eq!(classifier.state(), ClassifierState::Collecting);
    }

    #[test]
    fn test_mixed_report_scenario() {
        let k = keys(3);
        let (a, b, c) = (k[0], k[1], k[2]);
        let mut classifier = RayIntersectionClassifier::new();

        for (body, x) in [(a, 1.0), (b, 2.0), (a, 3.0), (b, 4.0), (c, 5.0)] {
            assert_eq!(classifier.report(body, p(x), None), RayCastDirective::Continue);
        }
        classifier.finish();

        assert_eq!(classifier.distinct_bodies(), vec![a, b, c]);
        assert_eq!(classifier.sliceable_bodies(), vec![a, b]);
        assert_eq!(classifier.intersection_points_for(a), Some((p(1.0), p(3.0))));
        assert_eq!(classifier.intersection_points_for(b), Some((p(2.0), p(4.0))));
        assert_eq!(classifier.intersection_points_for(c), None);
        assert!(classifier.is_finalized());
    }

    #[test]
    fn test_capacity_stops_at_max_count() {
        let bodies = keys(MAX_COUNT + 1);
        let mut classifier = RayIntersectionClassifier::new();

        for (i, body) in bodies.iter().take(MAX_COUNT - 1).enumerate() {
            assert_eq!(classifier.report(*body, p(i as f32), None), RayCastDirective::Continue);
        }
        assert_eq!(
            classifier.report(bodies[MAX_COUNT - 1], p(19.0), None),
            RayCastDirective::Stop
        );
        assert_eq!(classifier.len(), MAX_COUNT);
        assert!(classifier.is_finalized());
        assert!(!classifier.distinct_bodies().contains(&bodies[MAX_COUNT]));
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn test_report_after_full_panics() {
        let bodies = keys(MAX_COUNT + 1);
        let mut classifier = RayIntersectionClassifier::new();
        for body in &bodies[..MAX_COUNT] {
            classifier.report(*body, Vec2::ZERO, None);
        }
        classifier.report(bodies[MAX_COUNT], Vec2::ZERO, None);
    }

    #[test]
    fn test_filtered_body_never_recorded() {
        let k = keys(2);
        let mut classifier = RayIntersectionClassifier::new();

        assert_eq!(classifier.report(k[0], p(1.0), Some(FILTERED_TAG)), RayCastDirective::Filter);
        assert_eq!(classifier.report(k[0], p(2.0), Some(FILTERED_TAG)), RayCastDirective::Filter);
        assert_eq!(classifier.report(k[1], p(3.0), Some(7)), RayCastDirective::Continue);

        assert_eq!(classifier.distinct_bodies(), vec![k[1]]);
        assert_eq!(classifier.intersection_points_for(k[0]), None);
    }

    #[test]
    fn test_filtered_reports_do_not_use_capacity() {
        let bodies = keys(MAX_COUNT + 1);
        let mut classifier = RayIntersectionClassifier::new();
        for _ in 0..50 {
            classifier.report(bodies[MAX_COUNT], Vec2::ZERO, Some(FILTERED_TAG));
        }
        assert!(classifier.is_empty());
        for body in &bodies[..MAX_COUNT - 1] {
            assert_eq!(classifier.report(*body, Vec2::ZERO, None), RayCastDirective::Continue);
        }
    }

    #[test]
    fn test_distinct_bodies_first_appearance_order() {
        let k = keys(3);
        let mut classifier = RayIntersectionClassifier::new();
        for body in [k[2], k[0], k[2], k[1], k[0], k[2]] {
            classifier.report(body, Vec2::ZERO, None);
        }
        assert_eq!(classifier.distinct_bodies(), vec![k[2], k[0], k[1]]);
    }

    #[test]
    fn test_sliceable_requires_exactly_two() {
        let k = keys(3);
        let mut classifier = RayIntersectionClassifier::new();
        // k0 once, k1 twice, k2 three times
        for body in [k[0], k[1], k[2], k[1], k[2], k[2]] {
            classifier.report(body, Vec2::ZERO, None);
        }
        assert_eq!(classifier.sliceable_bodies(), vec![k[1]]);
    }

    #[test]
    fn test_points_for_body_hit_more_than_twice_uses_first_two() {
        let a = keys(1)[0];
        let mut classifier = RayIntersectionClassifier::new();
        for x in [1.0, 2.0, 3.0, 4.0] {
            classifier.report(a, p(x), None);
        }
        assert_eq!(classifier.intersection_points_for(a), Some((p(1.0), p(2.0))));
        assert!(classifier.sliceable_bodies().is_empty());
    }

    #[test]
    fn test_points_for_single_hit_is_none() {
        let a = keys(1)[0];
        let mut classifier = RayIntersectionClassifier::new();
        classifier.report(a, p(1.0), None);
        assert_eq!(classifier.intersection_points_for(a), None);
    }

    #[test]
    fn test_removed_key_does_not_alias_new_body() {
        let mut map = SlotMap::<BodyKey, ()>::with_key();
        let old = map.insert(());
        map.remove(old);
        let new = map.insert(());
        assert_ne!(old, new);

        let mut classifier = RayIntersectionClassifier::new();
        classifier.report(old, p(1.0), None);
        classifier.report(new, p(2.0), None);
        assert_eq!(classifier.distinct_bodies(), vec![old, new]);
    }
}
