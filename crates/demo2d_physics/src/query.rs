//! World query callbacks
//!
//! A ray cast reports every fixture boundary the segment crosses, nearest
//! first, and the callback steers the rest of the query with a
//! [`RayCastDirective`]. Region queries report fixtures whose bounds overlap
//! a box until the callback asks to stop.

use crate::body::{BodyKey, FixtureRef, RigidBody2D};
use demo2d_math::Vec2;

/// What the ray cast should do after a fixture has been reported
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RayCastDirective {
    /// Ignore this fixture and keep going as if it was not hit
    Filter,
    /// Terminate the query
    Stop,
    /// Clip the ray to this fraction; later crossings are dropped
    Clip(f32),
    /// Keep going with the ray unchanged
    Continue,
}

impl RayCastDirective {
    /// Raw fraction value used by clipping ray casts (-1, 0, fraction or 1)
    pub fn to_fraction(self) -> f32 {
        match self {
            RayCastDirective::Filter => -1.0,
            RayCastDirective::Stop => 0.0,
            RayCastDirective::Clip(fraction) => fraction,
            RayCastDirective::Continue => 1.0,
        }
    }
}

/// One boundary crossing reported during a ray cast
#[derive(Clone, Copy, Debug)]
pub struct RayHit<'a> {
    pub fixture: FixtureRef,
    /// The body owning the fixture
    pub body: &'a RigidBody2D,
    /// Crossing point in world space
    pub point: Vec2,
    /// Outward surface normal at the crossing
    pub normal: Vec2,
    /// Position along the cast segment, 0 at the start and 1 at the end
    pub fraction: f32,
}

impl RayHit<'_> {
    /// Key of the struck body
    pub fn body_key(&self) -> BodyKey {
        self.fixture.body
    }
}

/// Receives the crossings of a ray cast
pub trait RayCastCallback {
    fn report_fixture(&mut self, hit: &RayHit<'_>) -> RayCastDirective;
}

impl<F> RayCastCallback for F
where
    F: FnMut(&RayHit<'_>) -> RayCastDirective,
{
    fn report_fixture(&mut self, hit: &RayHit<'_>) -> RayCastDirective {
        self(hit)
    }
}

/// Nearest non-filtered crossing along a ray
#[derive(Clone, Copy, Debug, Default)]
pub struct ClosestHit {
    pub hit: Option<ClosestHitInfo>,
}

/// Result recorded by [`ClosestHit`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestHitInfo {
    pub body: BodyKey,
    pub point: Vec2,
    pub normal: Vec2,
    pub fraction: f32,
}

impl ClosestHit {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RayCastCallback for ClosestHit {
    fn report_fixture(&mut self, hit: &RayHit<'_>) -> RayCastDirective {
        self.hit = Some(ClosestHitInfo {
            body: hit.body_key(),
            point: hit.point,
            normal: hit.normal,
            fraction: hit.fraction,
        });
        RayCastDirective::Clip(hit.fraction)
    }
}

/// Receives fixtures found by a region query; return false to stop
pub trait QueryCallback {
    fn report_fixture(&mut self, fixture: FixtureRef, body: &RigidBody2D) -> bool;
}

impl<F> QueryCallback for F
where
    F: FnMut(FixtureRef, &RigidBody2D) -> bool,
{
    fn report_fixture(&mut self, fixture: FixtureRef, body: &RigidBody2D) -> bool {
        self(fixture, body)
    }
}

/// First non-static body whose fixture contains a point
#[derive(Clone, Copy, Debug)]
pub struct PointQuery {
    pub point: Vec2,
    pub found: Option<BodyKey>,
}

impl PointQuery {
    pub fn new(point: Vec2) -> Self {
        Self { point, found: None }
    }
}

impl QueryCallback for PointQuery {
    fn report_fixture(&mut self, fixture: FixtureRef, body: &RigidBody2D) -> bool {
        if body.is_static() {
            return true;
        }
        let inside = body
            .fixtures()
            .get(fixture.index)
            .is_some_and(|f| f.shape.test_point(body.transform(), self.point));
        if inside {
            self.found = Some(fixture.body);
            return false;
        }
        true
    }
}
