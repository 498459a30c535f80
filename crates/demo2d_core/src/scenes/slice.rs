//! Slicing bodies with a laser
//!
//! One finger draws a laser; when it lifts, the laser is ray cast through
//! the world and every body it crosses exactly twice is cut in two.

use crate::coords::ScreenMapping;
use crate::layout::{BodyTemplate, LayoutError, SceneLayout, ShapeTemplate};
use crate::scene::{DemoScene, SceneBase};
use crate::slice::{slice_body, SlicePieces};
use crate::touch::{TouchEvent, TouchPhase};
use demo2d_math::Vec2;
use demo2d_physics::{PhysicsConfig, PhysicsMaterial, RayIntersectionClassifier};

/// Segment drawn by the user, in world metres
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCastLaser {
    pub start: Vec2,
    pub end: Vec2,
}

impl RayCastLaser {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Built-in layout: a row of boxes and polygons resting on the floor
pub fn default_layout(mapping: &ScreenMapping) -> SceneLayout {
    let size = mapping.world_size();
    let mut layout = SceneLayout::new("Slice");

    let shapes = [
        ShapeTemplate::Box { half_width: 1.0, half_height: 1.0 },
        ShapeTemplate::Polygon {
            vertices: vec![
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(0.0, 1.2),
            ],
        },
        ShapeTemplate::Box { half_width: 0.6, half_height: 1.5 },
        ShapeTemplate::Polygon {
            vertices: vec![
                Vec2::new(-1.0, -0.6),
                Vec2::new(0.0, -1.0),
                Vec2::new(1.0, -0.6),
                Vec2::new(1.0, 0.6),
                Vec2::new(0.0, 1.0),
                Vec2::new(-1.0, 0.6),
            ],
        },
    ];
    let count = shapes.len();
    for (i, shape) in shapes.into_iter().enumerate() {
        let x = size.x * (i as f32 + 1.0) / (count as f32 + 1.0);
        layout.add_body(
            BodyTemplate::new(shape, Vec2::new(x, size.y * 0.4))
                .with_name(format!("piece{}", i))
                .with_material(PhysicsMaterial::WOOD),
        );
    }
    layout
}

pub struct SliceScene {
    base: SceneBase,
    laser: Option<RayCastLaser>,
    laser_touch: Option<u64>,
    slice_count: usize,
}

impl SliceScene {
    /// Scene populated with the built-in layout
    pub fn new(mapping: ScreenMapping, physics: PhysicsConfig) -> Self {
        let base = SceneBase::new(mapping, physics);
        let mut scene = Self::empty(base);
        // The built-in layout only contains valid shapes
        if let Err(e) = default_layout(&mapping).spawn(scene.base.world_mut()) {
            log::warn!("Failed to spawn built-in slice layout: {}", e);
        }
        log::info!("Built slice scene with {} bodies", scene.world().body_count() - 1);
        scene
    }

    /// Scene populated from a layout
    pub fn with_layout(
        mapping: ScreenMapping,
        physics: PhysicsConfig,
        layout: &SceneLayout,
    ) -> Result<Self, LayoutError> {
        let mut scene = Self::empty(SceneBase::new(mapping, physics));
        layout.spawn(scene.base.world_mut())?;
        log::info!("Built slice scene '{}' with {} bodies", layout.name, layout.bodies.len());
        Ok(scene)
    }

    fn empty(base: SceneBase) -> Self {
        Self {
            base,
            laser: None,
            laser_touch: None,
            slice_count: 0,
        }
    }

    /// Laser currently being drawn
    pub fn laser(&self) -> Option<&RayCastLaser> {
        self.laser.as_ref()
    }

    /// Bodies cut since the scene was built
    pub fn slice_count(&self) -> usize {
        self.slice_count
    }

    /// Cast the laser and cut every body it crosses exactly twice
    ///
    /// The query finishes before any body is replaced.
    pub fn fire_laser(&mut self, laser: RayCastLaser) -> Vec<SlicePieces> {
        let mut classifier = RayIntersectionClassifier::new();
        self.world().ray_cast(laser.start, laser.end, &mut classifier);
        classifier.finish();

        let targets: Vec<_> = classifier
            .sliceable_bodies()
            .into_iter()
            .filter_map(|body| {
                classifier
                    .intersection_points_for(body)
                    .map(|points| (body, points))
            })
            .collect();
        log::debug!(
            "Laser crossed {} bodies, {} sliceable",
            classifier.distinct_bodies().len(),
            targets.len()
        );

        let mut pieces = Vec::with_capacity(targets.len());
        for (body, (entry, exit)) in targets {
            match slice_body(self.world_mut(), body, entry, exit) {
                Ok(cut) => pieces.push(cut),
                Err(e) => log::warn!("Slice rejected: {}", e),
            }
        }
        self.slice_count += pieces.len();
        pieces
    }
}

impl DemoScene for SliceScene {
    fn name(&self) -> &str {
        "Slice"
    }

    fn base(&self) -> &SceneBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SceneBase {
        &mut self.base
    }

    /// The first finger draws the laser; other fingers are ignored
    fn on_touch(&mut self, event: &TouchEvent) {
        let location = self.base.mapping().to_world(event.location);
        match event.phase {
            TouchPhase::Began => {
                if self.laser_touch.is_none() {
                    self.laser_touch = Some(event.id);
                    self.laser = Some(RayCastLaser::new(location, location));
                }
            }
            TouchPhase::Moved => {
                if self.laser_touch == Some(event.id) {
                    if let Some(laser) = &mut self.laser {
                        laser.end = location;
                    }
                }
            }
            TouchPhase::Ended => {
                if self.laser_touch == Some(event.id) {
                    self.laser_touch = None;
                    if let Some(mut laser) = self.laser.take() {
                        laser.end = location;
                        self.fire_laser(laser);
                    }
                }
            }
            TouchPhase::Cancelled => {
                if self.laser_touch == Some(event.id) {
                    self.laser_touch = None;
                    self.laser = None;
                }
            }
        }
    }
}
