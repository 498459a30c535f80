//! Cutting a body in two along a line
//!
//! The cut runs through two world points, normally the entry and exit points
//! reported by a ray cast. Each polygon fixture is split along the line and
//! the original body is replaced by one body per side.

use demo2d_math::polygon::WELD_TOLERANCE;
use demo2d_math::{Polygon, Vec2};
use demo2d_physics::{BodyKey, Fixture, PhysicsWorld, RigidBody2D, Shape};

/// Largest vertex count a slice piece may have
pub const MAX_POLYGON_VERTICES: usize = 8;

/// Smallest area a slice piece may have (m²)
pub const MIN_SLICE_AREA: f32 = 0.01;

/// The two bodies replacing a sliced one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlicePieces {
    /// Piece on the left of the cut direction
    pub left: BodyKey,
    /// Piece on the right of the cut direction
    pub right: BodyKey,
}

/// Why a body could not be sliced
#[derive(Debug, Clone, PartialEq)]
pub enum SliceError {
    /// The body no longer exists
    BodyNotFound,
    /// The body has no fixtures or has a circle fixture
    NotSliceable,
    /// The cut line misses the body or the two points coincide
    DegenerateCut,
    /// A piece would be smaller than [`MIN_SLICE_AREA`]
    PieceTooSmall(f32),
    /// A piece would have more than [`MAX_POLYGON_VERTICES`] vertices
    TooManyVertices(usize),
}

impl std::fmt::Display for SliceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceError::BodyNotFound => write!(f, "Body not found"),
            SliceError::NotSliceable => write!(f, "Body has no sliceable polygon fixtures"),
            SliceError::DegenerateCut => write!(f, "Cut line does not split the body"),
            SliceError::PieceTooSmall(area) => write!(f, "Slice piece too small: area {}", area),
            SliceError::TooManyVertices(n) => {
                write!(f, "Slice piece has {} vertices (max {})", n, MAX_POLYGON_VERTICES)
            }
        }
    }
}

impl std::error::Error for SliceError {}

/// Reject pieces the world should not simulate
fn check_piece(piece: Polygon) -> Result<Polygon, SliceError> {
    if piece.len() > MAX_POLYGON_VERTICES {
        return Err(SliceError::TooManyVertices(piece.len()));
    }
    if piece.area() < MIN_SLICE_AREA {
        return Err(SliceError::PieceTooSmall(piece.area()));
    }
    Ok(piece)
}

fn with_polygon(fixture: &Fixture, polygon: Polygon) -> Fixture {
    Fixture {
        shape: Shape::Polygon(polygon),
        ..fixture.clone()
    }
}

/// Split every fixture of `body` along the line through `entry` and `exit`
///
/// Returns `(left, right)` fixture lists in body-local coordinates. A fixture
/// the line misses moves whole to the side it lies on.
fn split_fixtures(
    body: &RigidBody2D,
    entry: Vec2,
    exit: Vec2,
) -> Result<(Vec<Fixture>, Vec<Fixture>), SliceError> {
    let a = body.local_point(entry);
    let b = body.local_point(exit);
    if (b - a).length() < WELD_TOLERANCE {
        return Err(SliceError::DegenerateCut);
    }
    // Points to the left of the cut direction
    let normal = (b - a).perp().normalized();
    let offset = normal.dot(a);

    let mut left = Vec::new();
    let mut right = Vec::new();
    for fixture in body.fixtures() {
        let Shape::Polygon(polygon) = &fixture.shape else {
            return Err(SliceError::NotSliceable);
        };

        match polygon.split_by_line(a, b) {
            Ok((l, r)) => {
                left.push(with_polygon(fixture, check_piece(l)?));
                right.push(with_polygon(fixture, check_piece(r)?));
            }
            Err(_) if normal.dot(polygon.centroid()) > offset => left.push(fixture.clone()),
            Err(_) => right.push(fixture.clone()),
        }
    }

    if left.is_empty() || right.is_empty() {
        return Err(SliceError::DegenerateCut);
    }
    Ok((left, right))
}

/// A body sharing the original's pose, motion and tag, with new fixtures
fn make_piece(original: &RigidBody2D, fixtures: Vec<Fixture>) -> RigidBody2D {
    let mut piece = RigidBody2D::new(original.body_type(), original.position())
        .with_angle(original.angle())
        .with_damping(original.linear_damping, original.angular_damping)
        .with_gravity_scale(original.gravity_scale);
    piece.set_user_tag(original.user_tag());
    for fixture in fixtures {
        piece.add_fixture(fixture);
    }
    piece.linear_velocity = original.velocity_at_point(piece.world_center());
    piece.angular_velocity = original.angular_velocity;
    piece
}

/// Replace `key` by two bodies cut along the line `entry -> exit`
///
/// On error the world is left untouched. Must not be called while a query
/// against the world is running.
pub fn slice_body(
    world: &mut PhysicsWorld,
    key: BodyKey,
    entry: Vec2,
    exit: Vec2,
) -> Result<SlicePieces, SliceError> {
    let original = world.get_body(key).ok_or(SliceError::BodyNotFound)?;
    if original.fixtures().is_empty() {
        return Err(SliceError::NotSliceable);
    }

    let (left_fixtures, right_fixtures) = split_fixtures(original, entry, exit)?;
    let left = make_piece(original, left_fixtures);
    let right = make_piece(original, right_fixtures);

    let floating = world.buoyancy().is_some_and(|b| b.bodies().contains(&key));
    world.remove_body(key);
    let pieces = SlicePieces {
        left: world.add_body(left),
        right: world.add_body(right),
    };
    if floating {
        if let Some(buoyancy) = world.buoyancy_mut() {
            buoyancy.add_body(pieces.left);
            buoyancy.add_body(pieces.right);
        }
    }

    log::info!("Sliced body into two pieces");
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use demo2d_physics::{BuoyancyController, PhysicsMaterial};

    fn world_with_box(half: f32) -> (PhysicsWorld, BodyKey) {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(
            RigidBody2D::dynamic(Vec2::new(5.0, 5.0))
                .with_fixture(Shape::rect(half, half), PhysicsMaterial::WOOD)
                .with_user_tag(3),
        );
        (world, key)
    }

    #[test]
    fn test_vertical_cut_through_center() {
        let (mut world, key) = world_with_box(1.0);
        let pieces = slice_body(&mut world, key, Vec2::new(5.0, 6.0), Vec2::new(5.0, 4.0)).unwrap();

        assert!(world.get_body(key).is_none());
        assert_eq!(world.body_count(), 2);

        // Cutting downward: left of the direction is +x
        let left = world.get_body(pieces.left).unwrap();
        let right = world.get_body(pieces.right).unwrap();
        assert!(left.world_center().x > 5.0);
        assert!(right.world_center().x < 5.0);
        assert!((left.mass() - 2.0).abs() < 1e-3);
        assert!((right.mass() - 2.0).abs() < 1e-3);
        assert_eq!(left.user_tag(), Some(3));
        assert_eq!(left.position(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_cut_respects_rotation() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(
            RigidBody2D::dynamic(Vec2::ZERO)
                .with_fixture(Shape::rect(2.0, 0.5), PhysicsMaterial::WOOD)
                .with_angle(std::f32::consts::FRAC_PI_2),
        );
        // The long axis is vertical now; a horizontal cut splits it in two
        let pieces =
            slice_body(&mut world, key, Vec2::new(-3.0, 1.0), Vec2::new(3.0, 1.0)).unwrap();
        let areas: Vec<f32> = [pieces.left, pieces.right]
            .iter()
            .map(|k| world.get_body(*k).unwrap().mass())
            .collect();
        assert!((areas[0] - 1.0).abs() < 1e-3, "top piece mass {}", areas[0]);
        assert!((areas[1] - 3.0).abs() < 1e-3, "bottom piece mass {}", areas[1]);
    }

    #[test]
    fn test_missing_body() {
        let (mut world, key) = world_with_box(1.0);
        world.remove_body(key);
        assert_eq!(
            slice_body(&mut world, key, Vec2::ZERO, Vec2::X),
            Err(SliceError::BodyNotFound)
        );
    }

    #[test]
    fn test_circle_is_not_sliceable() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(
            RigidBody2D::dynamic(Vec2::ZERO)
                .with_fixture(Shape::circle(1.0), PhysicsMaterial::WOOD),
        );
        assert_eq!(
            slice_body(&mut world, key, Vec2::new(0.0, 2.0), Vec2::new(0.0, -2.0)),
            Err(SliceError::NotSliceable)
        );
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_line_missing_body_is_degenerate() {
        let (mut world, key) = world_with_box(1.0);
        assert_eq!(
            slice_body(&mut world, key, Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0)),
            Err(SliceError::DegenerateCut)
        );
        assert!(world.get_body(key).is_some());
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let (mut world, key) = world_with_box(1.0);
        let p = Vec2::new(5.0, 5.0);
        assert_eq!(slice_body(&mut world, key, p, p), Err(SliceError::DegenerateCut));
    }

    #[test]
    fn test_sliver_rejected() {
        let (mut world, key) = world_with_box(1.0);
        // Shaves 0.001 m off the right edge: area 0.002
        let result = slice_body(&mut world, key, Vec2::new(5.999, 7.0), Vec2::new(5.999, 3.0));
        assert!(matches!(result, Err(SliceError::PieceTooSmall(_))));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_pieces_inherit_velocity() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(
            RigidBody2D::dynamic(Vec2::ZERO)
                .with_fixture(Shape::rect(1.0, 1.0), PhysicsMaterial::WOOD)
                .with_linear_velocity(Vec2::new(2.0, 0.0)),
        );
        let pieces =
            slice_body(&mut world, key, Vec2::new(0.0, 2.0), Vec2::new(0.0, -2.0)).unwrap();
        assert_eq!(world.get_body(pieces.left).unwrap().linear_velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_floating_body_pieces_stay_in_water() {
        let (mut world, key) = world_with_box(1.0);
        let mut water = BuoyancyController::new(Vec2::Y, 6.0);
        water.add_body(key);
        world.set_buoyancy(water);

        let pieces = slice_body(&mut world, key, Vec2::new(5.0, 7.0), Vec2::new(5.0, 3.0)).unwrap();
        let bodies = world.buoyancy().unwrap().bodies().to_vec();
        assert_eq!(bodies, vec![pieces.left, pieces.right]);
    }

    #[test]
    fn test_too_many_vertices() {
        let mut world = PhysicsWorld::new();
        let octagon: Vec<Vec2> = (0..8)
            .map(|i| {
                let a = i as f32 * std::f32::consts::TAU / 8.0 + 0.2;
                Vec2::new(a.cos(), a.sin()) * 2.0
            })
            .collect();
        let key = world.add_body(
            RigidBody2D::dynamic(Vec2::ZERO)
                .with_fixture(
                    Shape::Polygon(Polygon::new(octagon).unwrap()),
                    PhysicsMaterial::WOOD,
                ),
        );
        // A cut near one edge leaves a 9-gon on the far side
        let result = slice_body(&mut world, key, Vec2::new(-3.0, 1.7), Vec2::new(3.0, 1.75));
        assert!(matches!(result, Err(SliceError::TooManyVertices(9))));
    }
}
