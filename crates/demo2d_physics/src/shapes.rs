//! Collision shapes for 2D physics
//!
//! Shapes are stored in body-local coordinates; every query takes the body
//! transform and works in world space.

use demo2d_math::polygon::signed_area;
use demo2d_math::{Polygon, Transform2, Vec2};
use std::f32::consts::{FRAC_PI_2, PI};

/// Crossings closer than this along the ray are the same point (a vertex hit)
const CROSSING_TOLERANCE: f32 = 1.0e-6;

/// A circle defined by a local center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    /// Create a new circle at the given local center with the given radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// An axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest AABB containing both segment endpoints
    pub fn from_segment(p1: Vec2, p2: Vec2) -> Self {
        Self {
            min: p1.min_components(p2),
            max: p1.max_components(p2),
        }
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if two AABBs overlap (touching counts)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }
}

/// A 2D infinite line acting as a plane, defined by normal and distance from origin
///
/// The plane equation is: normal · point = distance.
/// Points with normal · point > distance are "above" the plane (positive side).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane2D {
    /// Unit normal vector pointing to the positive side
    pub normal: Vec2,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane2D {
    /// Create a new plane from a normal and distance
    ///
    /// The normal will be normalized automatically.
    pub fn new(normal: Vec2, distance: f32) -> Self {
        Self {
            normal: normal.normalized(),
            distance,
        }
    }

    /// Create a plane from a point on the plane and a normal
    pub fn from_point_normal(point: Vec2, normal: Vec2) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    /// Create a horizontal floor at the given Y height
    pub fn floor(y: f32) -> Self {
        Self::from_point_normal(Vec2::new(0.0, y), Vec2::Y)
    }

    /// Signed distance from a point to the plane (positive above)
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// One place where a segment crosses a shape boundary
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayCrossing {
    /// World-space crossing point
    pub point: Vec2,
    /// Outward surface normal at the crossing
    pub normal: Vec2,
    /// Normalized position along the segment (0 = start, 1 = end)
    pub fraction: f32,
}

/// Mass properties of a shape, relative to the body origin
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MassData {
    pub mass: f32,
    /// Center of mass in body-local coordinates
    pub center: Vec2,
    /// Rotational inertia about the body origin
    pub inertia: f32,
}

/// Collision shape attached to a body
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polygon(Polygon),
}

impl Shape {
    /// Circle centered on the body origin
    pub fn circle(radius: f32) -> Self {
        Shape::Circle(Circle::new(Vec2::ZERO, radius))
    }

    /// Box centered on the body origin
    pub fn rect(half_width: f32, half_height: f32) -> Self {
        Shape::Polygon(Polygon::rect(half_width, half_height))
    }

    /// World-space bounding box
    pub fn aabb(&self, xf: &Transform2) -> Aabb {
        match self {
            Shape::Circle(c) => {
                let center = xf.apply(c.center);
                Aabb::from_center_half_extents(center, Vec2::splat(c.radius))
            }
            Shape::Polygon(p) => {
                let (min, max) = p.transformed(xf).bounds();
                Aabb::new(min, max)
            }
        }
    }

    /// Test whether a world point lies inside the shape
    pub fn test_point(&self, xf: &Transform2, point: Vec2) -> bool {
        let local = xf.apply_inverse(point);
        match self {
            Shape::Circle(c) => (local - c.center).length_squared() <= c.radius * c.radius,
            Shape::Polygon(p) => p.contains(local),
        }
    }

    /// Mass properties for the given density
    pub fn mass_data(&self, density: f32) -> MassData {
        match self {
            Shape::Circle(c) => {
                let mass = density * PI * c.radius * c.radius;
                MassData {
                    mass,
                    center: c.center,
                    inertia: mass * (0.5 * c.radius * c.radius + c.center.length_squared()),
                }
            }
            Shape::Polygon(p) => {
                let m = p.moments();
                MassData {
                    mass: density * m.area,
                    center: m.centroid,
                    inertia: density * m.inertia,
                }
            }
        }
    }

    /// Every boundary crossing of the segment `p1 -> p2`, sorted by fraction
    ///
    /// A segment passing through a convex shape yields its entry and exit
    /// points; a segment starting or ending inside yields one.
    pub fn ray_crossings(&self, xf: &Transform2, p1: Vec2, p2: Vec2) -> Vec<RayCrossing> {
        let mut crossings = match self {
            Shape::Circle(c) => circle_crossings(xf.apply(c.center), c.radius, p1, p2),
            Shape::Polygon(p) => polygon_crossings(&p.transformed(xf), p1, p2),
        };

        crossings.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        crossings.dedup_by(|b, a| (b.fraction - a.fraction).abs() < CROSSING_TOLERANCE);
        crossings
    }

    /// Area and centroid of the part of the shape below a fluid surface
    ///
    /// The surface is `normal · p = offset` with the normal pointing out of
    /// the fluid. Returns `None` when the shape is dry.
    pub fn submerged(&self, xf: &Transform2, normal: Vec2, offset: f32) -> Option<(f32, Vec2)> {
        match self {
            Shape::Circle(c) => {
                let p = xf.apply(c.center);
                let r = c.radius;
                let depth = -(normal.dot(p) - offset);
                if depth < -r + f32::EPSILON {
                    return None;
                }
                if depth > r {
                    return Some((PI * r * r, p));
                }

                let r2 = r * r;
                let l2 = depth * depth;
                let area = r2 * ((depth / r).asin() + FRAC_PI_2) + depth * (r2 - l2).sqrt();
                let com = -2.0 / 3.0 * (r2 - l2).powf(1.5) / area;
                Some((area, p + normal * com))
            }
            Shape::Polygon(p) => {
                let wet = p.transformed(xf).clip_half_plane(normal, offset);
                if signed_area(&wet) <= f32::EPSILON {
                    return None;
                }
                let wet = Polygon::new(wet).ok()?;
                let m = wet.moments();
                Some((m.area, m.centroid))
            }
        }
    }
}

fn circle_crossings(center: Vec2, radius: f32, p1: Vec2, p2: Vec2) -> Vec<RayCrossing> {
    let s = p1 - center;
    let d = p2 - p1;
    let a = d.length_squared();
    if a < f32::EPSILON {
        return Vec::new();
    }

    let b = s.dot(d);
    let c = s.length_squared() - radius * radius;
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let root = discriminant.sqrt();
    [(-b - root) / a, (-b + root) / a]
        .into_iter()
        .filter(|t| (0.0..=1.0).contains(t))
        .map(|t| {
            let point = p1 + d * t;
            RayCrossing {
                point,
                normal: (point - center).normalized(),
                fraction: t,
            }
        })
        .collect()
}

fn polygon_crossings(polygon: &Polygon, p1: Vec2, p2: Vec2) -> Vec<RayCrossing> {
    let d = p2 - p1;
    let mut crossings = Vec::new();

    for (a, b) in polygon.edges() {
        let e = b - a;
        let denom = d.cross(e);
        if denom.abs() < f32::EPSILON {
            // Parallel edges never produce an isolated crossing
            continue;
        }

        let w = a - p1;
        let t = w.cross(e) / denom;
        let s = w.cross(d) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s) {
            crossings.push(RayCrossing {
                point: p1 + d * t,
                normal: Vec2::new(e.y, -e.x).normalized(),
                fraction: t,
            });
        }
    }

    crossings
}
