//! Convex polygon geometry
//!
//! Polygons are stored counter-clockwise. Besides area/centroid/inertia for
//! mass computation, this module provides the half-plane clipping used both
//! for slicing a polygon along a line and for computing the part of a shape
//! that lies below a fluid surface.

use crate::{Transform2, Vec2};
use std::fmt;

/// Vertices closer than this are welded together after clipping
pub const WELD_TOLERANCE: f32 = 1.0e-4;

/// Polygons with an absolute area below this are considered degenerate
pub const MIN_AREA: f32 = 1.0e-6;

/// Error building a polygon from raw vertices
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonError {
    /// Fewer than three distinct vertices
    TooFewVertices(usize),
    /// Vertices are (nearly) collinear
    Degenerate,
    /// Vertices do not describe a convex outline
    NotConvex,
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonError::TooFewVertices(n) => {
                write!(f, "polygon needs at least 3 vertices, got {}", n)
            }
            PolygonError::Degenerate => write!(f, "polygon has no area"),
            PolygonError::NotConvex => write!(f, "polygon is not convex"),
        }
    }
}

impl std::error::Error for PolygonError {}

/// Area moments of a polygon per unit density
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonMoments {
    /// Enclosed area
    pub area: f32,
    /// Centroid of the area
    pub centroid: Vec2,
    /// Polar second moment of area about the origin
    pub inertia: f32,
}

/// A convex polygon with counter-clockwise winding
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    /// Build a convex polygon from an outline
    ///
    /// Near-duplicate vertices are welded and clockwise input is reversed.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, PolygonError> {
        let mut vertices = weld(vertices);
        if vertices.len() < 3 {
            return Err(PolygonError::TooFewVertices(vertices.len()));
        }

        let area = signed_area(&vertices);
        if area.abs() < MIN_AREA {
            return Err(PolygonError::Degenerate);
        }
        if area < 0.0 {
            vertices.reverse();
        }

        let polygon = Self { vertices };
        if !polygon.is_convex() {
            return Err(PolygonError::NotConvex);
        }
        Ok(polygon)
    }

    /// Axis-aligned box centered on the origin
    pub fn rect(half_width: f32, half_height: f32) -> Self {
        Self {
            vertices: vec![
                Vec2::new(-half_width, -half_height),
                Vec2::new(half_width, -half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(-half_width, half_height),
            ],
        }
    }

    /// Oriented box centered on `center`, rotated by `angle`
    pub fn oriented_rect(half_width: f32, half_height: f32, center: Vec2, angle: f32) -> Self {
        let xf = Transform2::new(center, angle);
        let mut rect = Self::rect(half_width, half_height);
        for v in &mut rect.vertices {
            *v = xf.apply(*v);
        }
        rect
    }

    /// Vertices in counter-clockwise order
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Number of vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for a constructed polygon, provided for API symmetry
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over edges as `(start, end)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Enclosed area
    pub fn area(&self) -> f32 {
        signed_area(&self.vertices)
    }

    /// Area, centroid and polar second moment of area about the origin
    ///
    /// Triangulates as a fan from the first vertex to keep the integration
    /// well conditioned when the polygon is far from the origin.
    pub fn moments(&self) -> PolygonMoments {
        let s = self.vertices[0];
        let mut area = 0.0;
        let mut center = Vec2::ZERO;
        let mut inertia = 0.0;
        const INV3: f32 = 1.0 / 3.0;

        for i in 1..self.vertices.len() - 1 {
            let e1 = self.vertices[i] - s;
            let e2 = self.vertices[i + 1] - s;
            let d = e1.cross(e2);

            let triangle_area = 0.5 * d;
            area += triangle_area;
            center += (e1 + e2) * (triangle_area * INV3);

            let int_x2 = e1.x * e1.x + e2.x * e1.x + e2.x * e2.x;
            let int_y2 = e1.y * e1.y + e2.y * e1.y + e2.y * e2.y;
            inertia += (0.25 * INV3 * d) * (int_x2 + int_y2);
        }

        let local_center = center / area;
        let centroid = s + local_center;
        // Shift from the fan apex to the origin via the centroid
        let inertia = inertia + area * (centroid.dot(centroid) - local_center.dot(local_center));

        PolygonMoments { area, centroid, inertia }
    }

    /// Centroid of the enclosed area
    pub fn centroid(&self) -> Vec2 {
        self.moments().centroid
    }

    /// Point containment (boundary counts as inside)
    pub fn contains(&self, p: Vec2) -> bool {
        self.edges().all(|(a, b)| (b - a).cross(p - a) >= 0.0)
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices[1..] {
            min = min.min_components(*v);
            max = max.max_components(*v);
        }
        (min, max)
    }

    /// Copy of this polygon with every vertex transformed
    pub fn transformed(&self, xf: &Transform2) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| xf.apply(*v)).collect(),
        }
    }

    /// Keep the part of the polygon where `normal · p <= offset`
    ///
    /// Returns the raw clipped outline, which may have fewer than three
    /// vertices when the polygon lies entirely on the discarded side.
    pub fn clip_half_plane(&self, normal: Vec2, offset: f32) -> Vec<Vec2> {
        let n = self.vertices.len();
        let mut out = Vec::with_capacity(n + 1);

        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let da = normal.dot(a) - offset;
            let db = normal.dot(b) - offset;

            if da <= 0.0 {
                out.push(a);
            }
            if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
                let t = da / (da - db);
                out.push(a + (b - a) * t);
            }
        }

        weld(out)
    }

    /// Split the polygon along the infinite line through `a` and `b`
    ///
    /// Returns `(left, right)` relative to the direction `a -> b`. Fails when
    /// the line does not pass through the interior.
    pub fn split_by_line(&self, a: Vec2, b: Vec2) -> Result<(Polygon, Polygon), PolygonError> {
        let direction = b - a;
        if direction.length_squared() < WELD_TOLERANCE * WELD_TOLERANCE {
            return Err(PolygonError::Degenerate);
        }

        let n = direction.perp().normalized();
        let offset = n.dot(a);

        let right = Polygon::new(self.clip_half_plane(n, offset))?;
        let left = Polygon::new(self.clip_half_plane(-n, -offset))?;
        Ok((left, right))
    }

    fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        (0..n).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            (b - a).cross(c - b) >= -MIN_AREA
        })
    }
}

/// Shoelace signed area (positive for counter-clockwise outlines)
pub fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| vertices[i].cross(vertices[(i + 1) % n]))
        .sum();
    0.5 * twice
}

fn weld(vertices: Vec<Vec2>) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if out.last().map_or(true, |last| last.distance(v) > WELD_TOLERANCE) {
            out.push(v);
        }
    }
    while out.len() > 1 && out[0].distance(out[out.len() - 1]) <= WELD_TOLERANCE {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_rect_area_and_centroid() {
        let rect = Polygon::rect(1.0, 0.5);
        assert!(approx(rect.area(), 2.0));
        let c = rect.centroid();
        assert!(approx(c.x, 0.0) && approx(c.y, 0.0));
    }

    #[test]
    fn test_clockwise_input_is_reversed() {
        let cw = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];
        let polygon = Polygon::new(cw).unwrap();
        assert!(polygon.area() > 0.0);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert_eq!(
            Polygon::new(vec![Vec2::ZERO, Vec2::X]),
            Err(PolygonError::TooFewVertices(2))
        );
        assert_eq!(
            Polygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)]),
            Err(PolygonError::Degenerate)
        );
    }

    #[test]
    fn test_rejects_concave_outline() {
        let arrow = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 0.5),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert_eq!(Polygon::new(arrow), Err(PolygonError::NotConvex));
    }

    #[test]
    fn test_inertia_of_unit_square() {
        // Square of side 1 centered on the origin: J = (b h^3 + h b^3) / 12 = 1/6
        let square = Polygon::rect(0.5, 0.5);
        let m = square.moments();
        assert!(approx(m.area, 1.0));
        assert!(approx(m.inertia, 1.0 / 6.0));
    }

    #[test]
    fn test_inertia_parallel_axis() {
        let offset = Vec2::new(3.0, 0.0);
        let square = Polygon::oriented_rect(0.5, 0.5, offset, 0.0);
        let m = square.moments();
        assert!(approx(m.centroid.x, 3.0));
        assert!(approx(m.inertia, 1.0 / 6.0 + 9.0));
    }

    #[test]
    fn test_contains() {
        let rect = Polygon::rect(1.0, 1.0);
        assert!(rect.contains(Vec2::ZERO));
        assert!(rect.contains(Vec2::new(1.0, 0.0)));
        assert!(!rect.contains(Vec2::new(1.1, 0.0)));
    }

    #[test]
    fn test_clip_half_plane_keeps_lower_half() {
        let rect = Polygon::rect(1.0, 1.0);
        let lower = rect.clip_half_plane(Vec2::Y, 0.0);
        assert_eq!(lower.len(), 4);
        assert!(approx(signed_area(&lower), 2.0));
        assert!(lower.iter().all(|v| v.y <= 0.0));
    }

    #[test]
    fn test_clip_half_plane_discards_everything() {
        let rect = Polygon::rect(1.0, 1.0);
        assert!(rect.clip_half_plane(Vec2::Y, -5.0).is_empty());
    }

    #[test]
    fn test_split_by_vertical_line() {
        let rect = Polygon::rect(2.0, 1.0);
        let (left, right) = rect
            .split_by_line(Vec2::new(0.5, -5.0), Vec2::new(0.5, 5.0))
            .unwrap();
        // Going up, "left" is -X
        assert!(approx(left.area(), 2.5 * 2.0));
        assert!(approx(right.area(), 1.5 * 2.0));
        assert!(left.centroid().x < right.centroid().x);
    }

    #[test]
    fn test_split_through_vertices() {
        let rect = Polygon::rect(1.0, 1.0);
        let (left, right) = rect
            .split_by_line(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))
            .unwrap();
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 3);
        assert!(approx(left.area(), 2.0));
        assert!(approx(right.area(), 2.0));
    }

    #[test]
    fn test_split_missing_line_fails() {
        let rect = Polygon::rect(1.0, 1.0);
        let result = rect.split_by_line(Vec2::new(5.0, -1.0), Vec2::new(5.0, 1.0));
        assert!(result.is_err());
    }
}
