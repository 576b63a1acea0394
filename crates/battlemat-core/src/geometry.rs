//! Pure geometry helpers used for hit-testing and selection.
//!
//! Everything here works in a single coordinate space and has no side
//! effects, so callers decide whether points are SVG-space or grid-space.

use kurbo::{Point, Rect, Vec2};

/// Squared Euclidean distance between two points.
pub fn squared_distance(a: Point, b: Point) -> f64 {
    (a - b).hypot2()
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Distance from a point to the segment a→b.
///
/// The point is projected onto the segment and the projection is clamped to
/// the segment's endpoints. A degenerate segment behaves like a point.
pub fn point_to_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    distance(point, proj)
}

/// Whether `point` lies inside or exactly on the circle.
pub fn point_in_circle(point: Point, center: Point, radius: f64) -> bool {
    squared_distance(point, center) <= radius * radius
}

/// Inclusive containment test against an `x, y, width, height` rectangle.
pub fn point_in_rectangle(point: Point, x: f64, y: f64, width: f64, height: f64) -> bool {
    point.x >= x && point.x <= x + width && point.y >= y && point.y <= y + height
}

/// Axis-aligned overlap test.
///
/// Rectangles that merely share an edge do not intersect.
pub fn rects_intersect(r1: Rect, r2: Rect) -> bool {
    let r1 = r1.abs();
    let r2 = r2.abs();
    r1.x0 < r2.x1 && r1.x1 > r2.x0 && r1.y0 < r2.y1 && r1.y1 > r2.y0
}

/// Normalized rectangle spanned by two corner points.
pub fn rect_from_corners(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}

/// Scale `direction` to the given length. Zero vectors stay zero.
pub fn with_length(direction: Vec2, length: f64) -> Vec2 {
    let len = direction.hypot();
    if len < f64::EPSILON {
        return Vec2::ZERO;
    }
    direction * (length / len)
}
