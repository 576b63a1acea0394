//! Drawn shapes: lines, circles and rectangles in SVG-space.

use super::{EntityId, SerializableColor};
use crate::geometry::{
    distance, point_in_circle, point_in_rectangle, point_to_segment_distance, rect_from_corners,
    rects_intersect,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Geometry interpretation of a shape's two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// `start`/`end` are the endpoints.
    Line,
    /// `start` is the center, `end` lies on the edge.
    Circle,
    /// `start`/`end` are opposite corners.
    Rectangle,
}

/// A shape drawn on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawnShape {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub start_point: Point,
    pub end_point: Point,
    pub color: SerializableColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<SerializableColor>,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DrawnShape {
    /// Default stroke width for new shapes.
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

    pub fn new(id: EntityId, kind: ShapeKind, start: Point, end: Point, color: SerializableColor) -> Self {
        Self {
            id,
            kind,
            start_point: start,
            end_point: end,
            color,
            fill_color: None,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            opacity: None,
            is_locked: false,
            label: None,
        }
    }

    /// Circle radius (distance from center to edge point).
    pub fn radius(&self) -> f64 {
        distance(self.start_point, self.end_point)
    }

    /// Characteristic size used for the minimum-size rule: line length,
    /// rectangle diagonal or circle radius.
    pub fn extent(&self) -> f64 {
        distance(self.start_point, self.end_point)
    }

    /// Axis-aligned bounds in SVG-space.
    pub fn bounds(&self) -> Rect {
        match self.kind {
            ShapeKind::Line | ShapeKind::Rectangle => rect_from_corners(self.start_point, self.end_point),
            ShapeKind::Circle => {
                let r = self.radius();
                Rect::new(
                    self.start_point.x - r,
                    self.start_point.y - r,
                    self.start_point.x + r,
                    self.start_point.y + r,
                )
            }
        }
    }

    /// Whether a point hits this shape. Lines use `line_tolerance` pixels.
    pub fn hit_test(&self, point: Point, line_tolerance: f64) -> bool {
        match self.kind {
            ShapeKind::Line => {
                point_to_segment_distance(point, self.start_point, self.end_point) <= line_tolerance
            }
            ShapeKind::Circle => point_in_circle(point, self.start_point, self.radius()),
            ShapeKind::Rectangle => {
                let rect = self.bounds();
                point_in_rectangle(point, rect.x0, rect.y0, rect.width(), rect.height())
            }
        }
    }

    /// Marquee inclusion: lines by an endpoint inside the marquee, circles
    /// and rectangles by bounding-box overlap.
    pub fn intersects_marquee(&self, marquee: Rect) -> bool {
        match self.kind {
            ShapeKind::Line => {
                let m = marquee.abs();
                [self.start_point, self.end_point]
                    .iter()
                    .any(|p| point_in_rectangle(*p, m.x0, m.y0, m.width(), m.height()))
            }
            ShapeKind::Circle | ShapeKind::Rectangle => rects_intersect(marquee, self.bounds()),
        }
    }

    /// Move both points by the same delta, keeping the shape's dimensions.
    pub fn translate(&mut self, delta: Vec2) {
        self.start_point += delta;
        self.end_point += delta;
    }

    /// A copy moved so that `start_point` lands on `new_start`.
    pub fn moved_to(&self, new_start: Point) -> Self {
        let mut moved = self.clone();
        moved.translate(new_start - self.start_point);
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(kind: ShapeKind, start: (f64, f64), end: (f64, f64)) -> DrawnShape {
        DrawnShape::new(
            "s".into(),
            kind,
            Point::new(start.0, start.1),
            Point::new(end.0, end.1),
            SerializableColor::black(),
        )
    }

    #[test]
    fn test_line_hit_tolerance() {
        let line = shape(ShapeKind::Line, (0.0, 0.0), (100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 8.0), 8.0));
        assert!(!line.hit_test(Point::new(50.0, 8.5), 8.0));
        assert!(!line.hit_test(Point::new(110.0, 0.0), 8.0));
    }

    #[test]
    fn test_circle_hit_boundary() {
        let circle = shape(ShapeKind::Circle, (50.0, 50.0), (80.0, 50.0));
        assert!(circle.hit_test(Point::new(50.0, 80.0), 8.0));
        assert!(!circle.hit_test(Point::new(50.0, 80.001), 8.0));
    }

    #[test]
    fn test_rectangle_hit_with_inverted_corners() {
        let rect = shape(ShapeKind::Rectangle, (90.0, 90.0), (30.0, 30.0));
        assert!(rect.hit_test(Point::new(30.0, 60.0), 0.0));
        assert!(!rect.hit_test(Point::new(29.0, 60.0), 0.0));
    }

    #[test]
    fn test_circle_bounds() {
        let circle = shape(ShapeKind::Circle, (50.0, 50.0), (50.0, 20.0));
        assert_eq!(circle.bounds(), Rect::new(20.0, 20.0, 80.0, 80.0));
    }

    #[test]
    fn test_marquee_line_needs_endpoint_inside() {
        let line = shape(ShapeKind::Line, (-50.0, 30.0), (150.0, 30.0));
        // Crosses the marquee but neither endpoint is inside
        assert!(!line.intersects_marquee(Rect::new(0.0, 0.0, 60.0, 60.0)));
        assert!(line.intersects_marquee(Rect::new(100.0, 0.0, 160.0, 60.0)));
    }

    #[test]
    fn test_marquee_circle_by_bounds() {
        let circle = shape(ShapeKind::Circle, (100.0, 100.0), (130.0, 100.0));
        assert!(circle.intersects_marquee(Rect::new(0.0, 0.0, 80.0, 80.0)));
        assert!(!circle.intersects_marquee(Rect::new(0.0, 0.0, 60.0, 60.0)));
    }

    #[test]
    fn test_translate_keeps_dimensions() {
        let rect = shape(ShapeKind::Rectangle, (0.0, 0.0), (60.0, 30.0));
        let moved = rect.moved_to(Point::new(15.0, 45.0));
        assert_eq!(moved.start_point, Point::new(15.0, 45.0));
        assert_eq!(moved.end_point, Point::new(75.0, 75.0));
        assert!((moved.extent() - rect.extent()).abs() < 1e-10);
    }
}
