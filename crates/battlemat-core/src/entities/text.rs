//! Floating text labels.

use super::EntityId;
use crate::geometry::point_in_rectangle;
use crate::text_metrics::TextMeasurer;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A positioned text bubble. `width`/`height` come from text measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub font_size: f64,
    pub width: f64,
    pub height: f64,
}

impl TextObject {
    /// Create a text object sized to its content plus padding.
    pub fn measured(
        id: EntityId,
        position: Point,
        content: String,
        font_size: f64,
        padding: (f64, f64),
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let mut text = Self {
            id,
            x: position.x,
            y: position.y,
            content,
            font_size,
            width: 0.0,
            height: 0.0,
        };
        text.remeasure(padding, measurer);
        text
    }

    /// Recompute `width`/`height` from the current content.
    pub fn remeasure(&mut self, padding: (f64, f64), measurer: &dyn TextMeasurer) {
        let size = measurer.measure(&self.content, self.font_size);
        self.width = size.width + padding.0 * 2.0;
        self.height = size.height + padding.1 * 2.0;
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn hit_test(&self, point: Point) -> bool {
        point_in_rectangle(point, self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::{ApproximateMeasurer, measure_text};

    #[test]
    fn test_measured_adds_padding() {
        let text = TextObject::measured(
            "t".into(),
            Point::new(10.0, 20.0),
            "Trap!".to_string(),
            16.0,
            (8.0, 4.0),
            &ApproximateMeasurer,
        );
        let size = measure_text("Trap!", 16.0);
        assert!((text.width - (size.width + 16.0)).abs() < 1e-10);
        assert!((text.height - (size.height + 8.0)).abs() < 1e-10);
        assert!(text.hit_test(Point::new(11.0, 21.0)));
        assert!(!text.hit_test(Point::new(9.0, 21.0)));
    }

    #[test]
    fn test_remeasure_on_content_change() {
        let mut text = TextObject::measured(
            "t".into(),
            Point::ZERO,
            "a".to_string(),
            16.0,
            (8.0, 4.0),
            &ApproximateMeasurer,
        );
        let before = text.width;
        text.content = "a much longer note".to_string();
        text.remeasure((8.0, 4.0), &ApproximateMeasurer);
        assert!(text.width > before);
    }
}
