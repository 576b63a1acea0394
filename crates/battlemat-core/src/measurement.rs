//! Distance and radius measurement between grid cells.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a measurement reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementKind {
    Distance,
    Radius,
}

impl MeasurementKind {
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::Distance => "Distance",
            MeasurementKind::Radius => "Radius",
        }
    }
}

/// Ephemeral ruler state. Never part of undo history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub kind: MeasurementKind,
    /// Cell-center points in SVG-space.
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
    pub result: Option<String>,
}

impl Measurement {
    pub fn start(kind: MeasurementKind, at: Point) -> Self {
        Self {
            kind,
            start_point: Some(at),
            end_point: Some(at),
            result: None,
        }
    }

    /// Move the end point and recompute the formatted result.
    pub fn update(&mut self, end: Point, cell_size: f64, feet_per_square: f64) {
        self.end_point = Some(end);
        if let Some(start) = self.start_point {
            let feet = grid_distance_feet(start, end, cell_size, feet_per_square);
            self.result = Some(format_measurement(self.kind, feet));
        }
    }
}

/// Euclidean distance in grid squares, converted to feet.
pub fn grid_distance_feet(start: Point, end: Point, cell_size: f64, feet_per_square: f64) -> f64 {
    let squares = (end - start).hypot() / cell_size;
    squares * feet_per_square
}

/// `"{Distance|Radius}: {feet} ft"` with feet rounded to one decimal.
pub fn format_measurement(kind: MeasurementKind, feet: f64) -> String {
    let rounded = (feet * 10.0).round() / 10.0;
    format!("{}: {} ft", kind.label(), rounded)
}
