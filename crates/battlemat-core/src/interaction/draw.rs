//! Drawing and measuring tools.

use super::{EngineContext, Gesture, InteractionEngine};
use crate::entities::{DrawnShape, ShapeKind, new_id};
use crate::measurement::Measurement;
use crate::snap::{snap_circle_edge, snap_to_cell_center, snap_to_vertex};
use crate::tools::ToolStyle;
use kurbo::Point;

/// Id carried by the preview shape before it is committed.
const DRAFT_ID: &str = "draft";

/// An in-progress shape with its snapped points.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftShape {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
}

impl DraftShape {
    /// Lines and rectangles anchor on a vertex, circles on a cell center.
    pub fn begin(kind: ShapeKind, point: Point, cell_size: f64) -> Self {
        let start = match kind {
            ShapeKind::Line | ShapeKind::Rectangle => snap_to_vertex(point, cell_size),
            ShapeKind::Circle => snap_to_cell_center(point, cell_size),
        };
        Self {
            kind,
            start,
            end: start,
        }
    }

    pub fn update(mut self, point: Point, cell_size: f64) -> Self {
        self.end = match self.kind {
            ShapeKind::Line => point,
            ShapeKind::Rectangle => snap_to_vertex(point, cell_size),
            ShapeKind::Circle => snap_circle_edge(self.start, point, cell_size),
        };
        self
    }

    pub fn to_shape(&self, style: &ToolStyle) -> DrawnShape {
        let mut shape = DrawnShape::new(DRAFT_ID.to_string(), self.kind, self.start, self.end, style.stroke_color);
        shape.fill_color = style.fill_color;
        shape.stroke_width = style.stroke_width;
        shape
    }
}

/// Dimension label in feet for rectangles and circles. Lines get none.
pub fn auto_label(shape: &DrawnShape, cell_size: f64, feet_per_square: f64) -> Option<String> {
    let feet = |px: f64| ((px / cell_size) * feet_per_square * 10.0).round() / 10.0;
    match shape.kind {
        ShapeKind::Line => None,
        ShapeKind::Rectangle => {
            let bounds = shape.bounds();
            Some(format!("{} ft x {} ft", feet(bounds.width()), feet(bounds.height())))
        }
        ShapeKind::Circle => Some(format!("{} ft radius", feet(shape.radius()))),
    }
}

impl InteractionEngine {
    pub(super) fn begin_draw(&mut self, ctx: &EngineContext<'_>, point: Point) -> Gesture {
        match self.tools.current_tool.shape_kind() {
            Some(kind) => Gesture::Draw(DraftShape::begin(kind, point, ctx.board.cell_size())),
            None => Gesture::Idle,
        }
    }

    /// Commit a draft unless it is smaller than half a cell.
    pub(super) fn commit_draft(&mut self, ctx: &mut EngineContext<'_>, draft: DraftShape) {
        let cell_size = ctx.board.cell_size();
        let mut shape = draft.to_shape(&self.tools.current_style);
        if shape.extent() < cell_size / 2.0 {
            log::debug!("Discarded {:?} smaller than half a cell", shape.kind);
            return;
        }
        shape.id = new_id();
        shape.label = auto_label(&shape, cell_size, self.config.feet_per_square);
        log::info!("Drew {:?} {}", shape.kind, shape.id);
        ctx.board.add_shape(shape);
    }

    pub(super) fn begin_measure(&mut self, ctx: &EngineContext<'_>, point: Point) -> Gesture {
        let Some(kind) = self.tools.current_tool.measurement_kind() else {
            return Gesture::Idle;
        };
        let start = snap_to_cell_center(point, ctx.board.cell_size());
        self.measurement = Some(Measurement::start(kind, start));
        Gesture::Measure
    }

    pub(super) fn update_measure(&mut self, ctx: &EngineContext<'_>, point: Point) {
        let cell_size = ctx.board.cell_size();
        if let Some(measurement) = self.measurement.as_mut() {
            let end = snap_to_cell_center(point, cell_size);
            measurement.update(end, cell_size, self.config.feet_per_square);
        }
    }
}
