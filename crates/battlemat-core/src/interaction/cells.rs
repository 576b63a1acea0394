//! Cell tools: paint strokes, the eraser and token placement.

use super::{EngineContext, Gesture, InteractionEngine};
use crate::entities::{CellGrid, cell_mut};
use crate::notify::Severity;
use crate::snap::{GridPoint, svg_to_grid};
use kurbo::Point;

/// Every cell a straight stroke from `from` to `to` passes through,
/// including both ends, so fast pointer moves leave no gaps.
pub fn cells_on_line(from: GridPoint, to: GridPoint) -> Vec<GridPoint> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut current = from;
    let mut cells = vec![current];
    while current != to {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.x += sx;
        }
        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
        cells.push(current);
    }
    cells
}

impl InteractionEngine {
    /// Start a stroke on a working copy of the cells. The board is only
    /// written when the stroke ends.
    pub(super) fn begin_paint(&mut self, ctx: &EngineContext<'_>, point: Point) -> Gesture {
        let cell = svg_to_grid(point, ctx.board.cell_size());
        let mut working = ctx.board.cells().clone();
        self.paint_cells(&mut working, &[cell]);
        Gesture::Paint {
            working,
            last_cell: cell,
        }
    }

    pub(super) fn extend_paint(
        &mut self,
        ctx: &EngineContext<'_>,
        mut working: CellGrid,
        last_cell: GridPoint,
        point: Point,
    ) -> Gesture {
        let cell = svg_to_grid(point, ctx.board.cell_size());
        if cell != last_cell {
            self.paint_cells(&mut working, &cells_on_line(last_cell, cell));
        }
        Gesture::Paint {
            working,
            last_cell: cell,
        }
    }

    fn paint_cells(&self, working: &mut CellGrid, cells: &[GridPoint]) {
        let color = self.tools.current_style.paint_color;
        for &at in cells {
            if let Some(cell) = cell_mut(working, at) {
                cell.color = Some(color);
            }
        }
    }

    pub(super) fn begin_erase(&mut self, ctx: &mut EngineContext<'_>, point: Point) -> Gesture {
        let cell = svg_to_grid(point, ctx.board.cell_size());
        ctx.board.erase_at(cell, self.config.line_hit_tolerance);
        Gesture::Erase { last_cell: cell }
    }

    pub(super) fn extend_erase(&mut self, ctx: &mut EngineContext<'_>, last_cell: GridPoint, point: Point) -> Gesture {
        let cell = svg_to_grid(point, ctx.board.cell_size());
        if cell != last_cell {
            for at in cells_on_line(last_cell, cell).into_iter().skip(1) {
                ctx.board.erase_at(at, self.config.line_hit_tolerance);
            }
        }
        Gesture::Erase { last_cell: cell }
    }

    /// Stamp the selected template at the clicked cell, or the nearest
    /// free square when it is taken.
    pub(super) fn place_token(&mut self, ctx: &mut EngineContext<'_>, point: Point) {
        let Some(template) = self.tools.selected_template().cloned() else {
            log::debug!("Place token ignored: no template selected");
            return;
        };
        let cell = svg_to_grid(point, ctx.board.cell_size());
        if let Err(err) = ctx.board.place_token(&template, cell) {
            log::warn!("Token placement failed: {err}");
            ctx.notifier.notify(err.title(), &err.to_string(), Severity::Error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;
    use crate::entities::{SerializableColor, ShapeKind, TokenKind, DrawnShape, new_id};
    use crate::icons::TokenTemplate;
    use crate::input::PointerEvent;
    use crate::tools::ToolKind;

    #[test]
    fn test_cells_on_line_diagonal() {
        let cells = cells_on_line(GridPoint::new(0, 0), GridPoint::new(3, 3));
        assert_eq!(
            cells,
            vec![
                GridPoint::new(0, 0),
                GridPoint::new(1, 1),
                GridPoint::new(2, 2),
                GridPoint::new(3, 3)
            ]
        );
    }

    #[test]
    fn test_cells_on_line_has_no_gaps() {
        let cells = cells_on_line(GridPoint::new(0, 0), GridPoint::new(5, 2));
        assert_eq!(cells.first(), Some(&GridPoint::new(0, 0)));
        assert_eq!(cells.last(), Some(&GridPoint::new(5, 2)));
        for pair in cells.windows(2) {
            assert!((pair[1].x - pair[0].x).abs() <= 1);
            assert!((pair[1].y - pair[0].y).abs() <= 1);
        }
    }

    #[test]
    fn test_paint_commits_on_release() {
        let mut h = Harness::new();
        h.engine.set_tool(ToolKind::Paint);
        let revision = h.board.revision();
        h.send(PointerEvent::down(Point::new(15.0, 15.0)));
        h.send(PointerEvent::moved(Point::new(105.0, 15.0)));
        // Nothing lands on the board mid-stroke.
        assert_eq!(h.board.revision(), revision);
        assert!(h.board.cell_color(GridPoint::new(2, 0)).is_none());
        h.send(PointerEvent::up(Point::new(105.0, 15.0)));
        for x in 0..=3 {
            assert!(h.board.cell_color(GridPoint::new(x, 0)).is_some());
        }
        assert!(h.board.cell_color(GridPoint::new(4, 0)).is_none());
    }

    #[test]
    fn test_paint_ignores_out_of_grid_cells() {
        let mut h = Harness::new();
        h.engine.set_tool(ToolKind::Paint);
        h.drag((285.0, 15.0), (400.0, 15.0));
        assert!(h.board.cell_color(GridPoint::new(9, 0)).is_some());
    }

    #[test]
    fn test_eraser_clears_cells_and_entities() {
        let mut h = Harness::new();
        h.board.set_cell_color(GridPoint::new(1, 1), Some(SerializableColor::blue()));
        let template = TokenTemplate::new(TokenKind::Enemy, "Goblin", SerializableColor::red(), 1, "goblin");
        h.board.place_token(&template, GridPoint::new(2, 1)).unwrap();
        h.board.add_shape(DrawnShape::new(
            new_id(),
            ShapeKind::Line,
            Point::new(90.0, 0.0),
            Point::new(90.0, 300.0),
            SerializableColor::black(),
        ));

        h.engine.set_tool(ToolKind::Eraser);
        h.drag((45.0, 45.0), (105.0, 45.0));
        assert!(h.board.cell_color(GridPoint::new(1, 1)).is_none());
        assert!(h.board.tokens().is_empty());
        assert_eq!(h.board.shapes().len(), 1);
    }

    #[test]
    fn test_place_token_reports_no_space() {
        let mut h = Harness::new();
        h.engine.set_tool(ToolKind::PlaceToken);
        h.engine.select_template(Some(TokenTemplate::new(
            TokenKind::Enemy,
            "Titan",
            SerializableColor::red(),
            11,
            "titan",
        )));
        h.send(PointerEvent::down(Point::new(15.0, 15.0)));
        h.send(PointerEvent::up(Point::new(15.0, 15.0)));
        assert!(h.board.tokens().is_empty());
        let notes = h.notes.drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);
    }

    #[test]
    fn test_place_token_preview_clamped() {
        let mut h = Harness::new();
        h.engine.set_tool(ToolKind::PlaceToken);
        h.engine.select_template(Some(TokenTemplate::new(
            TokenKind::Enemy,
            "Ogre",
            SerializableColor::red(),
            2,
            "ogre",
        )));
        h.send(PointerEvent::moved(Point::new(295.0, 295.0)));
        assert_eq!(h.engine.placement_preview(), Some(GridPoint::new(8, 8)));
    }
}
