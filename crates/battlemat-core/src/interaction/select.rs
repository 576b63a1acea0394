//! Select tool: hit testing, dragging and marquee selection.

use super::{EngineContext, Gesture, InteractionEngine};
use crate::entities::{DrawnShape, EntityId};
use crate::geometry::squared_distance;
use crate::selection::{Selection, SelectionRect};
use crate::snap::{GridPoint, clamp_footprint};
use kurbo::{Point, Vec2};
use std::collections::HashSet;

/// A token following the pointer, snapped to the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDrag {
    pub token_id: EntityId,
    pub size: u32,
    /// Pointer offset from the token's top-left corner at press time.
    grab_offset: Vec2,
    origin: GridPoint,
    /// Snapped SVG-space top-left of the preview.
    pub position: Point,
    pub target: GridPoint,
    /// False when the target collides; drawn as "no drop".
    pub valid: bool,
}

/// A pressed shape. Becomes a real drag only past the movement threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDrag {
    pub shape_id: EntityId,
    press: Point,
    grab_offset: Vec2,
    pub engaged: bool,
    pub preview: Option<DrawnShape>,
}

/// A text object following the pointer freely.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDrag {
    pub text_id: EntityId,
    grab_offset: Vec2,
    pub position: Point,
}

impl TextDrag {
    pub(super) fn update(mut self, point: Point) -> Self {
        self.position = point - self.grab_offset;
        self
    }
}

impl InteractionEngine {
    /// Hit order: tokens, then text, then shapes topmost first.
    pub(super) fn begin_select(&mut self, ctx: &EngineContext<'_>, point: Point, additive: bool) -> Gesture {
        let board = &*ctx.board;
        let cell_size = board.cell_size();

        if let Some(token) = board.token_at(point) {
            self.select(additive, |s| &mut s.tokens, &token.id);
            let origin = token.origin();
            return Gesture::TokenDrag(TokenDrag {
                token_id: token.id.clone(),
                size: token.size,
                grab_offset: point - origin.to_svg(cell_size),
                origin,
                position: origin.to_svg(cell_size),
                target: origin,
                valid: true,
            });
        }

        if let Some(text) = board.text_at(point) {
            self.select(additive, |s| &mut s.texts, &text.id);
            return Gesture::TextDrag(TextDrag {
                text_id: text.id.clone(),
                grab_offset: point - text.position(),
                position: text.position(),
            });
        }

        if let Some(shape) = board.shape_at(point, self.config.line_hit_tolerance) {
            self.select(additive, |s| &mut s.shapes, &shape.id);
            if shape.is_locked {
                return Gesture::Idle;
            }
            return Gesture::ShapeDrag(ShapeDrag {
                shape_id: shape.id.clone(),
                press: point,
                grab_offset: point - shape.start_point,
                engaged: false,
                preview: None,
            });
        }

        if !additive {
            self.selection.clear();
        }
        Gesture::Marquee(SelectionRect::new(point))
    }

    fn select(
        &mut self,
        additive: bool,
        set: impl FnOnce(&mut Selection) -> &mut HashSet<EntityId>,
        id: &str,
    ) {
        if !additive {
            self.selection.clear();
        }
        set(&mut self.selection).insert(id.to_string());
    }

    pub(super) fn update_token_drag(&self, ctx: &EngineContext<'_>, mut drag: TokenDrag, point: Point) -> TokenDrag {
        let board = &*ctx.board;
        let cell_size = board.cell_size();
        let top_left = point - drag.grab_offset;
        let nearest = GridPoint::new(
            (top_left.x / cell_size).round() as i32,
            (top_left.y / cell_size).round() as i32,
        );
        drag.target = clamp_footprint(nearest, drag.size, board.cols(), board.rows());
        drag.position = drag.target.to_svg(cell_size);
        drag.valid = !board.is_occupied(drag.target, drag.size, Some(&drag.token_id));
        drag
    }

    pub(super) fn finish_token_drag(&mut self, ctx: &mut EngineContext<'_>, drag: TokenDrag) {
        if !drag.valid || drag.target == drag.origin {
            return;
        }
        if let Err(err) = ctx.board.move_token(&drag.token_id, drag.target) {
            log::warn!("Token drop rejected: {err}");
        }
    }

    pub(super) fn update_shape_drag(&self, ctx: &EngineContext<'_>, mut drag: ShapeDrag, point: Point) -> ShapeDrag {
        if !drag.engaged && squared_distance(point, drag.press) > self.config.drag_threshold_sq {
            drag.engaged = true;
        }
        if drag.engaged {
            drag.preview = ctx
                .board
                .shape(&drag.shape_id)
                .map(|shape| shape.moved_to(point - drag.grab_offset));
        }
        drag
    }

    pub(super) fn finish_shape_drag(&mut self, ctx: &mut EngineContext<'_>, drag: ShapeDrag) {
        if let Some(preview) = drag.preview.filter(|_| drag.engaged) {
            ctx.board.move_shape(&drag.shape_id, preview.start_point);
        }
    }
}
