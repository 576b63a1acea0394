//! Interaction engine: turns pointer and keyboard input into board mutations.
//!
//! The engine owns only ephemeral state (the active gesture, selection, hover,
//! measurement and edit sessions). Persistent changes go through the
//! [`Board`] handed in with each event, so the caller decides when a change
//! is complete enough to snapshot.

mod draw;
mod cells;
mod select;
mod text;

pub use draw::{DraftShape, auto_label};
pub use cells::cells_on_line;
pub use select::{ShapeDrag, TextDrag, TokenDrag};
pub use text::{EditSession, EditTarget, EditingKind};

use crate::board::Board;
use crate::config::BoardConfig;
use crate::entities::{CellGrid, DrawnShape, SerializableColor};
use crate::icons::TokenTemplate;
use crate::input::{DoubleClickDetector, Key, KeyEvent, MouseButton, PointerEvent, PointerEventKind};
use crate::measurement::Measurement;
use crate::notify::Notifier;
use crate::selection::{Selection, SelectionRect};
use crate::snap::{GridPoint, clamp_footprint, svg_to_grid};
use crate::text_metrics::{ApproximateMeasurer, TextMeasurer};
use crate::tools::{ToolKind, ToolManager, ToolStyle};
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};

/// The collaborators an event may touch.
pub struct EngineContext<'a> {
    pub board: &'a mut Board,
    pub viewport: &'a mut Viewport,
    pub notifier: &'a mut dyn Notifier,
}

/// The single active pointer gesture.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Pan {
        last_screen: Point,
    },
    Paint {
        working: CellGrid,
        last_cell: GridPoint,
    },
    Erase {
        last_cell: GridPoint,
    },
    TokenDrag(TokenDrag),
    ShapeDrag(ShapeDrag),
    TextDrag(TextDrag),
    Marquee(SelectionRect),
    Draw(DraftShape),
    Measure,
}

/// Dispatches input events to the per-tool handlers.
pub struct InteractionEngine {
    config: BoardConfig,
    tools: ToolManager,
    gesture: Gesture,
    selection: Selection,
    hovered_cell: Option<GridPoint>,
    placement_preview: Option<GridPoint>,
    measurement: Option<Measurement>,
    editing: Option<EditSession>,
    double_click: DoubleClickDetector,
    measurer: Box<dyn TextMeasurer>,
}

impl InteractionEngine {
    pub fn new(config: &BoardConfig) -> Self {
        Self::with_measurer(config, Box::new(ApproximateMeasurer))
    }

    /// Use a renderer-backed text measurer instead of the approximation.
    pub fn with_measurer(config: &BoardConfig, measurer: Box<dyn TextMeasurer>) -> Self {
        let mut tools = ToolManager::new();
        tools.current_style.font_size = config.default_font_size;
        Self {
            config: config.clone(),
            tools,
            gesture: Gesture::Idle,
            selection: Selection::default(),
            hovered_cell: None,
            placement_preview: None,
            measurement: None,
            editing: None,
            double_click: DoubleClickDetector::new(config.double_click_ms),
            measurer,
        }
    }

    // --- state for renderers ---

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn style(&self) -> &ToolStyle {
        &self.tools.current_style
    }

    pub fn style_mut(&mut self) -> &mut ToolStyle {
        &mut self.tools.current_style
    }

    pub fn selected_template(&self) -> Option<&TokenTemplate> {
        self.tools.selected_template()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn hovered_cell(&self) -> Option<GridPoint> {
        self.hovered_cell
    }

    /// Footprint origin highlighted by the place-token tool.
    pub fn placement_preview(&self) -> Option<GridPoint> {
        self.placement_preview
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn marquee(&self) -> Option<&SelectionRect> {
        match &self.gesture {
            Gesture::Marquee(rect) => Some(rect),
            _ => None,
        }
    }

    pub fn token_drag(&self) -> Option<&TokenDrag> {
        match &self.gesture {
            Gesture::TokenDrag(drag) => Some(drag),
            _ => None,
        }
    }

    pub fn shape_drag(&self) -> Option<&ShapeDrag> {
        match &self.gesture {
            Gesture::ShapeDrag(drag) => Some(drag),
            _ => None,
        }
    }

    pub fn text_drag(&self) -> Option<&TextDrag> {
        match &self.gesture {
            Gesture::TextDrag(drag) => Some(drag),
            _ => None,
        }
    }

    /// The in-progress shape, styled as it would be committed.
    pub fn draft_shape(&self) -> Option<DrawnShape> {
        match &self.gesture {
            Gesture::Draw(draft) => Some(draft.to_shape(&self.tools.current_style)),
            _ => None,
        }
    }

    /// Cells to render: the paint working copy while a stroke is active.
    pub fn paint_preview(&self) -> Option<&CellGrid> {
        match &self.gesture {
            Gesture::Paint { working, .. } => Some(working),
            _ => None,
        }
    }

    /// Whether a gesture is in progress. Snapshots wait until it ends.
    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    // --- commands ---

    /// Switch tools, dropping every draft, the selection and the ruler.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if !self.tools.set_tool(tool) {
            return;
        }
        self.gesture = Gesture::Idle;
        self.editing = None;
        self.selection.clear();
        self.measurement = None;
        self.placement_preview = None;
        self.double_click.reset();
    }

    pub fn select_template(&mut self, template: Option<TokenTemplate>) {
        self.tools.select_template(template);
        self.placement_preview = None;
    }

    pub fn set_paint_color(&mut self, color: SerializableColor) {
        self.tools.current_style.paint_color = color;
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn clear_measurement(&mut self) {
        self.measurement = None;
    }

    /// Abandon the active gesture without committing it.
    pub fn cancel_gesture(&mut self) {
        if self.is_gesture_active() {
            log::debug!("Cancelled active gesture");
        }
        self.gesture = Gesture::Idle;
    }

    /// Drop all ephemeral state, keeping the tool and style.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.editing = None;
        self.selection.clear();
        self.measurement = None;
        self.hovered_cell = None;
        self.placement_preview = None;
        self.double_click.reset();
    }

    // --- input ---

    pub fn handle_pointer(&mut self, ctx: &mut EngineContext<'_>, event: &PointerEvent) {
        match event.kind {
            PointerEventKind::Down => self.pointer_down(ctx, event),
            PointerEventKind::Move => self.pointer_move(ctx, event),
            PointerEventKind::Up => self.pointer_up(ctx, event),
            PointerEventKind::Leave => self.pointer_leave(ctx, event),
            PointerEventKind::Wheel { delta } => self.wheel(ctx, event.position, delta),
        }
    }

    pub fn pointer_down(&mut self, ctx: &mut EngineContext<'_>, event: &PointerEvent) {
        // A press anywhere blurs an open editor, which commits it.
        if self.editing.is_some() {
            self.commit_edit(ctx);
            return;
        }
        if self.is_gesture_active() {
            return;
        }

        let tool = self.tools.current_tool;
        if tool == ToolKind::Select && event.is_pan_gesture() {
            self.gesture = Gesture::Pan {
                last_screen: event.position,
            };
            return;
        }
        if event.button != MouseButton::Left {
            return;
        }

        let point = ctx.viewport.screen_to_svg(event.position);
        self.gesture = match tool {
            ToolKind::Select => self.begin_select(ctx, point, event.modifiers.shift),
            ToolKind::Paint => self.begin_paint(ctx, point),
            ToolKind::Eraser => self.begin_erase(ctx, point),
            ToolKind::PlaceToken => {
                self.place_token(ctx, point);
                Gesture::Idle
            }
            ToolKind::MeasureDistance | ToolKind::MeasureRadius => self.begin_measure(ctx, point),
            ToolKind::DrawLine | ToolKind::DrawCircle | ToolKind::DrawRectangle => {
                self.begin_draw(ctx, point)
            }
            ToolKind::TypeText => {
                self.text_pointer_down(ctx, point, event.timestamp_ms);
                Gesture::Idle
            }
        };
    }

    pub fn pointer_move(&mut self, ctx: &mut EngineContext<'_>, event: &PointerEvent) {
        let point = ctx.viewport.screen_to_svg(event.position);
        self.update_hover(ctx, point);
        let gesture = std::mem::take(&mut self.gesture);
        self.gesture = self.advance(ctx, gesture, point, event.position);
    }

    pub fn pointer_up(&mut self, ctx: &mut EngineContext<'_>, event: &PointerEvent) {
        let point = ctx.viewport.screen_to_svg(event.position);
        let gesture = std::mem::take(&mut self.gesture);
        let gesture = self.advance(ctx, gesture, point, event.position);
        self.finish(ctx, gesture);
    }

    /// Leaving the surface ends the gesture as if the button were released.
    pub fn pointer_leave(&mut self, ctx: &mut EngineContext<'_>, event: &PointerEvent) {
        self.pointer_up(ctx, event);
        self.hovered_cell = None;
        self.placement_preview = None;
    }

    pub fn wheel(&mut self, ctx: &mut EngineContext<'_>, screen: Point, delta: Vec2) {
        if delta.y == 0.0 {
            return;
        }
        ctx.viewport.zoom_at(screen, delta.y < 0.0);
    }

    pub fn handle_key(&mut self, ctx: &mut EngineContext<'_>, event: &KeyEvent) {
        let KeyEvent::Pressed(key) = event else {
            return;
        };
        match key {
            Key::Escape => {
                if self.editing.is_some() {
                    self.cancel_edit();
                } else if self.is_gesture_active() {
                    self.cancel_gesture();
                } else {
                    self.selection.clear();
                    self.measurement = None;
                }
            }
            Key::Enter => {
                if self.editing.is_some() {
                    self.commit_edit(ctx);
                }
            }
            Key::Delete | Key::Backspace => {
                if self.editing.is_none() && !self.is_gesture_active() {
                    self.delete_selected(ctx.board);
                }
            }
            Key::Character(_) => {}
        }
    }

    /// Remove every selected entity. Returns how many were removed.
    pub fn delete_selected(&mut self, board: &mut Board) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let removed = board.delete_selection(&self.selection);
        log::info!("Deleted {removed} selected entities");
        self.selection.clear();
        removed
    }

    // --- gesture plumbing ---

    fn update_hover(&mut self, ctx: &EngineContext<'_>, point: Point) {
        let board = &*ctx.board;
        let cell = svg_to_grid(point, board.cell_size());
        self.hovered_cell = cell.in_bounds(board.cols(), board.rows()).then_some(cell);
        self.placement_preview = match (self.tools.current_tool, self.tools.selected_template(), self.hovered_cell) {
            (ToolKind::PlaceToken, Some(template), Some(cell)) => {
                Some(clamp_footprint(cell, template.size, board.cols(), board.rows()))
            }
            _ => None,
        };
    }

    fn advance(&mut self, ctx: &mut EngineContext<'_>, gesture: Gesture, point: Point, screen: Point) -> Gesture {
        match gesture {
            Gesture::Idle => Gesture::Idle,
            Gesture::Pan { last_screen } => {
                let delta = screen - last_screen;
                if delta != Vec2::ZERO {
                    ctx.viewport.pan_by(delta.x, delta.y);
                }
                Gesture::Pan { last_screen: screen }
            }
            Gesture::Paint { working, last_cell } => self.extend_paint(ctx, working, last_cell, point),
            Gesture::Erase { last_cell } => self.extend_erase(ctx, last_cell, point),
            Gesture::TokenDrag(drag) => Gesture::TokenDrag(self.update_token_drag(ctx, drag, point)),
            Gesture::ShapeDrag(drag) => Gesture::ShapeDrag(self.update_shape_drag(ctx, drag, point)),
            Gesture::TextDrag(drag) => Gesture::TextDrag(drag.update(point)),
            Gesture::Marquee(mut rect) => {
                rect.current = point;
                Gesture::Marquee(rect)
            }
            Gesture::Draw(draft) => Gesture::Draw(draft.update(point, ctx.board.cell_size())),
            Gesture::Measure => {
                self.update_measure(ctx, point);
                Gesture::Measure
            }
        }
    }

    fn finish(&mut self, ctx: &mut EngineContext<'_>, gesture: Gesture) {
        match gesture {
            Gesture::Idle | Gesture::Pan { .. } | Gesture::Erase { .. } | Gesture::Measure => {}
            Gesture::Paint { working, .. } => ctx.board.set_cells(working),
            Gesture::TokenDrag(drag) => self.finish_token_drag(ctx, drag),
            Gesture::ShapeDrag(drag) => self.finish_shape_drag(ctx, drag),
            Gesture::TextDrag(drag) => {
                ctx.board.move_text(&drag.text_id, drag.position);
            }
            Gesture::Marquee(rect) => {
                self.selection = ctx.board.entities_in_rect(rect.to_rect());
                log::debug!("Marquee selected {} entities", self.selection.len());
            }
            Gesture::Draw(draft) => self.commit_draft(ctx, draft),
        }
    }
}
