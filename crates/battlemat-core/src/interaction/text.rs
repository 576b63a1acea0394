//! Type tool and the inline editing modes.

use super::{EngineContext, Gesture, InteractionEngine};
use crate::board::Board;
use crate::entities::{EntityId, TextObject, new_id};
use kurbo::Point;

/// What an open editor will write to when committed.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    /// A floating bubble that becomes a new text object.
    NewText { position: Point },
    Text(EntityId),
    TokenName(EntityId),
    ShapeLabel(EntityId),
}

/// Which editing mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingKind {
    TokenName,
    TextContent,
    ShapeLabel,
}

/// An open inline editor and its uncommitted value.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub target: EditTarget,
    pub value: String,
    /// Width of the entry bubble, grown to fit the value.
    pub width: f64,
}

impl EditSession {
    pub fn kind(&self) -> EditingKind {
        match self.target {
            EditTarget::NewText { .. } | EditTarget::Text(_) => EditingKind::TextContent,
            EditTarget::TokenName(_) => EditingKind::TokenName,
            EditTarget::ShapeLabel(_) => EditingKind::ShapeLabel,
        }
    }
}

impl InteractionEngine {
    pub fn editing_kind(&self) -> Option<EditingKind> {
        self.editing.as_ref().map(EditSession::kind)
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Type tool press: double-click edits a text object, a single click
    /// selects it, and empty space opens a new bubble.
    pub(super) fn text_pointer_down(&mut self, ctx: &EngineContext<'_>, point: Point, timestamp_ms: u64) {
        if let Some(text) = ctx.board.text_at(point) {
            let id = text.id.clone();
            let content = text.content.clone();
            if self.double_click.click(&id, timestamp_ms) {
                self.open_editor(EditTarget::Text(id), content);
            } else {
                self.selection.select_text(&id);
            }
            return;
        }
        self.double_click.reset();
        self.selection.clear();
        self.open_editor(EditTarget::NewText { position: point }, String::new());
    }

    /// Open the rename editor for a token.
    pub fn begin_token_rename(&mut self, board: &Board, id: &str) -> bool {
        let Some(token) = board.token(id) else {
            return false;
        };
        let name = token.display_name().to_string();
        self.gesture = Gesture::Idle;
        self.open_editor(EditTarget::TokenName(id.to_string()), name);
        true
    }

    /// Open the label editor for a shape.
    pub fn begin_shape_label_edit(&mut self, board: &Board, id: &str) -> bool {
        let Some(shape) = board.shape(id) else {
            return false;
        };
        let label = shape.label.clone().unwrap_or_default();
        self.gesture = Gesture::Idle;
        self.open_editor(EditTarget::ShapeLabel(id.to_string()), label);
        true
    }

    fn open_editor(&mut self, target: EditTarget, value: String) {
        let mut session = EditSession {
            target,
            value,
            width: self.config.text_min_width,
        };
        session.width = self.bubble_width(&session.value);
        log::debug!("Editing {:?}", session.kind());
        self.editing = Some(session);
    }

    /// Replace the editor's value as the user types.
    pub fn set_edit_value(&mut self, value: &str) {
        let width = self.bubble_width(value);
        if let Some(session) = self.editing.as_mut() {
            session.value = value.to_string();
            session.width = width;
        }
    }

    fn bubble_width(&self, value: &str) -> f64 {
        let measured = self.measurer.measure(value, self.tools.current_style.font_size).width;
        (measured + self.config.text_padding_x * 2.0).max(self.config.text_min_width)
    }

    fn padding(&self) -> (f64, f64) {
        (self.config.text_padding_x, self.config.text_padding_y)
    }

    /// Write the editor's value back. Empty text discards a new bubble
    /// and deletes an existing text object.
    pub fn commit_edit(&mut self, ctx: &mut EngineContext<'_>) {
        let Some(session) = self.editing.take() else {
            return;
        };
        let value = session.value.trim();
        match session.target {
            EditTarget::NewText { position } => {
                if value.is_empty() {
                    log::debug!("Discarded empty text draft");
                    return;
                }
                let text = TextObject::measured(
                    new_id(),
                    position,
                    value.to_string(),
                    self.tools.current_style.font_size,
                    self.padding(),
                    self.measurer.as_ref(),
                );
                self.selection.select_text(&text.id);
                ctx.board.add_text(text);
            }
            EditTarget::Text(id) => {
                if value.is_empty() {
                    ctx.board.remove_text(&id);
                    self.selection.texts.remove(&id);
                } else {
                    ctx.board
                        .set_text_content(&id, value, self.padding(), self.measurer.as_ref());
                }
            }
            EditTarget::TokenName(id) => {
                if let Err(err) = ctx.board.rename_token(&id, value) {
                    log::warn!("Rename failed: {err}");
                }
            }
            EditTarget::ShapeLabel(id) => {
                let label = (!value.is_empty()).then(|| value.to_string());
                ctx.board.update_shape(&id, |shape| shape.label = label);
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        if self.editing.take().is_some() {
            log::debug!("Edit cancelled");
        }
    }
}
