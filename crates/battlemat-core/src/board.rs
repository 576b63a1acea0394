//! Board state store: the single owner of all persistent entities.
//!
//! Every mutation goes through a method here and bumps the board revision,
//! which is what the session watches to feed the undo history.

use crate::config::BoardConfig;
use crate::entities::{
    CellGrid, DrawnShape, EntityId, Participant, SerializableColor, TextObject, Token, TokenKind,
    cell_at, cell_mut, empty_grid, has_dimensions, new_id, sort_turn_order,
};
use crate::error::{BoardError, BoardResult};
use crate::icons::TokenTemplate;
use crate::occupancy::{find_available_square, find_invalid_token, is_square_occupied};
use crate::selection::Selection;
use crate::snap::GridPoint;
use crate::text_metrics::TextMeasurer;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A deep copy of all persistent entities; the unit of undo/redo and the
/// persisted JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoableState {
    pub cells: CellGrid,
    pub tokens: Vec<Token>,
    pub shapes: Vec<DrawnShape>,
    pub text_objects: Vec<TextObject>,
    pub participants: Vec<Participant>,
}

impl UndoableState {
    /// An uncolored grid with no entities.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            cells: empty_grid(rows, cols),
            tokens: Vec::new(),
            shapes: Vec::new(),
            text_objects: Vec::new(),
            participants: Vec::new(),
        }
    }
}

/// Holds the board's entities and exposes the setters used by the
/// interaction engine and page-level commands.
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    cell_size: f64,
    state: UndoableState,
    revision: u64,
}

impl Board {
    /// Create an empty board for the configured grid.
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            rows: config.rows,
            cols: config.cols,
            cell_size: config.cell_size,
            state: UndoableState::empty(config.rows, config.cols),
            revision: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Monotonic counter bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn cells(&self) -> &CellGrid {
        &self.state.cells
    }

    pub fn tokens(&self) -> &[Token] {
        &self.state.tokens
    }

    pub fn shapes(&self) -> &[DrawnShape] {
        &self.state.shapes
    }

    pub fn text_objects(&self) -> &[TextObject] {
        &self.state.text_objects
    }

    pub fn participants(&self) -> &[Participant] {
        &self.state.participants
    }

    pub fn token(&self, id: &str) -> Option<&Token> {
        self.state.tokens.iter().find(|t| t.id == id)
    }

    pub fn shape(&self, id: &str) -> Option<&DrawnShape> {
        self.state.shapes.iter().find(|s| s.id == id)
    }

    pub fn text_object(&self, id: &str) -> Option<&TextObject> {
        self.state.text_objects.iter().find(|t| t.id == id)
    }

    /// Deep copy of the current entities.
    pub fn snapshot(&self) -> UndoableState {
        self.state.clone()
    }

    /// Replace all entities with a snapshot.
    ///
    /// A snapshot whose grid does not match the board's dimensions, or whose
    /// tokens break occupancy, is rejected and the board is left unchanged.
    pub fn restore(&mut self, snapshot: &UndoableState) -> bool {
        if !has_dimensions(&snapshot.cells, self.rows, self.cols) {
            log::warn!(
                "Ignoring snapshot with mismatched grid (expected {}x{})",
                self.cols,
                self.rows
            );
            return false;
        }
        if let Some(token) = find_invalid_token(&snapshot.tokens, self.cols, self.rows) {
            log::warn!("Ignoring snapshot: token {} does not fit the board", token.id);
            return false;
        }
        self.state = snapshot.clone();
        self.touch();
        true
    }

    /// Remove every entity and uncolor every cell.
    pub fn clear(&mut self) {
        self.state = UndoableState::empty(self.rows, self.cols);
        self.touch();
    }

    // --- cells ---

    /// Replace the whole cell grid (commit of a paint gesture).
    pub fn set_cells(&mut self, cells: CellGrid) {
        if !has_dimensions(&cells, self.rows, self.cols) || cells == self.state.cells {
            return;
        }
        self.state.cells = cells;
        self.touch();
    }

    /// Set or clear one cell's color. Returns whether anything changed.
    pub fn set_cell_color(&mut self, at: GridPoint, color: Option<SerializableColor>) -> bool {
        let Some(cell) = cell_mut(&mut self.state.cells, at) else {
            return false;
        };
        if cell.color == color {
            return false;
        }
        cell.color = color;
        self.touch();
        true
    }

    pub fn cell_color(&self, at: GridPoint) -> Option<SerializableColor> {
        cell_at(&self.state.cells, at).and_then(|c| c.color)
    }

    // --- tokens ---

    /// Whether a footprint at `at` would collide or leave the grid.
    pub fn is_occupied(&self, at: GridPoint, size: u32, exclude_id: Option<&str>) -> bool {
        is_square_occupied(at.x, at.y, size, &self.state.tokens, self.cols, self.rows, exclude_id)
    }

    /// Nearest free square for a footprint.
    pub fn find_free_square(&self, preferred: GridPoint, size: u32, exclude_id: Option<&str>) -> Option<GridPoint> {
        find_available_square(
            preferred.x,
            preferred.y,
            size,
            &self.state.tokens,
            self.cols,
            self.rows,
            exclude_id,
        )
    }

    /// Insert a token whose footprint must already be free.
    pub fn add_token(&mut self, token: Token) -> BoardResult<()> {
        if token.size == 0 {
            return Err(BoardError::InvalidSize(0));
        }
        if self.is_occupied(token.origin(), token.size, None) {
            return Err(BoardError::NoSpace {
                x: token.x,
                y: token.y,
                size: token.size,
            });
        }
        self.state.tokens.push(token);
        self.touch();
        Ok(())
    }

    /// Next sequential instance name for a label, one past the highest
    /// `"{label} {n}"` still on the board.
    pub fn next_instance_name(&self, label: &str) -> String {
        let highest = self
            .state
            .tokens
            .iter()
            .filter(|t| t.label.as_deref() == Some(label))
            .filter_map(|t| t.instance_name.as_deref()?.strip_prefix(label)?.trim_start().parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("{label} {}", highest.saturating_add(1))
    }

    /// Place a token from a template at the free square nearest `preferred`.
    pub fn place_token(&mut self, template: &TokenTemplate, preferred: GridPoint) -> BoardResult<Token> {
        let at = self
            .find_free_square(preferred, template.size, None)
            .ok_or(BoardError::NoSpace {
                x: preferred.x,
                y: preferred.y,
                size: template.size,
            })?;
        let token = Token::new(new_id(), at, template.size, template.kind, template.color)
            .with_label(template.label.clone())
            .with_instance_name(self.next_instance_name(&template.label));
        log::info!("Placed {} at ({}, {})", token.display_name(), at.x, at.y);
        self.add_token(token.clone())?;
        Ok(token)
    }

    /// Move a token's footprint to a new top-left cell.
    pub fn move_token(&mut self, id: &str, to: GridPoint) -> BoardResult<()> {
        let size = self
            .token(id)
            .map(|t| t.size)
            .ok_or_else(|| BoardError::UnknownEntity(id.to_string()))?;
        if self.is_occupied(to, size, Some(id)) {
            return Err(BoardError::NoSpace { x: to.x, y: to.y, size });
        }
        if let Some(token) = self.token_mut(id) {
            if token.origin() == to {
                return Ok(());
            }
            token.x = to.x;
            token.y = to.y;
        }
        self.touch();
        Ok(())
    }

    /// Change a token's footprint size in place.
    pub fn resize_token(&mut self, id: &str, size: u32) -> BoardResult<()> {
        if size == 0 {
            return Err(BoardError::InvalidSize(size));
        }
        let origin = self
            .token(id)
            .map(|t| t.origin())
            .ok_or_else(|| BoardError::UnknownEntity(id.to_string()))?;
        if self.is_occupied(origin, size, Some(id)) {
            return Err(BoardError::ResizeOutOfBounds {
                x: origin.x,
                y: origin.y,
                size,
            });
        }
        if let Some(token) = self.token_mut(id) {
            token.size = size;
        }
        self.touch();
        Ok(())
    }

    pub fn rename_token(&mut self, id: &str, name: &str) -> BoardResult<()> {
        let token = self
            .token_mut(id)
            .ok_or_else(|| BoardError::UnknownEntity(id.to_string()))?;
        let name = name.trim();
        token.instance_name = (!name.is_empty()).then(|| name.to_string());
        self.touch();
        Ok(())
    }

    pub fn set_token_image(&mut self, id: &str, url: Option<String>) -> BoardResult<()> {
        let token = self
            .token_mut(id)
            .ok_or_else(|| BoardError::UnknownEntity(id.to_string()))?;
        token.custom_image_url = url;
        self.touch();
        Ok(())
    }

    /// Remove a token and any participant linked to it.
    pub fn remove_token(&mut self, id: &str) -> Option<Token> {
        let pos = self.state.tokens.iter().position(|t| t.id == id)?;
        let token = self.state.tokens.remove(pos);
        self.state
            .participants
            .retain(|p| p.token_id.as_deref() != Some(id));
        self.touch();
        Some(token)
    }

    fn token_mut(&mut self, id: &str) -> Option<&mut Token> {
        self.state.tokens.iter_mut().find(|t| t.id == id)
    }

    // --- shapes ---

    pub fn add_shape(&mut self, shape: DrawnShape) {
        self.state.shapes.push(shape);
        self.touch();
    }

    /// Apply an edit to a shape. Unknown ids are ignored.
    pub fn update_shape(&mut self, id: &str, edit: impl FnOnce(&mut DrawnShape)) -> bool {
        let Some(shape) = self.state.shapes.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        let before = shape.clone();
        edit(shape);
        if *shape == before {
            return false;
        }
        self.touch();
        true
    }

    /// Translate a shape so its start point lands on `start`.
    pub fn move_shape(&mut self, id: &str, start: Point) -> bool {
        self.update_shape(id, |shape| *shape = shape.moved_to(start))
    }

    pub fn remove_shape(&mut self, id: &str) -> Option<DrawnShape> {
        let pos = self.state.shapes.iter().position(|s| s.id == id)?;
        let shape = self.state.shapes.remove(pos);
        self.touch();
        Some(shape)
    }

    // --- text ---

    pub fn add_text(&mut self, text: TextObject) {
        self.state.text_objects.push(text);
        self.touch();
    }

    /// Replace a text object's content and re-measure it.
    pub fn set_text_content(
        &mut self,
        id: &str,
        content: &str,
        padding: (f64, f64),
        measurer: &dyn TextMeasurer,
    ) -> bool {
        let Some(text) = self.state.text_objects.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if text.content == content {
            return false;
        }
        text.content = content.to_string();
        text.remeasure(padding, measurer);
        self.touch();
        true
    }

    pub fn move_text(&mut self, id: &str, to: Point) -> bool {
        let Some(text) = self.state.text_objects.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if text.position() == to {
            return false;
        }
        text.x = to.x;
        text.y = to.y;
        self.touch();
        true
    }

    pub fn remove_text(&mut self, id: &str) -> Option<TextObject> {
        let pos = self.state.text_objects.iter().position(|t| t.id == id)?;
        let text = self.state.text_objects.remove(pos);
        self.touch();
        Some(text)
    }

    // --- participants ---

    pub fn add_participant(&mut self, participant: Participant) {
        self.state.participants.push(participant);
        self.touch();
    }

    pub fn update_participant(&mut self, id: &str, edit: impl FnOnce(&mut Participant)) -> bool {
        let Some(participant) = self.state.participants.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        edit(participant);
        self.touch();
        true
    }

    /// Remove a participant. A linked token stays on the board.
    pub fn remove_participant(&mut self, id: &str) -> Option<Participant> {
        let pos = self.state.participants.iter().position(|p| p.id == id)?;
        let participant = self.state.participants.remove(pos);
        self.touch();
        Some(participant)
    }

    /// Participants in initiative order.
    pub fn turn_order(&self) -> Vec<Participant> {
        let mut order = self.state.participants.clone();
        sort_turn_order(&mut order);
        order
    }

    /// Create a participant and a linked token placed near `preferred`.
    pub fn add_combatant(
        &mut self,
        name: &str,
        initiative: i32,
        kind: TokenKind,
        template: &TokenTemplate,
        preferred: GridPoint,
    ) -> BoardResult<Participant> {
        let mut token = self.place_token(template, preferred)?;
        let name = name.trim();
        if !name.is_empty() {
            self.rename_token(&token.id, name)?;
            token.instance_name = Some(name.to_string());
        }
        let mut participant = Participant::new(new_id(), token.display_name(), initiative, kind);
        participant.token_id = Some(token.id.clone());
        self.add_participant(participant.clone());
        Ok(participant)
    }

    // --- hit testing ---

    /// Topmost token whose footprint contains an SVG-space point.
    pub fn token_at(&self, point: Point) -> Option<&Token> {
        self.state
            .tokens
            .iter()
            .rev()
            .find(|t| {
                let b = t.bounds(self.cell_size);
                crate::geometry::point_in_rectangle(point, b.x0, b.y0, b.width(), b.height())
            })
    }

    /// Topmost text object containing an SVG-space point.
    pub fn text_at(&self, point: Point) -> Option<&TextObject> {
        self.state.text_objects.iter().rev().find(|t| t.hit_test(point))
    }

    /// Topmost shape hit by an SVG-space point.
    pub fn shape_at(&self, point: Point, line_tolerance: f64) -> Option<&DrawnShape> {
        self.state
            .shapes
            .iter()
            .rev()
            .find(|s| s.hit_test(point, line_tolerance))
    }

    /// Every entity overlapping a marquee rectangle.
    pub fn entities_in_rect(&self, marquee: Rect) -> Selection {
        let mut selection = Selection::default();
        for token in &self.state.tokens {
            if crate::geometry::rects_intersect(marquee, token.bounds(self.cell_size)) {
                selection.tokens.insert(token.id.clone());
            }
        }
        for shape in &self.state.shapes {
            if shape.intersects_marquee(marquee) {
                selection.shapes.insert(shape.id.clone());
            }
        }
        for text in &self.state.text_objects {
            if crate::geometry::rects_intersect(marquee, text.bounds()) {
                selection.texts.insert(text.id.clone());
            }
        }
        selection
    }

    /// Eraser: uncolor the cell and remove every token, unlocked shape and
    /// text object overlapping its center. Returns whether anything changed.
    pub fn erase_at(&mut self, cell: GridPoint, line_tolerance: f64) -> bool {
        if !cell.in_bounds(self.cols, self.rows) {
            return false;
        }
        let center = cell.center_svg(self.cell_size);
        let mut changed = self.set_cell_color(cell, None);

        let token_ids: Vec<EntityId> = self
            .state
            .tokens
            .iter()
            .filter(|t| t.covers(cell))
            .map(|t| t.id.clone())
            .collect();
        for id in token_ids {
            changed |= self.remove_token(&id).is_some();
        }

        let shape_count = self.state.shapes.len();
        self.state
            .shapes
            .retain(|s| s.is_locked || !s.hit_test(center, line_tolerance));
        let text_count = self.state.text_objects.len();
        self.state.text_objects.retain(|t| !t.hit_test(center));
        if self.state.shapes.len() != shape_count || self.state.text_objects.len() != text_count {
            self.touch();
            changed = true;
        }
        changed
    }

    /// Remove every selected entity. Returns how many were removed.
    pub fn delete_selection(&mut self, selection: &Selection) -> usize {
        let mut removed = 0;
        for id in &selection.tokens {
            removed += usize::from(self.remove_token(id).is_some());
        }
        for id in &selection.shapes {
            removed += usize::from(self.remove_shape(id).is_some());
        }
        for id in &selection.texts {
            removed += usize::from(self.remove_text(id).is_some());
        }
        removed
    }
}
