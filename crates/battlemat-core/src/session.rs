//! A board session: the store, viewport, interaction engine and undo
//! history wired together behind one event-driven API.

use crate::board::{Board, UndoableState};
use crate::config::BoardConfig;
use crate::entities::{DrawnShape, Participant, SerializableColor, Token, TokenKind};
use crate::error::{BoardResult, ConfigError};
use crate::history::{History, HistoryMode};
use crate::icons::{IconHandle, IconRegistry};
use crate::input::{KeyEvent, PointerEvent};
use crate::interaction::{EngineContext, InteractionEngine};
use crate::notify::{LogNotifier, Notifier, Severity};
use crate::snap::GridPoint;
use crate::storage::{self, BoxFuture, Storage, StorageResult};
use crate::tools::ToolKind;
use crate::viewport::Viewport;
use kurbo::{Rect, Size};

/// Owns every piece of board state for one open board.
///
/// History is fed from a single observation point: after each event or
/// command, once no gesture is in progress, a changed board revision is
/// offered to [`History::record`].
pub struct Session<N: Notifier = LogNotifier> {
    config: BoardConfig,
    board: Board,
    viewport: Viewport,
    engine: InteractionEngine,
    history: History,
    icons: IconRegistry,
    notifier: N,
    observed_revision: u64,
}

impl Default for Session<LogNotifier> {
    fn default() -> Self {
        Self::build(BoardConfig::default(), Size::new(800.0, 600.0), LogNotifier)
    }
}

impl Session<LogNotifier> {
    pub fn new(config: BoardConfig, surface: Size) -> Result<Self, ConfigError> {
        Self::with_notifier(config, surface, LogNotifier)
    }
}

impl<N: Notifier> Session<N> {
    /// Create a session that reports recoverable failures to `notifier`.
    pub fn with_notifier(config: BoardConfig, surface: Size, notifier: N) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, surface, notifier))
    }

    fn build(config: BoardConfig, surface: Size, notifier: N) -> Self {
        let board = Board::new(&config);
        let history = History::with_capacity(board.snapshot(), config.history_depth);
        log::info!("Opened {}x{} board", config.cols, config.rows);
        Self {
            viewport: Viewport::for_board(&config, surface),
            engine: InteractionEngine::new(&config),
            observed_revision: board.revision(),
            board,
            history,
            icons: IconRegistry::default(),
            notifier,
            config,
        }
    }

    /// Replace the template table used for placement and icon lookup.
    pub fn with_icons(mut self, icons: IconRegistry) -> Self {
        self.icons = icons;
        self
    }

    // --- read-only views ---

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn icons(&self) -> &IconRegistry {
        &self.icons
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn icon_for(&self, token: &Token) -> IconHandle {
        self.icons.icon_for(token)
    }

    // --- input ---

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        self.with_engine(|engine, ctx| engine.handle_pointer(ctx, event));
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        self.with_engine(|engine, ctx| engine.handle_key(ctx, event));
    }

    pub fn set_edit_value(&mut self, value: &str) {
        self.engine.set_edit_value(value);
    }

    pub fn commit_edit(&mut self) {
        self.with_engine(|engine, ctx| engine.commit_edit(ctx));
    }

    pub fn cancel_edit(&mut self) {
        self.engine.cancel_edit();
    }

    pub fn begin_token_rename(&mut self, id: &str) -> bool {
        self.engine.begin_token_rename(&self.board, id)
    }

    pub fn begin_shape_label_edit(&mut self, id: &str) -> bool {
        self.engine.begin_shape_label_edit(&self.board, id)
    }

    fn with_engine<R>(&mut self, f: impl FnOnce(&mut InteractionEngine, &mut EngineContext<'_>) -> R) -> R {
        let mut ctx = EngineContext {
            board: &mut self.board,
            viewport: &mut self.viewport,
            notifier: &mut self.notifier,
        };
        let result = f(&mut self.engine, &mut ctx);
        self.observe();
        result
    }

    /// The single mutation-observation point feeding the history.
    fn observe(&mut self) {
        if self.engine.is_gesture_active() {
            return;
        }
        let revision = self.board.revision();
        if revision == self.observed_revision && self.history.mode() == HistoryMode::Idle {
            return;
        }
        self.observed_revision = revision;
        self.history.record(&self.board.snapshot());
    }

    // --- tools and view ---

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.engine.set_tool(tool);
    }

    /// Select a template for the place-token tool by its lookup key.
    pub fn select_template(&mut self, kind: TokenKind, label: &str) -> bool {
        let template = self.icons.template(kind, label).cloned();
        let found = template.is_some();
        self.engine.select_template(template);
        found
    }

    pub fn set_paint_color(&mut self, color: SerializableColor) {
        self.engine.set_paint_color(color);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom(true);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom(false);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset_view();
    }

    pub fn resize_surface(&mut self, surface: Size) {
        self.viewport.set_surface(Rect::from_origin_size((0.0, 0.0), surface));
    }

    // --- history ---

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let board = &mut self.board;
        let moved = self.history.undo(|snapshot| {
            board.restore(snapshot);
        });
        self.after_restore(moved)
    }

    pub fn redo(&mut self) -> bool {
        let board = &mut self.board;
        let moved = self.history.redo(|snapshot| {
            board.restore(snapshot);
        });
        self.after_restore(moved)
    }

    fn after_restore(&mut self, moved: bool) -> bool {
        if moved {
            // Ids from before the jump may no longer exist.
            self.engine.cancel_gesture();
            self.engine.cancel_edit();
            self.engine.clear_selection();
            self.observe();
        }
        moved
    }

    // --- commands ---

    pub fn delete_selected(&mut self) -> usize {
        let removed = self.engine.delete_selected(&mut self.board);
        self.observe();
        removed
    }

    /// Remove a token and any participant linked to it.
    pub fn delete_token(&mut self, id: &str) -> bool {
        let removed = self.board.remove_token(id).is_some();
        self.observe();
        removed
    }

    pub fn resize_token(&mut self, id: &str, size: u32) -> bool {
        let result = self.board.resize_token(id, size);
        self.report(result).is_some()
    }

    pub fn rename_token(&mut self, id: &str, name: &str) -> bool {
        let result = self.board.rename_token(id, name);
        self.report(result).is_some()
    }

    pub fn set_token_image(&mut self, id: &str, url: Option<String>) -> bool {
        let result = self.board.set_token_image(id, url);
        self.report(result).is_some()
    }

    /// Add a participant with a linked token near `preferred`. The token uses
    /// the registered template for `(kind, template_label)` when there is one.
    pub fn add_combatant(
        &mut self,
        name: &str,
        initiative: i32,
        kind: TokenKind,
        template_label: &str,
        preferred: GridPoint,
    ) -> Option<Participant> {
        let template = self.icons.template_or_generic(kind, template_label);
        let result = self.board.add_combatant(name, initiative, kind, &template, preferred);
        self.report(result)
    }

    pub fn update_participant(&mut self, id: &str, edit: impl FnOnce(&mut Participant)) -> bool {
        let changed = self.board.update_participant(id, edit);
        self.observe();
        changed
    }

    pub fn remove_participant(&mut self, id: &str) -> Option<Participant> {
        let removed = self.board.remove_participant(id);
        self.observe();
        removed
    }

    pub fn turn_order(&self) -> Vec<Participant> {
        self.board.turn_order()
    }

    /// Edit a shape's properties (color, fill, stroke, opacity, lock, label).
    pub fn update_shape(&mut self, id: &str, edit: impl FnOnce(&mut DrawnShape)) -> bool {
        let changed = self.board.update_shape(id, edit);
        self.observe();
        changed
    }

    /// Empty the board and start a fresh history from it.
    pub fn clear_board(&mut self) {
        self.board.clear();
        self.engine.reset();
        self.history.reset(self.board.snapshot());
        self.observed_revision = self.board.revision();
        log::info!("Board cleared");
    }

    fn report<T>(&mut self, result: BoardResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.observe();
                Some(value)
            }
            Err(err) => {
                log::warn!("{err}");
                self.notifier.notify(err.title(), &err.to_string(), Severity::Error);
                None
            }
        }
    }

    // --- persistence ---

    pub fn snapshot(&self) -> UndoableState {
        self.board.snapshot()
    }

    pub fn serialize(&self) -> StorageResult<String> {
        storage::serialize(&self.board.snapshot())
    }

    /// Start saving the current board. The returned future does not borrow
    /// the session, so the caller may drive it without blocking input.
    pub fn save_to<'a>(&self, storage: &'a dyn Storage, id: &str) -> BoxFuture<'a, StorageResult<()>> {
        storage.save(id, &self.board.snapshot())
    }

    /// Replace the board with persisted JSON. Anything unreadable yields an
    /// empty board.
    pub fn load_json(&mut self, json: &str) {
        let state = storage::deserialize(json, self.board.rows(), self.board.cols());
        self.replace_state(state);
    }

    /// Apply the outcome of a storage load, falling back to an empty board.
    pub fn apply_loaded(&mut self, loaded: StorageResult<UndoableState>) {
        let state = match loaded {
            Ok(state) => state,
            Err(err) => {
                log::warn!("Failed to load board, starting empty: {err}");
                UndoableState::empty(self.board.rows(), self.board.cols())
            }
        };
        self.replace_state(state);
    }

    fn replace_state(&mut self, state: UndoableState) {
        if !self.board.restore(&state) {
            log::warn!("Loaded board does not fit this grid, starting empty");
            self.board.clear();
        }
        self.engine.reset();
        self.history.reset(self.board.snapshot());
        self.observed_revision = self.board.revision();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::notify::NotificationQueue;
    use crate::storage::{MemoryStorage, block_on};
    use kurbo::Point;

    fn session() -> Session<NotificationQueue> {
        Session::with_notifier(
            BoardConfig::with_grid(10, 10, 30.0),
            Size::new(300.0, 300.0),
            NotificationQueue::new(),
        )
        .unwrap()
    }

    fn paint(session: &mut Session<NotificationQueue>, x: f64, y: f64) {
        session.handle_pointer(&PointerEvent::down(Point::new(x, y)));
        session.handle_pointer(&PointerEvent::up(Point::new(x, y)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BoardConfig::default();
        config.rows = 0;
        assert!(Session::new(config, Size::new(100.0, 100.0)).is_err());
    }

    #[test]
    fn test_one_snapshot_per_gesture() {
        let mut s = session();
        s.set_tool(ToolKind::Paint);
        s.handle_pointer(&PointerEvent::down(Point::new(15.0, 15.0)));
        s.handle_pointer(&PointerEvent::moved(Point::new(45.0, 15.0)));
        s.handle_pointer(&PointerEvent::moved(Point::new(75.0, 15.0)));
        assert_eq!(s.history().len(), 1);
        s.handle_pointer(&PointerEvent::up(Point::new(75.0, 15.0)));
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_undo_does_not_record_itself() {
        let mut s = session();
        s.set_tool(ToolKind::Paint);
        paint(&mut s, 15.0, 15.0);
        paint(&mut s, 45.0, 15.0);
        assert_eq!(s.history().len(), 3);
        assert!(s.undo());
        assert_eq!(s.history().len(), 3);
        assert_eq!(s.history().mode(), HistoryMode::Idle);
        assert!(s.board().cell_color(GridPoint::new(1, 0)).is_none());
        assert!(s.redo());
        assert!(s.board().cell_color(GridPoint::new(1, 0)).is_some());
    }

    #[test]
    fn test_new_change_after_undo_drops_redo() {
        let mut s = session();
        s.set_tool(ToolKind::Paint);
        paint(&mut s, 15.0, 15.0);
        paint(&mut s, 45.0, 15.0);
        s.undo();
        paint(&mut s, 75.0, 15.0);
        assert!(!s.can_redo());
        assert_eq!(s.history().len(), 3);
    }

    #[test]
    fn test_undo_clears_selection() {
        let mut s = session();
        s.add_combatant("Grog", 15, TokenKind::Enemy, "Ogre", GridPoint::new(2, 2));
        s.handle_pointer(&PointerEvent::down(Point::new(75.0, 75.0)));
        s.handle_pointer(&PointerEvent::up(Point::new(75.0, 75.0)));
        assert!(!s.engine().selection().is_empty());
        s.undo();
        assert!(s.engine().selection().is_empty());
        assert!(s.board().tokens().is_empty());
    }

    #[test]
    fn test_resize_failure_notifies() {
        let mut s = session();
        let participant = s
            .add_combatant("Boulder", 0, TokenKind::Object, "Boulder", GridPoint::new(8, 8))
            .unwrap();
        let token_id = participant.token_id.unwrap();
        assert!(!s.resize_token(&token_id, 3));
        let notes = s.notifier_mut().drain();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Cannot resize");
        assert_eq!(s.board().token(&token_id).unwrap().size, 2);
    }

    #[test]
    fn test_add_combatant_links_token() {
        let mut s = session();
        let participant = s
            .add_combatant("Snaga", 11, TokenKind::Enemy, "Goblin", GridPoint::new(4, 4))
            .unwrap();
        let token = s.board().token(participant.token_id.as_deref().unwrap()).unwrap();
        assert_eq!(token.display_name(), "Snaga");
        assert_eq!(s.icon_for(token), IconHandle("goblin"));

        let token_id = token.id.clone();
        assert!(s.delete_token(&token_id));
        assert!(s.board().participants().is_empty());
    }

    #[test]
    fn test_clear_board_resets_history() {
        let mut s = session();
        s.set_tool(ToolKind::Paint);
        paint(&mut s, 15.0, 15.0);
        s.clear_board();
        assert_eq!(s.history().len(), 1);
        assert!(!s.can_undo());
        assert!(s.board().cell_color(GridPoint::new(0, 0)).is_none());
    }

    #[test]
    fn test_storage_round_trip_through_session() {
        let storage = MemoryStorage::new();
        let mut s = session();
        s.set_tool(ToolKind::Paint);
        paint(&mut s, 15.0, 15.0);
        block_on(s.save_to(&storage, "map")).unwrap();

        let mut other = session();
        other.apply_loaded(block_on(storage.load("map")));
        assert_eq!(other.snapshot(), s.snapshot());
        assert!(!other.can_undo());

        other.apply_loaded(block_on(storage.load("missing")));
        assert_eq!(other.snapshot(), UndoableState::empty(10, 10));
    }

    #[test]
    fn test_load_json_falls_back_to_empty() {
        let mut s = session();
        s.set_tool(ToolKind::Paint);
        paint(&mut s, 15.0, 15.0);
        s.load_json("garbage");
        assert_eq!(s.snapshot(), UndoableState::empty(10, 10));
    }

    #[test]
    fn test_strictly_loaded_overlap_falls_back_to_empty() {
        let storage = MemoryStorage::new();
        let mut state = UndoableState::empty(10, 10);
        for (id, x, size) in [("a", 2, 2), ("b", 3, 1)] {
            state
                .tokens
                .push(Token::new(id.into(), GridPoint::new(x, x), size, TokenKind::Npc, SerializableColor::black()));
        }
        block_on(storage.save("bad", &state)).unwrap();

        let mut s = session();
        s.apply_loaded(block_on(storage.load("bad")));
        assert!(s.board().tokens().is_empty());
        assert!(!s.board().is_occupied(GridPoint::new(3, 3), 1, None));
    }

    #[test]
    fn test_delete_key_is_one_history_step() {
        let mut s = session();
        s.add_combatant("A", 1, TokenKind::Player, "Fighter", GridPoint::new(1, 1));
        s.handle_pointer(&PointerEvent::down(Point::new(45.0, 45.0)));
        s.handle_pointer(&PointerEvent::up(Point::new(45.0, 45.0)));
        let before = s.history().len();
        s.handle_key(&KeyEvent::Pressed(Key::Delete));
        assert_eq!(s.history().len(), before + 1);
        assert!(s.board().tokens().is_empty());
    }

    #[test]
    fn test_shape_properties_edit() {
        let mut s = session();
        s.set_tool(ToolKind::DrawRectangle);
        s.handle_pointer(&PointerEvent::down(Point::new(0.0, 0.0)));
        s.handle_pointer(&PointerEvent::up(Point::new(90.0, 60.0)));
        let id = s.board().shapes()[0].id.clone();
        assert!(s.update_shape(&id, |shape| {
            shape.fill_color = Some(SerializableColor::blue());
            shape.opacity = Some(0.5);
        }));
        assert_eq!(s.board().shapes()[0].opacity, Some(0.5));
    }
}
