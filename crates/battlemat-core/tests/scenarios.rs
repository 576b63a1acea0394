//! End-to-end board scenarios driven through the public session API.

use battlemat_core::occupancy::find_available_square;
use battlemat_core::snap::{snap_to_cell_center, snap_to_vertex};
use battlemat_core::{
    BoardConfig, GridPoint, History, Key, KeyEvent, NotificationQueue, PointerEvent, SerializableColor, Session,
    Severity, Token, TokenKind, ToolKind, UndoableState,
};
use kurbo::{Point, Size};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 10x10 board, 30px cells, shown 1:1.
fn session() -> Session<NotificationQueue> {
    init_logging();
    Session::with_notifier(
        BoardConfig::with_grid(10, 10, 30.0),
        Size::new(300.0, 300.0),
        NotificationQueue::new(),
    )
    .expect("valid config")
}

fn click(session: &mut Session<NotificationQueue>, x: f64, y: f64) {
    session.handle_pointer(&PointerEvent::down(Point::new(x, y)));
    session.handle_pointer(&PointerEvent::up(Point::new(x, y)));
}

fn drag(session: &mut Session<NotificationQueue>, from: (f64, f64), to: (f64, f64)) {
    session.handle_pointer(&PointerEvent::down(Point::new(from.0, from.1)));
    session.handle_pointer(&PointerEvent::moved(Point::new(to.0, to.1)));
    session.handle_pointer(&PointerEvent::up(Point::new(to.0, to.1)));
}

fn assert_no_overlaps(tokens: &[Token], cols: i32, rows: i32) {
    for (i, a) in tokens.iter().enumerate() {
        let size = a.size as i32;
        assert!(a.x >= 0 && a.y >= 0 && a.x + size <= cols && a.y + size <= rows);
        for b in &tokens[i + 1..] {
            let other = b.size as i32;
            let overlap = a.x < b.x + other && a.x + size > b.x && a.y < b.y + other && a.y + size > b.y;
            assert!(!overlap, "{} overlaps {}", a.id, b.id);
        }
    }
}

#[test]
fn test_paint_then_undo() {
    let mut s = session();
    let cell = GridPoint::new(3, 3);
    let center = cell.center_svg(30.0);

    s.set_tool(ToolKind::Paint);
    s.set_paint_color(SerializableColor::red());
    click(&mut s, center.x, center.y);
    s.set_paint_color(SerializableColor::blue());
    click(&mut s, center.x, center.y);
    assert_eq!(s.board().cell_color(cell), Some(SerializableColor::blue()));

    assert!(s.undo());
    assert_eq!(s.board().cell_color(cell), Some(SerializableColor::red()));
    assert!(s.undo());
    assert_eq!(s.board().cell_color(cell), None);
    assert!(!s.undo());
}

#[test]
fn test_token_placement_collision() {
    let mut s = session();
    s.set_tool(ToolKind::PlaceToken);
    assert!(s.select_template(TokenKind::Enemy, "Goblin"));
    click(&mut s, 165.0, 165.0);
    assert!(s.select_template(TokenKind::Enemy, "Ogre"));
    click(&mut s, 135.0, 135.0);

    let tokens = s.board().tokens();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].origin(), GridPoint::new(5, 5));
    assert_eq!(tokens[1].size, 2);
    assert_ne!(tokens[1].origin(), GridPoint::new(4, 4));
    assert_no_overlaps(tokens, 10, 10);
    assert_eq!(tokens[1].instance_name.as_deref(), Some("Ogre 1"));
}

#[test]
fn test_placement_on_full_board_notifies() {
    let mut s = session();
    s.set_tool(ToolKind::PlaceToken);
    s.select_template(TokenKind::Enemy, "Dragon");
    for _ in 0..9 {
        click(&mut s, 15.0, 15.0);
    }
    assert_eq!(s.board().tokens().len(), 9);
    assert!(s.notifier_mut().drain().is_empty());

    click(&mut s, 15.0, 15.0);
    assert_eq!(s.board().tokens().len(), 9);
    let notes = s.notifier_mut().drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "No space");
    assert_eq!(notes[0].severity, Severity::Error);
    assert_no_overlaps(s.board().tokens(), 10, 10);
}

#[test]
fn test_marquee_selection() {
    let mut s = session();
    s.set_tool(ToolKind::PlaceToken);
    s.select_template(TokenKind::Player, "Fighter");
    click(&mut s, 45.0, 45.0);
    click(&mut s, 255.0, 255.0);
    let first = s.board().tokens()[0].id.clone();

    s.set_tool(ToolKind::Select);
    drag(&mut s, (0.0, 0.0), (60.0, 60.0));
    let selection = s.engine().selection();
    assert_eq!(selection.tokens.len(), 1);
    assert!(selection.tokens.contains(&first));
}

#[test]
fn test_shape_minimum_size_discard() {
    let mut s = session();
    s.set_tool(ToolKind::DrawLine);
    drag(&mut s, (30.0, 30.0), (44.0, 30.0));
    assert!(s.board().shapes().is_empty());
    assert_eq!(s.history().len(), 1);

    drag(&mut s, (30.0, 30.0), (46.0, 30.0));
    assert_eq!(s.board().shapes().len(), 1);
}

#[test]
fn test_undo_redo_round_trip() {
    let mut s = session();
    s.set_tool(ToolKind::DrawCircle);
    drag(&mut s, (75.0, 75.0), (135.0, 75.0));
    s.set_tool(ToolKind::TypeText);
    click(&mut s, 200.0, 200.0);
    s.set_edit_value("Altar");
    s.handle_key(&KeyEvent::Pressed(Key::Enter));
    let after = s.snapshot();

    assert!(s.undo());
    assert!(s.board().text_objects().is_empty());
    assert!(s.redo());
    assert_eq!(s.snapshot(), after);
    assert!(!s.can_redo());
}

#[test]
fn test_history_bounds() {
    init_logging();
    let base = UndoableState::empty(2, 2);
    let mut history = History::with_capacity(base, 20);
    let mut states = Vec::new();
    for i in 0..25 {
        let mut state = UndoableState::empty(2, 2);
        state.cells[0][0].color = Some(SerializableColor::rgb(i, 0, 0));
        history.add_snapshot(&state);
        states.push(state);
    }
    assert_eq!(history.len(), 20);

    let mut restored = None;
    for _ in 0..19 {
        history.undo(|s| restored = Some(s.clone()));
    }
    assert!(!history.can_undo());
    assert_eq!(restored.as_ref(), Some(&states[5]));
}

#[test]
fn test_placement_prefers_nearest_ring() {
    let blocker = Token::new("b".into(), GridPoint::new(5, 5), 1, TokenKind::Object, SerializableColor::white());
    assert_eq!(find_available_square(5, 5, 1, &[], 10, 10, None), Some(GridPoint::new(5, 5)));
    let found = find_available_square(5, 5, 1, &[blocker], 10, 10, None).expect("free neighbor");
    assert_eq!((found.x - 5).abs().max((found.y - 5).abs()), 1);
}

#[test]
fn test_snap_idempotence() {
    for &cell in &[7.0, 30.0, 42.5] {
        for &(x, y) in &[(0.0, 0.0), (13.2, 99.9), (-41.0, 17.5), (300.1, 299.9)] {
            let p = Point::new(x, y);
            let v = snap_to_vertex(p, cell);
            assert_eq!(snap_to_vertex(v, cell), v);
            let c = snap_to_cell_center(p, cell);
            assert_eq!(snap_to_cell_center(c, cell), c);
        }
    }
}

#[test]
fn test_token_drag_respects_occupancy() {
    let mut s = session();
    s.set_tool(ToolKind::PlaceToken);
    s.select_template(TokenKind::Player, "Fighter");
    click(&mut s, 15.0, 15.0);
    click(&mut s, 75.0, 15.0);
    let mover = s.board().tokens()[0].id.clone();

    s.set_tool(ToolKind::Select);
    drag(&mut s, (15.0, 15.0), (75.0, 15.0));
    assert_eq!(s.board().token(&mover).map(|t| t.origin()), Some(GridPoint::new(0, 0)));

    drag(&mut s, (15.0, 15.0), (45.0, 45.0));
    assert_eq!(s.board().token(&mover).map(|t| t.origin()), Some(GridPoint::new(1, 1)));
    assert_no_overlaps(s.board().tokens(), 10, 10);
}

#[test]
fn test_persisted_board_reloads() {
    let mut s = session();
    s.set_tool(ToolKind::PlaceToken);
    s.select_template(TokenKind::Enemy, "Dragon");
    click(&mut s, 45.0, 45.0);
    let json = s.serialize().expect("serializable");

    let mut reloaded = session();
    reloaded.load_json(&json);
    assert_eq!(reloaded.snapshot(), s.snapshot());
    let token = &reloaded.board().tokens()[0];
    assert_eq!(reloaded.icon_for(token).0, "dragon");
}

#[test]
fn test_load_with_invalid_tokens_starts_empty() {
    let token = |id: &str, x: i32, y: i32, size: u32| {
        Token::new(id.into(), GridPoint::new(x, y), size, TokenKind::Npc, SerializableColor::black())
    };
    let mut zero = token("zero", 4, 4, 1);
    zero.size = 0;
    let corrupt = [
        vec![token("a", 2, 2, 2), token("b", 3, 3, 1)],
        vec![token("c", 9, 9, 3)],
        vec![zero],
        vec![token("far", i32::MAX, i32::MAX, 1)],
    ];

    for tokens in corrupt {
        let mut state = UndoableState::empty(10, 10);
        state.tokens = tokens;
        let json = battlemat_core::storage::serialize(&state).expect("serializable");

        let mut s = session();
        s.load_json(&json);
        assert_eq!(s.snapshot(), UndoableState::empty(10, 10));

        s.set_tool(ToolKind::PlaceToken);
        s.select_template(TokenKind::Enemy, "Goblin");
        click(&mut s, 75.0, 75.0);
        assert_eq!(s.board().tokens().len(), 1);
        assert_eq!(s.board().tokens()[0].origin(), GridPoint::new(2, 2));
        assert!(s.notifier_mut().drain().is_empty());
    }
}
