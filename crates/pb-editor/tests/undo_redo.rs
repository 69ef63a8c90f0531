//! Integration tests: undo/redo history (pb-editor).
//!
//! Exercises `EditorSession` + `History` together: what gets recorded, what
//! undo and redo restore, and which actions leave the stacks alone.

use pb_core::{BuilderConfig, BuilderError, NodeIndex};
use pb_editor::{CanvasOffset, EditorSession, InputEvent};
use pretty_assertions::assert_eq;

const BUTTON_AT_50: &str =
    r#"<button class="draggable" style="position: absolute; top: 50px; left: 50px;">Click Me</button>"#;

fn make_session() -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    EditorSession::new(BuilderConfig::default())
}

fn stack_lens(session: &EditorSession) -> (usize, usize) {
    (session.history().undo_len(), session.history().redo_len())
}

// ─── Recording ───────────────────────────────────────────────────────────

#[test]
fn n_creations_give_n_plus_one_snapshots() {
    let mut session = make_session();
    let tags = ["text", "button", "logo", "list", "section", "text", "button"];
    for (i, tag) in tags.iter().enumerate() {
        session.create_element(tag, i as f32 * 10.0, 20.0).unwrap();
    }
    assert_eq!(stack_lens(&session), (tags.len() + 1, 0));
    assert_eq!(session.history().undo_entries()[0], "");
}

#[test]
fn creating_a_button_then_undoing_restores_empty_canvas() {
    let mut session = make_session();
    session.create_element("button", 50.0, 50.0).unwrap();
    assert_eq!(session.serialize(), BUTTON_AT_50);
    assert_eq!(
        session.history().undo_entries(),
        [String::new(), BUTTON_AT_50.to_string()]
    );

    assert!(session.undo());
    assert_eq!(session.serialize(), "");
    assert_eq!(session.history().redo_entries(), [BUTTON_AT_50.to_string()]);
}

#[test]
fn unsupported_type_changes_nothing() {
    let mut session = make_session();
    session.create_element("text", 0.0, 0.0).unwrap();
    let before = session.serialize();
    let lens = stack_lens(&session);

    let err = session.create_element("video", 10.0, 10.0).unwrap_err();
    assert!(matches!(err, BuilderError::UnsupportedElement(ref t) if t == "video"));
    assert_eq!(session.serialize(), before);
    assert_eq!(stack_lens(&session), lens);
}

#[test]
fn save_state_always_clears_redo() {
    let mut session = make_session();
    session.create_element("text", 0.0, 0.0).unwrap();
    session.create_element("text", 0.0, 30.0).unwrap();
    session.undo();
    session.undo();
    assert_eq!(session.history().redo_len(), 2);

    session.save_state();
    assert_eq!(session.history().redo_len(), 0);

    // An edit records too, and clears redo the same way.
    session.create_element("text", 0.0, 0.0).unwrap();
    session.create_element("logo", 5.0, 5.0).unwrap();
    session.undo();
    assert_eq!(session.history().redo_len(), 1);
    session
        .edit_text(NodeIndex::new(0), Some("changed".into()))
        .unwrap();
    assert_eq!(session.history().redo_len(), 0);
}

// ─── Undo / redo ─────────────────────────────────────────────────────────

#[test]
fn undo_then_redo_is_identity() {
    let mut session = make_session();
    session.create_element("list", 12.0, 34.0).unwrap();
    session.create_element("section", 56.0, 78.0).unwrap();
    session
        .edit_text(NodeIndex::new(0), Some("Shopping".into()))
        .unwrap();

    for _ in 0..3 {
        let before = session.serialize();
        assert!(session.undo());
        assert_ne!(session.serialize(), before);
        assert!(session.redo());
        assert_eq!(session.serialize(), before);
        assert!(session.undo());
    }
}

#[test]
fn undo_past_oldest_is_a_no_op() {
    let mut session = make_session();
    session.create_element("text", 1.0, 1.0).unwrap();
    assert!(session.undo());
    assert!(!session.undo());
    assert!(!session.undo());
    assert_eq!(session.serialize(), "");
    assert_eq!(stack_lens(&session), (1, 1));
}

#[test]
fn redo_with_nothing_to_redo_is_a_no_op() {
    let mut session = make_session();
    session.create_element("text", 1.0, 1.0).unwrap();
    let before = session.serialize();
    assert!(!session.redo());
    assert_eq!(session.serialize(), before);
}

#[test]
fn undo_crosses_imports() {
    let mut session = make_session();
    session.create_element("button", 50.0, 50.0).unwrap();
    session.import_layout(include_str!("fixtures/two_buttons.html"));
    assert_eq!(session.canvas().elements().count(), 2);

    assert!(session.undo());
    assert_eq!(session.serialize(), BUTTON_AT_50);
}

#[test]
fn history_limit_bounds_undo_depth() {
    let mut config = BuilderConfig::default();
    config.history_limit = Some(3);
    let mut session = EditorSession::new(config);
    for i in 0..6 {
        session.create_element("text", 0.0, i as f32).unwrap();
    }
    assert_eq!(session.history().undo_len(), 3);
    let mut steps = 0;
    while session.undo() {
        steps += 1;
    }
    assert_eq!(steps, 2);
    assert_eq!(session.canvas().elements().count(), 4);
}

// ─── Moves ───────────────────────────────────────────────────────────────

fn drag(session: &mut EditorSession, index: usize, from: (f32, f32), to: (f32, f32)) {
    let target = Some(NodeIndex::new(index));
    session
        .handle_input(&InputEvent::PointerDown { x: from.0, y: from.1 }, target)
        .unwrap();
    session
        .handle_input(&InputEvent::PointerMove { x: to.0, y: to.1 }, None)
        .unwrap();
    session
        .handle_input(&InputEvent::PointerUp { x: to.0, y: to.1 }, None)
        .unwrap();
}

#[test]
fn dragging_leaves_history_alone() {
    let mut session = make_session();
    session.create_element("button", 50.0, 50.0).unwrap();
    let lens = stack_lens(&session);

    let target = Some(NodeIndex::new(0));
    session
        .handle_input(&InputEvent::PointerDown { x: 55.0, y: 55.0 }, target)
        .unwrap();
    assert_eq!(stack_lens(&session), lens);
    session
        .handle_input(&InputEvent::PointerMove { x: 155.0, y: 75.0 }, None)
        .unwrap();
    assert_eq!(stack_lens(&session), lens);
    session
        .handle_input(&InputEvent::PointerUp { x: 155.0, y: 75.0 }, None)
        .unwrap();
    assert_eq!(stack_lens(&session), lens);

    assert_eq!(
        session.serialize(),
        r#"<button class="draggable" style="position: absolute; top: 70px; left: 150px;">Click Me</button>"#
    );
}

#[test]
fn untracked_drag_is_kept_for_redo() {
    let mut session = make_session();
    session.create_element("button", 50.0, 50.0).unwrap();
    drag(&mut session, 0, (50.0, 50.0), (60.0, 50.0));
    let dragged = session.serialize();

    // Undo steps back over the creation; the dragged state waits in redo.
    assert!(session.undo());
    assert_eq!(session.serialize(), "");
    assert!(session.redo());
    assert_eq!(session.serialize(), dragged);
}

#[test]
fn drag_between_undo_and_redo_stays_reachable() {
    let mut session = make_session();
    session.create_element("button", 50.0, 50.0).unwrap();
    session.create_element("text", 0.0, 200.0).unwrap();
    let both = session.serialize();

    assert!(session.undo());
    assert_eq!(session.serialize(), BUTTON_AT_50);
    drag(&mut session, 0, (50.0, 50.0), (90.0, 90.0));
    let dragged = session.serialize();
    assert!(dragged.contains("top: 90px; left: 90px;"));

    assert!(session.redo());
    assert_eq!(session.serialize(), both);
    assert!(session.undo());
    assert_eq!(session.serialize(), dragged);
    assert!(session.undo());
    assert_eq!(session.serialize(), BUTTON_AT_50);
    assert!(session.undo());
    assert_eq!(session.serialize(), "");
    assert!(!session.undo());
}

#[test]
fn tracked_drag_is_one_undo_step() {
    let mut config = BuilderConfig::default();
    config.snapshot_moves = true;
    let mut session = EditorSession::new(config);
    session.create_element("button", 50.0, 50.0).unwrap();

    drag(&mut session, 0, (50.0, 50.0), (90.0, 90.0));
    assert_eq!(stack_lens(&session), (3, 0));

    assert!(session.undo());
    assert_eq!(session.serialize(), BUTTON_AT_50);
}

#[test]
fn tracked_click_without_move_records_nothing() {
    let mut config = BuilderConfig::default();
    config.snapshot_moves = true;
    let mut session = EditorSession::new(config);
    session.set_canvas_offset(CanvasOffset::new(0.0, 0.0));
    session.create_element("text", 0.0, 0.0).unwrap();
    drag(&mut session, 0, (1.0, 1.0), (1.0, 1.0));
    assert_eq!(stack_lens(&session), (2, 0));
}
