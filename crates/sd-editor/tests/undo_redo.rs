//! Integration tests: snapshot history driven through the editor session.
//!
//! Every document mutation (commands, drags, resizes, loads) must produce
//! exactly one undoable step, and undo/redo must restore exact snapshots.

use pretty_assertions::assert_eq;
use sd_core::id::ComponentId;
use sd_core::model::*;
use sd_editor::{Command, EditorSession, InputEvent, Modifiers, PointerButton};

fn make_session() -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = EditorSession::default();
    let count = session
        .import_json(include_str!("fixtures/layout.json"))
        .unwrap();
    assert_eq!(count, 2);
    session
}

fn frame_of(session: &EditorSession, id: &str) -> Frame {
    session
        .document()
        .get(ComponentId::intern(id))
        .expect("component exists")
        .frame
}

fn drag(session: &mut EditorSession, from: (f64, f64), path: &[(f64, f64)]) {
    session.handle_event(&InputEvent::down(from.0, from.1));
    for &(x, y) in path {
        session.handle_event(&InputEvent::moved(x, y));
    }
    let last = path.last().copied().unwrap_or(from);
    session.handle_event(&InputEvent::up(last.0, last.1));
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn import_is_one_undoable_step() {
    let mut session = make_session();
    assert_eq!(session.history().len(), 2);

    assert!(session.dispatch(Command::Undo).unwrap());
    assert!(session.components().is_empty());
    assert!(!session.can_undo());

    assert!(session.dispatch(Command::Redo).unwrap());
    assert_eq!(session.components().len(), 2);
}

#[test]
fn undo_restores_previous_frame() {
    let mut session = make_session();
    drag(&mut session, (160.0, 130.0), &[(210.0, 180.0)]);
    assert_eq!(frame_of(&session, "label"), Frame::new(200.0, 170.0, 100.0, 30.0));

    session.dispatch(Command::Undo).unwrap();
    assert_eq!(frame_of(&session, "label"), Frame::new(150.0, 120.0, 100.0, 30.0));

    session.dispatch(Command::Redo).unwrap();
    assert_eq!(frame_of(&session, "label"), Frame::new(200.0, 170.0, 100.0, 30.0));
}

#[test]
fn property_update_undo() {
    let mut session = make_session();
    let id = ComponentId::intern("panel");
    session
        .dispatch(Command::UpdateComponent {
            id,
            patch: ComponentPatch::property("text", "Stop"),
        })
        .unwrap();

    session.dispatch(Command::Undo).unwrap();
    let ComponentKind::Button(props) = &session.document().get(id).unwrap().kind else {
        panic!("expected button");
    };
    assert_eq!(props.text.as_deref(), Some("Run"));
}

#[test]
fn new_action_discards_redo_tail() {
    let mut session = make_session();
    session
        .dispatch(Command::DeleteComponent(ComponentId::intern("label")))
        .unwrap();
    session.dispatch(Command::Undo).unwrap();
    assert!(session.can_redo());

    session
        .dispatch(Command::DeleteComponent(ComponentId::intern("panel")))
        .unwrap();
    assert!(!session.can_redo());
    assert!(!session.dispatch(Command::Redo).unwrap());

    let ids: Vec<&str> = session.components().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["label"]);
}

// ─── Boundaries ─────────────────────────────────────────────────────────

#[test]
fn undo_redo_at_boundaries_are_noops() {
    let mut session = EditorSession::default();
    assert!(!session.dispatch(Command::Undo).unwrap());
    assert!(!session.dispatch(Command::Redo).unwrap());

    let mut session = make_session();
    for _ in 0..5 {
        session.dispatch(Command::Undo).unwrap();
    }
    assert!(session.components().is_empty());
    for _ in 0..5 {
        session.dispatch(Command::Redo).unwrap();
    }
    assert_eq!(session.components().len(), 2);
}

#[test]
fn rejected_command_leaves_history_alone() {
    let mut session = make_session();
    let before = session.history().len();
    let result = session.dispatch(Command::UpdateComponent {
        id: ComponentId::intern("label"),
        patch: ComponentPatch::property("placeholder", "nope"),
    });
    assert!(result.is_err());
    assert_eq!(session.history().len(), before);

    let result = session.dispatch(Command::DeleteComponent(ComponentId::intern("ghost")));
    assert!(result.is_err());
    assert_eq!(session.history().len(), before);
}

// ─── Selection ──────────────────────────────────────────────────────────

#[test]
fn deleting_selected_component_clears_selection() {
    let mut session = make_session();
    session.handle_event(&InputEvent::down(160.0, 130.0));
    session.handle_event(&InputEvent::up(160.0, 130.0));
    assert_eq!(session.selection(), Some(ComponentId::intern("label")));

    assert!(session.handle_event(&InputEvent::key("Delete")));
    assert_eq!(session.selection(), None);
    assert_eq!(session.components().len(), 1);
}

#[test]
fn undo_clears_selection() {
    let mut session = make_session();
    session
        .dispatch(Command::SelectComponent(Some(ComponentId::intern("panel"))))
        .unwrap();
    session.dispatch(Command::Undo).unwrap();
    assert_eq!(session.selection(), None);
}

#[test]
fn keyboard_undo_and_redo() {
    let mut session = make_session();
    session
        .dispatch(Command::DeleteComponent(ComponentId::intern("panel")))
        .unwrap();

    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::default()
    };
    session.handle_event(&InputEvent::KeyDown {
        key: "z".into(),
        modifiers: ctrl,
        text_input_focused: false,
    });
    assert_eq!(session.components().len(), 2);

    session.handle_event(&InputEvent::KeyDown {
        key: "y".into(),
        modifiers: ctrl,
        text_input_focused: false,
    });
    assert_eq!(session.components().len(), 1);
}

// ─── Gestures ───────────────────────────────────────────────────────────

#[test]
fn drag_gesture_is_one_history_entry() {
    let mut session = make_session();
    let before = session.history().len();

    drag(
        &mut session,
        (160.0, 130.0),
        &[(170.0, 140.0), (180.0, 150.0), (190.0, 160.0), (200.0, 170.0)],
    );
    assert_eq!(session.history().len(), before + 1);
    assert_eq!(frame_of(&session, "label"), Frame::new(190.0, 160.0, 100.0, 30.0));

    session.dispatch(Command::Undo).unwrap();
    assert_eq!(frame_of(&session, "label"), Frame::new(150.0, 120.0, 100.0, 30.0));
}

#[test]
fn delete_during_drag_gets_its_own_entry() {
    let mut session = make_session();
    let before = session.history().len();

    session.handle_event(&InputEvent::down(160.0, 130.0));
    session.handle_event(&InputEvent::moved(210.0, 180.0));
    let after_drag = session.components().to_vec();
    assert!(session.handle_event(&InputEvent::key("Delete")));
    session.handle_event(&InputEvent::moved(230.0, 200.0));
    session.handle_event(&InputEvent::up(230.0, 200.0));

    assert_eq!(session.history().len(), before + 2);
    assert_eq!(session.components().len(), 1);

    session.dispatch(Command::Undo).unwrap();
    assert_eq!(session.components(), after_drag.as_slice());
    assert_eq!(frame_of(&session, "label"), Frame::new(200.0, 170.0, 100.0, 30.0));

    session.dispatch(Command::Undo).unwrap();
    assert_eq!(frame_of(&session, "label"), Frame::new(150.0, 120.0, 100.0, 30.0));
}

#[test]
fn other_component_update_during_drag_is_not_merged() {
    let mut session = make_session();
    let before = session.history().len();

    session.handle_event(&InputEvent::down(160.0, 130.0));
    session.handle_event(&InputEvent::moved(170.0, 140.0));
    session
        .dispatch(Command::UpdateComponent {
            id: ComponentId::intern("panel"),
            patch: ComponentPatch::property("text", "Stop"),
        })
        .unwrap();
    session.handle_event(&InputEvent::moved(180.0, 150.0));
    session.handle_event(&InputEvent::moved(190.0, 160.0));
    session.handle_event(&InputEvent::up(190.0, 160.0));

    // drag, rename, rest of the drag
    assert_eq!(session.history().len(), before + 3);
    assert_eq!(frame_of(&session, "label"), Frame::new(180.0, 150.0, 100.0, 30.0));

    session.dispatch(Command::Undo).unwrap();
    assert_eq!(frame_of(&session, "label"), Frame::new(160.0, 130.0, 100.0, 30.0));
    session.dispatch(Command::Undo).unwrap();
    let ComponentKind::Button(props) = &session.document().get(ComponentId::intern("panel")).unwrap().kind else {
        panic!("expected button");
    };
    assert_eq!(props.text.as_deref(), Some("Run"));
    assert_eq!(frame_of(&session, "label"), Frame::new(160.0, 130.0, 100.0, 30.0));
}

#[test]
fn click_without_motion_records_nothing() {
    let mut session = make_session();
    let before = session.history().len();
    drag(&mut session, (160.0, 130.0), &[]);
    assert_eq!(session.history().len(), before);
}

#[test]
fn uncoalesced_drag_records_every_move() {
    let config = sd_core::EditorConfig {
        coalesce_gestures: false,
        ..Default::default()
    };
    let mut session = EditorSession::new(config);
    session
        .import_json(include_str!("fixtures/layout.json"))
        .unwrap();
    let before = session.history().len();

    drag(&mut session, (160.0, 130.0), &[(170.0, 140.0), (180.0, 150.0)]);
    assert_eq!(session.history().len(), before + 2);
}

#[test]
fn alt_drag_duplicate_is_separate_from_its_move() {
    let mut session = make_session();
    let before = session.history().len();

    session.handle_event(&InputEvent::PointerDown {
        x: 160.0,
        y: 130.0,
        button: PointerButton::Primary,
        modifiers: Modifiers {
            alt: true,
            ..Modifiers::default()
        },
    });
    session.handle_event(&InputEvent::moved(200.0, 130.0));
    session.handle_event(&InputEvent::up(200.0, 130.0));

    assert_eq!(session.components().len(), 3);
    assert_eq!(session.history().len(), before + 2);

    // First undo puts the copy back where it was created.
    session.dispatch(Command::Undo).unwrap();
    assert_eq!(session.components().len(), 3);
    assert_eq!(session.components()[2].frame, Frame::new(170.0, 140.0, 100.0, 30.0));

    session.dispatch(Command::Undo).unwrap();
    assert_eq!(session.components().len(), 2);
}

// ─── Determinism ────────────────────────────────────────────────────────

#[test]
fn same_commands_give_same_document() {
    let script = || {
        vec![
            Command::AddComponent(PlacedComponent::new(
                ComponentId::intern("a"),
                Frame::new(10.0, 10.0, 50.0, 50.0),
                ComponentKind::Text(TextProps::default()),
            )),
            Command::UpdateComponent {
                id: ComponentId::intern("a"),
                patch: ComponentPatch::position(900.0, 20.0),
            },
            Command::Undo,
            Command::Redo,
            Command::DeleteComponent(ComponentId::intern("a")),
            Command::Undo,
        ]
    };

    let run = || {
        let mut session = EditorSession::default();
        for command in script() {
            session.dispatch(command).unwrap();
        }
        session
    };

    let (a, b) = (run(), run());
    assert_eq!(a.components(), b.components());
    assert_eq!(a.history().len(), b.history().len());
    assert_eq!(a.components()[0].frame, Frame::new(750.0, 20.0, 50.0, 50.0));
}
