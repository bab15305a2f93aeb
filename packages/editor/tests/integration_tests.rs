//! Integration tests for the editor crate: full pointer-driven workflows
//! through a session backed by the block layout surface

use retouch_editor::{
    Affordance, BlockLayoutSurface, EditMode, EditorConfig, EditorSession, Intent, KeyChord, MenuCommand,
    NodePath, Point, PointerButton,
};

const PAIR: &str = r#"<body><section id="a">X</section><section id="b">Y</section></body>"#;
const SWAPPED: &str = r#"<body><section id="b">Y</section><section id="a">X</section></body>"#;

fn session(doc: &str) -> EditorSession<BlockLayoutSurface> {
    EditorSession::new(doc, BlockLayoutSurface::new(1024.0), EditorConfig::default()).unwrap()
}

fn path(s: &str) -> NodePath {
    s.parse().unwrap()
}

/// Vertical centre of the box at `p` plus `offset`
fn at(session: &EditorSession<BlockLayoutSurface>, p: &str, offset: f64) -> Point {
    let rect = session.sandbox().surface().boxes().iter().find(|(bp, _)| *bp == path(p)).unwrap().1;
    Point::new(rect.x + 10.0, rect.mid_y() + offset)
}

fn drag(session: &mut EditorSession<BlockLayoutSurface>, source: &str, to: Point) {
    let from = at(session, source, 0.0);
    session.pointer_down(&path(source), from, PointerButton::Primary).unwrap();
    session.pointer_move(to).unwrap();
    session.pointer_up(to).unwrap();
}

#[test]
fn test_drag_a_onto_lower_half_of_b() {
    let mut session = session(PAIR);
    let target = at(&session, "section:nth-child(2)", 5.0);

    drag(&mut session, "section:nth-child(1)", target);

    assert_eq!(session.document(), SWAPPED);
    assert_eq!(session.history().len(), 2);
}

#[test]
fn test_drag_a_onto_upper_half_of_b_is_unchanged() {
    let mut session = session(PAIR);
    let target = at(&session, "section:nth-child(2)", -5.0);

    drag(&mut session, "section:nth-child(1)", target);

    assert_eq!(session.document(), PAIR);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_drag_b_onto_upper_half_of_a() {
    let mut session = session(PAIR);
    let target = at(&session, "section:nth-child(1)", -5.0);

    drag(&mut session, "section:nth-child(2)", target);

    assert_eq!(session.document(), SWAPPED);
}

#[test]
fn test_drag_to_empty_space_is_noop_and_clears_affordances() {
    let mut session = session(PAIR);

    drag(&mut session, "section:nth-child(1)", Point::new(10.0, 5000.0));

    assert_eq!(session.document(), PAIR);
    assert!(session.sandbox().surface().outlines().is_empty());
}

#[test]
fn test_drag_shows_source_and_target_outlines() {
    let mut session = session(PAIR);
    let a = path("section:nth-child(1)");
    let b = path("section:nth-child(2)");

    let from = at(&session, "section:nth-child(1)", 0.0);
    session.pointer_down(&a, from, PointerButton::Primary).unwrap();
    session.pointer_move(at(&session, "section:nth-child(2)", 5.0)).unwrap();

    let surface = session.sandbox().surface();
    assert_eq!(surface.outline(&a), Some(Affordance::DragSource));
    assert_eq!(surface.outline(&b), Some(Affordance::DropTarget));
}

#[test]
fn test_press_during_drag_leaves_no_stale_outlines() {
    let mut session = session(PAIR);
    let a = path("section:nth-child(1)");
    let b = path("section:nth-child(2)");

    let from = at(&session, "section:nth-child(1)", 0.0);
    session.pointer_down(&a, from, PointerButton::Primary).unwrap();
    let over_b = at(&session, "section:nth-child(2)", 5.0);
    session.pointer_move(over_b).unwrap();
    assert_eq!(session.sandbox().surface().outlines().len(), 2);

    session.pointer_down(&b, over_b, PointerButton::Secondary).unwrap();

    assert!(session.sandbox().surface().outlines().is_empty());
    assert!(session.context_menu().is_some());
    session.pointer_up(over_b).unwrap();
    assert_eq!(session.document(), PAIR);
}

#[test]
fn test_click_selects_then_undo_redo_via_keyboard() {
    let mut session = session(PAIR);
    let b = path("section:nth-child(2)");
    let point = at(&session, "section:nth-child(2)", 0.0);

    session.pointer_down(&b, point, PointerButton::Primary).unwrap();
    let intents = session.pointer_up(point).unwrap();
    assert!(matches!(intents.as_slice(), [Intent::Select(_)]));
    assert_eq!(session.selection().unwrap().markup, r#"<section id="b">Y</section>"#);

    session.pointer_down(&b, point, PointerButton::Secondary).unwrap();
    assert!(session.context_menu().is_some());
    session.choose_command(MenuCommand::MoveUp).unwrap();
    assert_eq!(session.document(), SWAPPED);

    assert!(session.key(KeyChord::primary('z')).unwrap());
    assert_eq!(session.document(), PAIR);
    assert!(session.key(KeyChord::primary('z').with_shift()).unwrap());
    assert_eq!(session.document(), SWAPPED);
    assert!(!session.key(KeyChord::primary('y')).unwrap());
}

#[test]
fn test_shortcuts_are_unbound_in_preview_mode() {
    let mut session = session(PAIR);
    session
        .apply(retouch_editor::Mutation::Remove {
            path: path("section:nth-child(2)"),
        })
        .unwrap();

    session.set_edit_mode(EditMode::Preview);
    assert!(!session.key(KeyChord::primary('z')).unwrap());
    assert_eq!(session.document(), r#"<body><section id="a">X</section></body>"#);

    session.set_edit_mode(EditMode::Edit);
    assert!(session.key(KeyChord::primary('z')).unwrap());
    assert_eq!(session.document(), PAIR);
}

#[test]
fn test_every_change_remounts_the_surface() {
    let mut session = session(PAIR);
    assert_eq!(session.sandbox().surface().loads(), 1);

    session
        .apply(retouch_editor::Mutation::Duplicate {
            path: path("section:nth-child(1)"),
        })
        .unwrap();
    session.undo().unwrap();
    session.redo().unwrap();

    assert_eq!(session.sandbox().surface().loads(), 4);
    assert_eq!(session.sandbox().surface().boxes().len(), 3);
}
