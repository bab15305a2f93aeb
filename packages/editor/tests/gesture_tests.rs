//! Gesture engine against a laid-out document

use retouch_editor::{
    Affordance, BlockLayoutSurface, DropPosition, GestureEngine, GestureEvent, GesturePhase, HitTest, NodePath,
    Point, PointerButton, PreviewSurface, ReorderRequest,
};
use retouch_parser::{parse, Document};

const PAGE: &str = "<body><section><h2>Title</h2><p>Lead paragraph</p></section><article><div><p>left</p><p>right</p></div></article><p>loose</p></body>";

fn path(s: &str) -> NodePath {
    s.parse().unwrap()
}

fn setup() -> (Document, BlockLayoutSurface) {
    let doc = parse(PAGE).unwrap();
    let mut surface = BlockLayoutSurface::new(600.0);
    surface.load(&doc);
    (doc, surface)
}

fn centre(surface: &BlockLayoutSurface, p: &str) -> Point {
    let rect = surface.bounds(&path(p)).unwrap();
    Point::new(rect.x + rect.width / 2.0, rect.mid_y())
}

#[test]
fn test_pressing_a_leaf_drags_its_section() {
    let (doc, surface) = setup();
    let mut engine = GestureEngine::default();
    let heading = "section:nth-child(1) > h2:nth-child(1)";

    engine.pointer_down(&doc, &path(heading), centre(&surface, heading), PointerButton::Primary);
    engine.pointer_move(&doc, &surface, centre(&surface, "p:nth-child(3)"));

    let session = engine.drag_session().unwrap();
    assert_eq!(session.source, path("section:nth-child(1)"));
    assert_eq!(session.source_markup, "<section><h2>Title</h2><p>Lead paragraph</p></section>");
}

#[test]
fn test_drop_target_resolves_to_nearest_draggable_ancestor() {
    let (doc, surface) = setup();
    let mut engine = GestureEngine::default();
    let inner = "article:nth-child(2) > div:nth-child(1) > p:nth-child(2)";

    engine.pointer_down(
        &doc,
        &path("section:nth-child(1)"),
        centre(&surface, "section:nth-child(1)"),
        PointerButton::Primary,
    );
    let point = centre(&surface, inner);
    engine.pointer_move(&doc, &surface, point);

    // the div holds two paragraphs, so it is the nearest section
    let target = path("article:nth-child(2) > div:nth-child(1)");
    assert_eq!(engine.drag_session().unwrap().drop_target, Some(target.clone()));

    let events = engine.pointer_up(&doc, &surface, point);
    let rect = surface.bounds(&target).unwrap();
    let position = if point.y < rect.mid_y() {
        DropPosition::Before
    } else {
        DropPosition::After
    };
    assert_eq!(
        events.last(),
        Some(&GestureEvent::Reorder(ReorderRequest {
            source: path("section:nth-child(1)"),
            target,
            position,
        }))
    );
}

#[test]
fn test_hits_inside_the_source_are_skipped() {
    let (doc, surface) = setup();
    let mut engine = GestureEngine::default();
    let source = "article:nth-child(2)";

    engine.pointer_down(&doc, &path(source), centre(&surface, source), PointerButton::Primary);
    engine.pointer_move(&doc, &surface, centre(&surface, "article:nth-child(2) > div:nth-child(1) > p:nth-child(1)"));

    assert_eq!(engine.phase(), GesturePhase::Dragging);
    assert_eq!(engine.drag_session().unwrap().drop_target, None);
}

#[test]
fn test_loose_paragraph_is_never_a_drop_target() {
    let (doc, surface) = setup();
    let mut engine = GestureEngine::default();

    engine.pointer_down(
        &doc,
        &path("section:nth-child(1)"),
        centre(&surface, "section:nth-child(1)"),
        PointerButton::Primary,
    );
    let events = engine.pointer_move(&doc, &surface, centre(&surface, "p:nth-child(3)"));

    assert!(!events.iter().any(|e| matches!(
        e,
        GestureEvent::Outline {
            affordance: Affordance::DropTarget,
            ..
        }
    )));
    assert_eq!(engine.drag_session().unwrap().drop_target, None);
}

#[test]
fn test_moving_between_targets_swaps_outlines() {
    let doc = parse("<body><section>a</section><article>b</article><aside>c</aside></body>").unwrap();
    let mut surface = BlockLayoutSurface::new(600.0);
    surface.load(&doc);
    let mut engine = GestureEngine::default();
    let source = "aside:nth-child(3)";

    engine.pointer_down(&doc, &path(source), centre(&surface, source), PointerButton::Primary);
    engine.pointer_move(&doc, &surface, centre(&surface, "section:nth-child(1)"));
    let events = engine.pointer_move(&doc, &surface, centre(&surface, "article:nth-child(2)"));

    assert_eq!(
        events,
        vec![
            GestureEvent::ClearOutline {
                path: path("section:nth-child(1)")
            },
            GestureEvent::Outline {
                path: path("article:nth-child(2)"),
                affordance: Affordance::DropTarget,
            },
        ]
    );
}

#[test]
fn test_small_jitter_still_clicks() {
    let (doc, surface) = setup();
    let mut engine = GestureEngine::default();
    let p = "p:nth-child(3)";
    let origin = centre(&surface, p);

    engine.pointer_down(&doc, &path(p), origin, PointerButton::Primary);
    engine.pointer_move(&doc, &surface, Point::new(origin.x + 8.0, origin.y - 8.0));
    let events = engine.pointer_up(&doc, &surface, origin);

    assert!(matches!(events.as_slice(), [GestureEvent::Select(s)] if s.markup == "<p>loose</p>"));
}
