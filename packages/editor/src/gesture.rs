//! # Gesture Engine
//!
//! Pointer state machine that tells hover, click and drag apart.
//!
//! ```text
//! Idle ──over──▶ Hovering ──down──▶ Pressed ──up──────────────▶ Select
//!                                      │
//!                                      └─move > threshold──▶ Dragging ──up──▶ Reorder | no-op
//! ```
//!
//! The engine never touches the document. It reads the current tree to
//! classify nodes and reports intent as [`GestureEvent`]s; outline commands
//! are returned alongside so the surface can mirror the engine's state.

use retouch_parser::{serialize_node, Document};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::Classifier;
use crate::geometry::{Point, Rect};
use crate::mutations::{DropPosition, Mutation};
use crate::path::{decode, NodePath};

/// Geometry queries the engine needs from whatever renders the document
pub trait HitTest {
    /// Element paths under `point`, topmost first
    fn hit_test(&self, point: Point) -> Vec<NodePath>;

    fn bounds(&self, path: &NodePath) -> Option<Rect>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfig {
    /// Displacement in either axis, in pixels, that turns a press into a drag
    pub drag_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { drag_threshold: 8.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Hovering,
    Pressed,
    Dragging,
}

/// Node targeted for a rewrite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub path: NodePath,
    /// Outer markup of the node at selection time
    pub markup: String,
}

/// In-progress drag; at most one exists at a time
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub source: NodePath,
    pub source_markup: String,
    pub drop_target: Option<NodePath>,
    pub origin: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub source: NodePath,
    pub target: NodePath,
    pub position: DropPosition,
}

impl From<ReorderRequest> for Mutation {
    fn from(request: ReorderRequest) -> Self {
        Mutation::Move {
            source: request.source,
            target: request.target,
            position: request.position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    HoverEditable,
    HoverDraggable,
    DragSource,
    DropTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    Select(Selection),
    Reorder(ReorderRequest),
    OpenContextMenu { path: NodePath, anchor: Point },
    Outline { path: NodePath, affordance: Affordance },
    ClearOutline { path: NodePath },
}

#[derive(Debug, Clone, PartialEq)]
enum Press {
    None,
    Pressed { path: NodePath, origin: Point, moved: bool },
    Dragging(DragSession),
}

#[derive(Debug, Clone)]
pub struct GestureEngine {
    classifier: Classifier,
    config: GestureConfig,
    hovered: Option<NodePath>,
    press: Press,
}

impl GestureEngine {
    pub fn new(classifier: Classifier, config: GestureConfig) -> Self {
        Self {
            classifier,
            config,
            hovered: None,
            press: Press::None,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        match (&self.press, &self.hovered) {
            (Press::Dragging(_), _) => GesturePhase::Dragging,
            (Press::Pressed { .. }, _) => GesturePhase::Pressed,
            (Press::None, Some(_)) => GesturePhase::Hovering,
            (Press::None, None) => GesturePhase::Idle,
        }
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        match &self.press {
            Press::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn hovered(&self) -> Option<&NodePath> {
        self.hovered.as_ref()
    }

    pub fn pointer_over(&mut self, doc: &Document, path: &NodePath) -> Vec<GestureEvent> {
        if matches!(self.press, Press::Dragging(_)) {
            return Vec::new();
        }

        let mut events = Vec::new();
        if let Some(previous) = self.hovered.take() {
            if previous == *path {
                self.hovered = Some(previous);
                return events;
            }
            events.push(GestureEvent::ClearOutline { path: previous });
        }

        let Some(node) = decode(doc, path).filter(|node| !node.is_root()) else {
            return events;
        };

        let affordance = if self.classifier.is_draggable(&node) {
            Affordance::HoverDraggable
        } else {
            Affordance::HoverEditable
        };
        self.hovered = Some(path.clone());
        events.push(GestureEvent::Outline {
            path: path.clone(),
            affordance,
        });
        events
    }

    pub fn pointer_out(&mut self, path: &NodePath) -> Vec<GestureEvent> {
        if self.hovered.as_ref() != Some(path) {
            return Vec::new();
        }
        self.hovered = None;
        if matches!(self.press, Press::Dragging(_)) {
            return Vec::new();
        }
        vec![GestureEvent::ClearOutline { path: path.clone() }]
    }

    pub fn pointer_down(
        &mut self,
        doc: &Document,
        path: &NodePath,
        point: Point,
        button: PointerButton,
    ) -> Vec<GestureEvent> {
        // A press without a release abandons any drag in progress
        let mut events = self.abandon_drag();

        if path.is_root() || decode(doc, path).is_none() {
            return events;
        }

        match button {
            PointerButton::Secondary => events.push(GestureEvent::OpenContextMenu {
                path: path.clone(),
                anchor: point,
            }),
            PointerButton::Primary => {
                debug!(%path, "pressed");
                self.press = Press::Pressed {
                    path: path.clone(),
                    origin: point,
                    moved: false,
                };
            }
        }
        events
    }

    pub fn pointer_move(&mut self, doc: &Document, surface: &impl HitTest, point: Point) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        if let Press::Pressed { path, origin, moved } = &mut self.press {
            let dx = (point.x - origin.x).abs();
            let dy = (point.y - origin.y).abs();
            if dx <= self.config.drag_threshold && dy <= self.config.drag_threshold {
                return events;
            }

            let source = decode(doc, path).and_then(|node| self.classifier.nearest_draggable(&node));
            let Some(source) = source else {
                if !*moved {
                    debug!(%path, "moved past threshold with nothing to drag");
                }
                *moved = true;
                return events;
            };

            let session = DragSession {
                source: source.path(),
                source_markup: source.node().map(serialize_node).unwrap_or_default(),
                drop_target: None,
                origin: *origin,
            };
            debug!(source = %session.source, "drag started");

            if let Some(hovered) = self.hovered.take() {
                events.push(GestureEvent::ClearOutline { path: hovered });
            }
            events.push(GestureEvent::Outline {
                path: session.source.clone(),
                affordance: Affordance::DragSource,
            });
            self.press = Press::Dragging(session);
        }

        if matches!(self.press, Press::Dragging(_)) {
            events.extend(self.track_drop_target(doc, surface, point));
        }
        events
    }

    pub fn pointer_up(&mut self, doc: &Document, surface: &impl HitTest, point: Point) -> Vec<GestureEvent> {
        match std::mem::replace(&mut self.press, Press::None) {
            Press::None => Vec::new(),
            Press::Pressed { moved: true, .. } => Vec::new(),
            Press::Pressed { path, .. } => {
                let Some(node) = decode(doc, &path).and_then(|node| node.node()) else {
                    return Vec::new();
                };
                debug!(%path, "click");
                vec![GestureEvent::Select(Selection {
                    markup: serialize_node(node),
                    path,
                })]
            }
            Press::Dragging(session) => {
                let mut events = vec![GestureEvent::ClearOutline {
                    path: session.source.clone(),
                }];

                let Some(target) = session.drop_target else {
                    debug!(source = %session.source, "dropped with no target");
                    return events;
                };
                events.push(GestureEvent::ClearOutline { path: target.clone() });

                let Some(bounds) = surface.bounds(&target) else {
                    return events;
                };
                let position = if point.y < bounds.mid_y() {
                    DropPosition::Before
                } else {
                    DropPosition::After
                };
                debug!(source = %session.source, %target, ?position, "dropped");
                events.push(GestureEvent::Reorder(ReorderRequest {
                    source: session.source,
                    target,
                    position,
                }));
                events
            }
        }
    }

    /// Forget hover and press state, e.g. after the surface reloads
    pub fn reset(&mut self) {
        self.hovered = None;
        self.press = Press::None;
    }

    fn abandon_drag(&mut self) -> Vec<GestureEvent> {
        let Press::Dragging(session) = std::mem::replace(&mut self.press, Press::None) else {
            return Vec::new();
        };
        debug!(source = %session.source, "drag abandoned");

        std::iter::once(session.source)
            .chain(session.drop_target)
            .map(|path| GestureEvent::ClearOutline { path })
            .collect()
    }

    fn track_drop_target(&mut self, doc: &Document, surface: &impl HitTest, point: Point) -> Vec<GestureEvent> {
        let Press::Dragging(session) = &mut self.press else {
            return Vec::new();
        };

        let candidate = resolve_drop_target(&self.classifier, doc, surface, &session.source, point);
        if candidate == session.drop_target {
            return Vec::new();
        }

        let mut events = Vec::new();
        if let Some(previous) = session.drop_target.take() {
            events.push(GestureEvent::ClearOutline { path: previous });
        }
        if let Some(target) = &candidate {
            events.push(GestureEvent::Outline {
                path: target.clone(),
                affordance: Affordance::DropTarget,
            });
        }
        session.drop_target = candidate;
        events
    }
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(Classifier::default(), GestureConfig::default())
    }
}

/// First hit that is outside the source, not the root, and resolves to a
/// draggable node other than the source
fn resolve_drop_target(
    classifier: &Classifier,
    doc: &Document,
    surface: &impl HitTest,
    source: &NodePath,
    point: Point,
) -> Option<NodePath> {
    surface
        .hit_test(point)
        .into_iter()
        .filter(|hit| !hit.is_root() && !hit.is_within(source))
        .filter_map(|hit| {
            let node = decode(doc, &hit)?;
            let target = classifier.nearest_draggable(&node)?.path();
            (target != *source).then_some(target)
        })
        .next()
}
