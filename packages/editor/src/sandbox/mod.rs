//! # Rendering Sandbox
//!
//! Owns the preview surface. Every document change is a full reload: the
//! markup is reparsed, the surface reloaded and resized to its content, and
//! in edit mode a fresh set of listeners is attached so no hover or drag
//! state survives the reload.
//!
//! The sandbox only reads the document. User intent is reported upward as
//! [`Intent`]s; outline commands from the gesture engine are applied to the
//! surface here and never leave this module.

mod layout;

pub use layout::BlockLayoutSurface;

use retouch_parser::{parse, Document, ParseError};
use tracing::debug;

use crate::config::EditorConfig;
use crate::classify::Classifier;
use crate::geometry::Point;
use crate::gesture::{Affordance, GestureEngine, GestureEvent, HitTest, PointerButton, ReorderRequest, Selection};
use crate::keyboard::{HistoryCommand, KeyChord, Shortcuts};
use crate::path::{decode, NodePath};

/// Isolated rendering target
pub trait PreviewSurface: HitTest {
    /// Replace the entire content
    fn load(&mut self, doc: &Document);

    fn content_height(&self) -> f64;

    fn resize(&mut self, height: f64);

    fn set_outline(&mut self, path: &NodePath, affordance: Affordance);

    fn clear_outline(&mut self, path: &NodePath);

    fn clear_outlines(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Edit,
    Preview,
}

/// What the user asked for, as seen by the sandbox
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Select(Selection),
    Reorder(ReorderRequest),
    ContextMenu { path: NodePath, anchor: Point },
    /// Preview-mode click on a link
    Navigate { href: String },
}

/// Pointer and keyboard handlers, alive only while edit mode is on
#[derive(Debug)]
pub struct Listeners {
    gesture: GestureEngine,
    shortcuts: Shortcuts,
}

impl Listeners {
    fn attach(config: &EditorConfig) -> Self {
        debug!("listeners attached");
        Self {
            gesture: GestureEngine::new(Classifier::new(config.classifier.clone()), config.gesture.clone()),
            shortcuts: Shortcuts,
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        debug!("listeners detached");
    }
}

pub struct Sandbox<S: PreviewSurface> {
    surface: S,
    tree: Document,
    mode: EditMode,
    config: EditorConfig,
    listeners: Option<Listeners>,
    pressed_link: Option<String>,
}

impl<S: PreviewSurface> Sandbox<S> {
    pub fn new(surface: S, mode: EditMode, config: EditorConfig) -> Self {
        Self {
            surface,
            tree: Document::default(),
            mode,
            config,
            listeners: None,
            pressed_link: None,
        }
    }

    /// Full reload from `markup`. On a parse error the previous content
    /// stays mounted.
    pub fn mount(&mut self, markup: &str) -> Result<(), ParseError> {
        let tree = parse(markup)?;

        self.listeners = None;
        self.pressed_link = None;
        self.surface.clear_outlines();
        self.surface.load(&tree);
        let height = self.surface.content_height();
        self.surface.resize(height);
        self.tree = tree;

        if self.mode == EditMode::Edit {
            self.listeners = Some(Listeners::attach(&self.config));
        }
        debug!(height, "mounted");
        Ok(())
    }

    pub fn set_mode(&mut self, mode: EditMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.pressed_link = None;
        match mode {
            EditMode::Edit => self.listeners = Some(Listeners::attach(&self.config)),
            EditMode::Preview => {
                self.listeners = None;
                self.surface.clear_outlines();
            }
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_listening(&self) -> bool {
        self.listeners.is_some()
    }

    pub fn tree(&self) -> &Document {
        &self.tree
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn gesture(&self) -> Option<&GestureEngine> {
        self.listeners.as_ref().map(|l| &l.gesture)
    }

    pub fn pointer_over(&mut self, path: &NodePath) -> Vec<Intent> {
        let Some(listeners) = self.listeners.as_mut() else {
            return Vec::new();
        };
        let events = listeners.gesture.pointer_over(&self.tree, path);
        self.dispatch(events)
    }

    pub fn pointer_out(&mut self, path: &NodePath) -> Vec<Intent> {
        let Some(listeners) = self.listeners.as_mut() else {
            return Vec::new();
        };
        let events = listeners.gesture.pointer_out(path);
        self.dispatch(events)
    }

    pub fn pointer_down(&mut self, path: &NodePath, point: Point, button: PointerButton) -> Vec<Intent> {
        let Some(listeners) = self.listeners.as_mut() else {
            if button == PointerButton::Primary {
                self.pressed_link = link_href(&self.tree, path);
            }
            return Vec::new();
        };
        let events = listeners.gesture.pointer_down(&self.tree, path, point, button);
        self.dispatch(events)
    }

    pub fn pointer_move(&mut self, point: Point) -> Vec<Intent> {
        let Some(listeners) = self.listeners.as_mut() else {
            return Vec::new();
        };
        let events = listeners.gesture.pointer_move(&self.tree, &self.surface, point);
        self.dispatch(events)
    }

    pub fn pointer_up(&mut self, point: Point) -> Vec<Intent> {
        let Some(listeners) = self.listeners.as_mut() else {
            return self
                .pressed_link
                .take()
                .map(|href| Intent::Navigate { href })
                .into_iter()
                .collect();
        };
        let events = listeners.gesture.pointer_up(&self.tree, &self.surface, point);
        self.dispatch(events)
    }

    /// Only bound while listeners are attached
    pub fn key(&self, chord: KeyChord) -> Option<HistoryCommand> {
        self.listeners.as_ref()?.shortcuts.resolve(chord)
    }

    /// Detach listeners and clear affordances
    pub fn unmount(&mut self) {
        self.listeners = None;
        self.pressed_link = None;
        self.surface.clear_outlines();
    }

    fn dispatch(&mut self, events: Vec<GestureEvent>) -> Vec<Intent> {
        let mut intents = Vec::new();
        for event in events {
            match event {
                GestureEvent::Outline { path, affordance } => self.surface.set_outline(&path, affordance),
                GestureEvent::ClearOutline { path } => self.surface.clear_outline(&path),
                GestureEvent::Select(selection) => intents.push(Intent::Select(selection)),
                GestureEvent::Reorder(request) => intents.push(Intent::Reorder(request)),
                GestureEvent::OpenContextMenu { path, anchor } => intents.push(Intent::ContextMenu { path, anchor }),
            }
        }
        intents
    }
}

/// `href` of the nearest enclosing link, the node itself included
fn link_href(tree: &Document, path: &NodePath) -> Option<String> {
    let node = decode(tree, path)?;
    std::iter::once(node.clone())
        .chain(node.ancestors())
        .filter_map(|n| n.element())
        .find(|el| el.tag == "a")
        .and_then(|el| el.attr("href"))
        .map(str::to_string)
}
