use std::collections::HashMap;

use retouch_parser::{Document, Node};

use super::PreviewSurface;
use crate::geometry::{Point, Rect};
use crate::gesture::{Affordance, HitTest};
use crate::path::{NodePath, NodeRef};

const LINE_HEIGHT: f64 = 20.0;
const INDENT: f64 = 16.0;
const PADDING: f64 = 4.0;

/// Elements that take no space
const HIDDEN: &[&str] = &["head", "script", "style", "template", "meta", "link", "title"];

/// In-memory surface that stacks every element as a block
///
/// Each element is a full-width box indented by its depth. A box is as tall
/// as its children plus one line if it holds text of its own, and never
/// shorter than one line.
#[derive(Debug, Clone, Default)]
pub struct BlockLayoutSurface {
    viewport_width: f64,
    /// Document order, so descendants follow their ancestors
    boxes: Vec<(NodePath, Rect)>,
    outlines: HashMap<NodePath, Affordance>,
    content_height: f64,
    height: f64,
    loads: usize,
}

impl BlockLayoutSurface {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            ..Self::default()
        }
    }

    pub fn boxes(&self) -> &[(NodePath, Rect)] {
        &self.boxes
    }

    pub fn outlines(&self) -> &HashMap<NodePath, Affordance> {
        &self.outlines
    }

    pub fn outline(&self, path: &NodePath) -> Option<Affordance> {
        self.outlines.get(path).copied()
    }

    /// Height the surface was last resized to
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn loads(&self) -> usize {
        self.loads
    }

    fn layout(&mut self, node: &NodeRef<'_>, path: &NodePath, depth: usize, mut y: f64) -> f64 {
        for (ordinal, child) in node.child_elements().enumerate() {
            let Some(element) = child.element() else {
                continue;
            };
            if HIDDEN.contains(&element.tag.as_str()) {
                continue;
            }

            let child_path = path.child(element.tag.clone(), ordinal + 1);
            let x = depth as f64 * INDENT;
            let width = (self.viewport_width - 2.0 * x).max(0.0);
            let top = y;

            let slot = self.boxes.len();
            self.boxes.push((child_path.clone(), Rect::default()));

            let has_text = element
                .children
                .iter()
                .any(|n| matches!(n, Node::Text { content } if !content.trim().is_empty()));
            let mut cursor = top + PADDING;
            if has_text {
                cursor += LINE_HEIGHT;
            }
            cursor = self.layout(&child, &child_path, depth + 1, cursor);
            if cursor < top + PADDING + LINE_HEIGHT {
                cursor = top + PADDING + LINE_HEIGHT;
            }
            cursor += PADDING;

            self.boxes[slot].1 = Rect::new(x, top, width, cursor - top);
            y = cursor;
        }
        y
    }
}

impl HitTest for BlockLayoutSurface {
    fn hit_test(&self, point: Point) -> Vec<NodePath> {
        self.boxes
            .iter()
            .rev()
            .filter(|(_, rect)| rect.contains(point))
            .map(|(path, _)| path.clone())
            .collect()
    }

    fn bounds(&self, path: &NodePath) -> Option<Rect> {
        self.boxes.iter().find(|(p, _)| p == path).map(|(_, rect)| *rect)
    }
}

impl PreviewSurface for BlockLayoutSurface {
    fn load(&mut self, doc: &Document) {
        self.boxes.clear();
        self.outlines.clear();
        self.content_height = self.layout(&NodeRef::root(doc), &NodePath::root(), 0, 0.0);
        self.loads += 1;
    }

    fn content_height(&self) -> f64 {
        self.content_height
    }

    fn resize(&mut self, height: f64) {
        self.height = height;
    }

    fn set_outline(&mut self, path: &NodePath, affordance: Affordance) {
        self.outlines.insert(path.clone(), affordance);
    }

    fn clear_outline(&mut self, path: &NodePath) {
        self.outlines.remove(path);
    }

    fn clear_outlines(&mut self) {
        self.outlines.clear();
    }
}
