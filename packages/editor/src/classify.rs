//! # Node Classification
//!
//! Decides whether an element is a reorderable section or a leaf rewrite
//! target. Classification is a pure function of the element's tag and its
//! current children, so the same node can change class after a mutation
//! changes its shape.

use retouch_parser::Element;
use serde::{Deserialize, Serialize};

use crate::path::NodeRef;

/// Tags that are always sections
pub const STRUCTURAL_TAGS: &[&str] = &["section", "article", "header", "footer", "nav", "aside", "main"];

/// Tags that are sections only when they group enough content
pub const CONTAINER_TAGS: &[&str] = &["div", "ul", "ol", "figure", "form"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Reorderable section: drag source and drop target
    Draggable,
    /// Leaf rewrite target only
    EditableOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierConfig {
    /// Text length above which a single-child container still counts as a section
    pub text_threshold: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { text_threshold: 100 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// First matching rule wins:
    /// 1. structural tag
    /// 2. container with two or more element children, or with exactly one
    ///    child and more text than the threshold
    /// 3. everything else is editable only
    pub fn classify(&self, element: &Element) -> NodeKind {
        let tag = element.tag.as_str();

        if STRUCTURAL_TAGS.contains(&tag) {
            return NodeKind::Draggable;
        }

        if CONTAINER_TAGS.contains(&tag) {
            let children = element.element_count();
            if children >= 2 {
                return NodeKind::Draggable;
            }
            if children == 1 && element.text_content().trim().chars().count() > self.config.text_threshold {
                return NodeKind::Draggable;
            }
        }

        NodeKind::EditableOnly
    }

    /// Classify a node handle; the root is never draggable
    pub fn classify_node(&self, node: &NodeRef<'_>) -> NodeKind {
        match node.element() {
            Some(element) => self.classify(element),
            None => NodeKind::EditableOnly,
        }
    }

    pub fn is_draggable(&self, node: &NodeRef<'_>) -> bool {
        self.classify_node(node) == NodeKind::Draggable
    }

    /// Walk up from `node` (inclusive) to the first draggable element,
    /// stopping before the root
    pub fn nearest_draggable<'a>(&self, node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
        std::iter::once(node.clone())
            .chain(node.ancestors())
            .take_while(|n| !n.is_root())
            .find(|n| self.is_draggable(n))
    }
}
