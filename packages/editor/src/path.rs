//! # Node Paths
//!
//! Positional addressing of elements in a markup document.
//!
//! A path is the chain of `tag:nth-child(n)` selectors from the addressing
//! root (`<body>`, or the top level when there is no body) down to an
//! element, rendered as `div:nth-child(2) > section:nth-child(1)`. The
//! ordinal counts element siblings only, like the CSS `:nth-child`
//! pseudo-class.
//!
//! Paths are coordinates, not handles: any mutation can shift sibling
//! ordinals, so a path is only trusted against the document it was computed
//! from. Decoding a stale path yields `None`, never an error.

use std::fmt;
use std::str::FromStr;

use retouch_parser::{Document, Element, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SEPARATOR: char = '>';

/// One `tag:nth-child(n)` step; `ordinal` is 1-based
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub tag: String,
    pub ordinal: usize,
}

/// Positional address of an element. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathParseError {
    #[error("Malformed path segment: {0:?}")]
    MalformedSegment(String),

    #[error("Ordinal must be at least 1 in segment: {0:?}")]
    ZeroOrdinal(String),
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn parent(&self) -> Option<NodePath> {
        let (_, rest) = self.segments.split_last()?;
        Some(NodePath::new(rest.to_vec()))
    }

    pub fn child(&self, tag: impl Into<String>, ordinal: usize) -> NodePath {
        let mut segments = self.segments.clone();
        segments.push(PathSegment {
            tag: tag.into(),
            ordinal,
        });
        NodePath::new(segments)
    }

    /// True when `self` is `other` or lies inside it
    pub fn is_within(&self, other: &NodePath) -> bool {
        self.segments.len() >= other.segments.len()
            && self.segments[..other.segments.len()]
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a.ordinal == b.ordinal && a.tag.eq_ignore_ascii_case(&b.tag))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:nth-child({})", self.tag, self.ordinal)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for PathSegment {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PathParseError::MalformedSegment(s.to_string());

        let (tag, rest) = s.split_once(":nth-child(").ok_or_else(malformed)?;
        let ordinal = rest.strip_suffix(')').ok_or_else(malformed)?;

        let tag = tag.trim();
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-')) {
            return Err(malformed());
        }

        let ordinal: usize = ordinal.trim().parse().map_err(|_| malformed())?;
        if ordinal == 0 {
            return Err(PathParseError::ZeroOrdinal(s.to_string()));
        }

        Ok(PathSegment {
            tag: tag.to_ascii_lowercase(),
            ordinal,
        })
    }
}

impl FromStr for NodePath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(NodePath::root());
        }

        let segments = s
            .split(SEPARATOR)
            .map(|segment| segment.trim().parse())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NodePath::new(segments))
    }
}

impl TryFrom<String> for NodePath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

/// Borrowed handle on an element (or the root) within a parsed document
///
/// Holds the chain of child indices from the root, which gives parent
/// navigation without parent pointers in the tree. Indices refer to the full
/// child lists, text and comments included. The root's child list is
/// resolved once and shared by every handle derived from this one.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    root: &'a [Node],
    chain: Vec<usize>,
}

impl<'a> NodeRef<'a> {
    pub fn root(doc: &'a Document) -> Self {
        Self {
            doc,
            root: doc.root_children(),
            chain: Vec::new(),
        }
    }

    fn with_chain(&self, chain: Vec<usize>) -> NodeRef<'a> {
        NodeRef {
            doc: self.doc,
            root: self.root,
            chain,
        }
    }

    fn children_at(&self, chain: &[usize]) -> Option<&'a [Node]> {
        let mut children = self.root;
        for &index in chain {
            children = &children.get(index)?.as_element()?.children;
        }
        Some(children)
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn chain(&self) -> &[usize] {
        &self.chain
    }

    pub fn is_root(&self) -> bool {
        self.chain.is_empty()
    }

    /// The element this handle points at; `None` for the root
    pub fn element(&self) -> Option<&'a Element> {
        let (&last, parent) = self.chain.split_last()?;
        self.children_at(parent)?.get(last)?.as_element()
    }

    pub fn node(&self) -> Option<&'a Node> {
        let (&last, parent) = self.chain.split_last()?;
        self.children_at(parent)?.get(last)
    }

    pub fn children(&self) -> &'a [Node] {
        self.children_at(&self.chain).unwrap_or(&[])
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let (_, parent) = self.chain.split_last()?;
        Some(self.with_chain(parent.to_vec()))
    }

    /// Ancestors from the parent up to and including the root
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> {
        std::iter::successors(self.parent(), NodeRef::parent)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        self.children()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_element())
            .map(move |(index, _)| {
                let mut chain = self.chain.clone();
                chain.push(index);
                self.with_chain(chain)
            })
    }

    /// 1-based position among element siblings; `None` for the root
    pub fn ordinal(&self) -> Option<usize> {
        let (&last, _) = self.chain.split_last()?;
        let siblings = self.parent()?.children();
        Some(
            siblings
                .get(..=last)?
                .iter()
                .filter(|node| node.is_element())
                .count(),
        )
    }

    /// True when `self` is `other` or one of its descendants
    pub fn is_within(&self, other: &NodeRef<'_>) -> bool {
        self.chain.starts_with(&other.chain)
    }

    pub fn path(&self) -> NodePath {
        encode(self)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.chain == other.chain
    }
}

/// Compute the positional path of a node by walking up to the root
pub fn encode(node: &NodeRef<'_>) -> NodePath {
    let mut segments = Vec::with_capacity(node.chain.len());
    let mut current = node.clone();

    while let (Some(element), Some(ordinal)) = (current.element(), current.ordinal()) {
        segments.push(PathSegment {
            tag: element.tag.clone(),
            ordinal,
        });
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }

    segments.reverse();
    NodePath::new(segments)
}

/// Resolve a path against a document; `None` when it no longer matches
pub fn decode<'a>(doc: &'a Document, path: &NodePath) -> Option<NodeRef<'a>> {
    let mut node = NodeRef::root(doc);

    for segment in path.segments() {
        let index = segment.ordinal.checked_sub(1)?;
        let child = node.child_elements().nth(index)?;
        if !child.element()?.tag.eq_ignore_ascii_case(&segment.tag) {
            return None;
        }
        node = child;
    }

    Some(node)
}

/// Every element under the root, in document order
pub fn descendants(doc: &Document) -> Vec<NodeRef<'_>> {
    fn walk<'a>(node: &NodeRef<'a>, out: &mut Vec<NodeRef<'a>>) {
        for child in node.child_elements() {
            out.push(child.clone());
            walk(&child, out);
        }
    }

    let mut out = Vec::new();
    walk(&NodeRef::root(doc), &mut out);
    out
}
