//! # Document Mutations
//!
//! Path-addressed structural operations on a serialized document.
//!
//! ## Design Principles
//!
//! 1. **Pure**: every operation takes a document string and returns a new one;
//!    the working tree is parsed fresh and discarded afterwards
//! 2. **Stale paths are no-ops**: a path that no longer resolves returns the
//!    input unchanged, never an error
//! 3. **Root is immovable**: the addressing root cannot be moved, duplicated,
//!    removed or replaced
//!
//! ## Mutation Semantics
//!
//! ### Move
//! - Source and target are resolved against the same unmutated tree
//! - Moving a node next to itself or into its own subtree is a no-op
//! - A source already adjacent to the target on the requested side is a no-op
//!
//! ### ReplaceSubtree
//! - Tree surgery at the resolved path, never a text search
//! - Replacement markup that fails to parse is rejected and nothing changes

use retouch_parser::{parse, parse_fragment, serialize, Document, Node, ParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::path::{decode, NodePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPosition {
    Before,
    After,
}

/// Structural edit addressed by node path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Detach `source` and insert it next to `target`
    Move {
        source: NodePath,
        target: NodePath,
        position: DropPosition,
    },

    /// Insert a deep clone right after the node
    Duplicate { path: NodePath },

    /// Detach the subtree
    Remove { path: NodePath },

    /// Swap the subtree for freshly parsed markup
    ReplaceSubtree { path: NodePath, markup: String },

    /// Swap places with the previous element sibling
    MoveUp { path: NodePath },

    /// Swap places with the next element sibling
    MoveDown { path: NodePath },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Document could not be parsed: {0}")]
    Document(ParseError),

    #[error("Replacement markup could not be parsed: {0}")]
    Replacement(ParseError),

    #[error("Replacement markup is empty")]
    EmptyReplacement,
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub document: String,
    /// False when the operation was a no-op and `document` is the input
    pub changed: bool,
}

impl MutationOutcome {
    fn changed(tree: &Document) -> Self {
        Self {
            document: serialize(tree),
            changed: true,
        }
    }

    fn unchanged(doc: &str) -> Self {
        Self {
            document: doc.to_string(),
            changed: false,
        }
    }
}

impl Mutation {
    /// Apply to a document string
    pub fn apply(&self, doc: &str) -> Result<MutationOutcome, MutationError> {
        match self {
            Mutation::Move {
                source,
                target,
                position,
            } => move_node(doc, source, target, *position),
            Mutation::Duplicate { path } => duplicate(doc, path),
            Mutation::Remove { path } => remove(doc, path),
            Mutation::ReplaceSubtree { path, markup } => replace_subtree(doc, path, markup),
            Mutation::MoveUp { path } => move_up(doc, path),
            Mutation::MoveDown { path } => move_down(doc, path),
        }
    }

    /// The node the mutation acts on
    pub fn path(&self) -> &NodePath {
        match self {
            Mutation::Move { source, .. } => source,
            Mutation::Duplicate { path }
            | Mutation::Remove { path }
            | Mutation::ReplaceSubtree { path, .. }
            | Mutation::MoveUp { path }
            | Mutation::MoveDown { path } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Move { .. } => "move",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::Remove { .. } => "remove",
            Mutation::ReplaceSubtree { .. } => "replace_subtree",
            Mutation::MoveUp { .. } => "move_up",
            Mutation::MoveDown { .. } => "move_down",
        }
    }
}

pub fn move_node(
    doc: &str,
    source: &NodePath,
    target: &NodePath,
    position: DropPosition,
) -> Result<MutationOutcome, MutationError> {
    let mut tree = working_tree(doc)?;

    let (Some(src), Some(dst)) = (resolve(&tree, source), resolve(&tree, target)) else {
        debug!(%source, %target, "move: stale path");
        return Ok(MutationOutcome::unchanged(doc));
    };

    if move_chains(&mut tree, &src, dst, position) {
        Ok(MutationOutcome::changed(&tree))
    } else {
        Ok(MutationOutcome::unchanged(doc))
    }
}

pub fn duplicate(doc: &str, path: &NodePath) -> Result<MutationOutcome, MutationError> {
    let mut tree = working_tree(doc)?;

    let Some(chain) = resolve(&tree, path) else {
        debug!(%path, "duplicate: stale path");
        return Ok(MutationOutcome::unchanged(doc));
    };

    let Some((&index, parent)) = chain.split_last() else {
        return Ok(MutationOutcome::unchanged(doc));
    };
    let Some(siblings) = tree.root_children_at_mut(parent) else {
        return Ok(MutationOutcome::unchanged(doc));
    };

    let Some(clone) = siblings.get(index).cloned() else {
        return Ok(MutationOutcome::unchanged(doc));
    };
    siblings.insert(index + 1, clone);
    Ok(MutationOutcome::changed(&tree))
}

pub fn remove(doc: &str, path: &NodePath) -> Result<MutationOutcome, MutationError> {
    let mut tree = working_tree(doc)?;

    let detached = resolve(&tree, path).and_then(|chain| detach(&mut tree, &chain));
    match detached {
        Some(_) => Ok(MutationOutcome::changed(&tree)),
        None => {
            debug!(%path, "remove: stale path");
            Ok(MutationOutcome::unchanged(doc))
        }
    }
}

pub fn replace_subtree(doc: &str, path: &NodePath, markup: &str) -> Result<MutationOutcome, MutationError> {
    let replacement = parse_fragment(markup).map_err(MutationError::Replacement)?;
    if replacement.is_empty() {
        return Err(MutationError::EmptyReplacement);
    }

    let mut tree = working_tree(doc)?;

    let Some(chain) = resolve(&tree, path) else {
        debug!(%path, "replace_subtree: stale path");
        return Ok(MutationOutcome::unchanged(doc));
    };
    let Some((&index, parent)) = chain.split_last() else {
        return Ok(MutationOutcome::unchanged(doc));
    };
    let Some(siblings) = tree.root_children_at_mut(parent) else {
        return Ok(MutationOutcome::unchanged(doc));
    };

    siblings.splice(index..=index, replacement);
    Ok(MutationOutcome::changed(&tree))
}

pub fn move_up(doc: &str, path: &NodePath) -> Result<MutationOutcome, MutationError> {
    step(doc, path, DropPosition::Before)
}

pub fn move_down(doc: &str, path: &NodePath) -> Result<MutationOutcome, MutationError> {
    step(doc, path, DropPosition::After)
}

/// Move one element sibling towards the start (`Before`) or end (`After`)
fn step(doc: &str, path: &NodePath, direction: DropPosition) -> Result<MutationOutcome, MutationError> {
    let mut tree = working_tree(doc)?;

    let neighbour = resolve(&tree, path).and_then(|chain| {
        let (&index, parent) = chain.split_last()?;
        let siblings = tree.root_children_at(parent)?;
        let target = match direction {
            DropPosition::Before => previous_element(siblings, index)?,
            DropPosition::After => next_element(siblings, index)?,
        };
        let mut target_chain = parent.to_vec();
        target_chain.push(target);
        Some((chain, target_chain))
    });

    let Some((src, dst)) = neighbour else {
        debug!(%path, ?direction, "step: no sibling to swap with");
        return Ok(MutationOutcome::unchanged(doc));
    };

    if move_chains(&mut tree, &src, dst, direction) {
        Ok(MutationOutcome::changed(&tree))
    } else {
        Ok(MutationOutcome::unchanged(doc))
    }
}

fn working_tree(doc: &str) -> Result<Document, MutationError> {
    parse(doc).map_err(MutationError::Document)
}

/// Index chain of a non-root path, resolved against `tree`
fn resolve(tree: &Document, path: &NodePath) -> Option<Vec<usize>> {
    if path.is_root() {
        return None;
    }
    decode(tree, path).map(|node| node.chain().to_vec())
}

fn detach(tree: &mut Document, chain: &[usize]) -> Option<Node> {
    let (&index, parent) = chain.split_last()?;
    let siblings = tree.root_children_at_mut(parent)?;
    (index < siblings.len()).then(|| siblings.remove(index))
}

fn previous_element(siblings: &[Node], index: usize) -> Option<usize> {
    siblings[..index].iter().rposition(Node::is_element)
}

fn next_element(siblings: &[Node], index: usize) -> Option<usize> {
    siblings
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, node)| node.is_element())
        .map(|(i, _)| i)
}

/// Detach `src` and reinsert it beside `dst`. Both chains must come from the
/// same unmutated tree. Returns false if nothing moved.
fn move_chains(tree: &mut Document, src: &[usize], mut dst: Vec<usize>, position: DropPosition) -> bool {
    if dst.starts_with(src) {
        debug!("move: target is the source or inside it");
        return false;
    }

    let Some((&src_index, src_parent)) = src.split_last() else {
        return false;
    };

    if let Some((&dst_index, dst_parent)) = dst.split_last() {
        if src_parent == dst_parent {
            let already_there = tree.root_children_at(src_parent).and_then(|siblings| match position {
                DropPosition::Before => next_element(siblings, src_index),
                DropPosition::After => previous_element(siblings, src_index),
            });
            if already_there == Some(dst_index) {
                debug!("move: source already in place");
                return false;
            }
        }
    }

    let Some(node) = detach(tree, src) else {
        return false;
    };

    // detaching shifts later siblings of the source left by one
    let level = src_parent.len();
    if dst.len() > level && dst[..level] == *src_parent && dst[level] > src_index {
        dst[level] -= 1;
    }

    let Some((&dst_index, dst_parent)) = dst.split_last() else {
        return false;
    };
    let Some(siblings) = tree.root_children_at_mut(dst_parent) else {
        return false;
    };

    let at = match position {
        DropPosition::Before => dst_index,
        DropPosition::After => dst_index + 1,
    };
    siblings.insert(at.min(siblings.len()), node);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> NodePath {
        s.parse().unwrap()
    }

    const PAIR: &str = r#"<body><section id="a">X</section><section id="b">Y</section></body>"#;

    #[test]
    fn test_move_after() {
        let out = move_node(PAIR, &path("section:nth-child(1)"), &path("section:nth-child(2)"), DropPosition::After).unwrap();

        assert!(out.changed);
        assert_eq!(
            out.document,
            r#"<body><section id="b">Y</section><section id="a">X</section></body>"#
        );
    }

    #[test]
    fn test_move_already_in_place_is_noop() {
        let out = move_node(PAIR, &path("section:nth-child(1)"), &path("section:nth-child(2)"), DropPosition::Before).unwrap();

        assert!(!out.changed);
        assert_eq!(out.document, PAIR);
    }

    #[test]
    fn test_move_into_own_subtree_is_noop() {
        let doc = "<body><section><div><p>x</p></div></section></body>";
        let out = move_node(
            doc,
            &path("section:nth-child(1)"),
            &path("section:nth-child(1) > div:nth-child(1)"),
            DropPosition::After,
        )
        .unwrap();

        assert!(!out.changed);
    }

    #[test]
    fn test_root_path_is_noop() {
        let out = remove(PAIR, &NodePath::root()).unwrap();
        assert!(!out.changed);
        assert_eq!(out.document, PAIR);
    }

    #[test]
    fn test_replace_subtree_with_multiple_nodes() {
        let out = replace_subtree(PAIR, &path("section:nth-child(2)"), "<p>1</p><p>2</p>").unwrap();

        assert_eq!(
            out.document,
            r#"<body><section id="a">X</section><p>1</p><p>2</p></body>"#
        );
    }

    #[test]
    fn test_replace_subtree_rejects_bad_markup() {
        let err = replace_subtree(PAIR, &path("section:nth-child(1)"), "<p class=").unwrap_err();
        assert!(matches!(err, MutationError::Replacement(_)));

        let err = replace_subtree(PAIR, &path("section:nth-child(1)"), "   ").unwrap_err();
        assert_eq!(err, MutationError::EmptyReplacement);
    }

    #[test]
    fn test_move_up_and_down_at_boundaries() {
        let first = move_up(PAIR, &path("section:nth-child(1)")).unwrap();
        let last = move_down(PAIR, &path("section:nth-child(2)")).unwrap();
        assert!(!first.changed);
        assert!(!last.changed);

        let swapped = move_down(PAIR, &path("section:nth-child(1)")).unwrap();
        assert_eq!(
            swapped.document,
            r#"<body><section id="b">Y</section><section id="a">X</section></body>"#
        );
    }

    #[test]
    fn test_mutation_serde_shape() {
        let mutation = Mutation::Move {
            source: path("section:nth-child(1)"),
            target: path("section:nth-child(2)"),
            position: DropPosition::After,
        };
        let json = serde_json::to_value(&mutation).unwrap();

        assert_eq!(json["op"], "move");
        assert_eq!(json["source"], "section:nth-child(1)");
        assert_eq!(json["position"], "after");
    }
}
