//! # Retouch Editor
//!
//! Interactive editing core for serialized markup documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ sandbox: surface + gesture/key listeners    │
//! │  - full reload on every document change     │
//! │  - reports Select / Reorder / ContextMenu   │
//! └─────────────────────────────────────────────┘
//!                     ↓ intents
//! ┌─────────────────────────────────────────────┐
//! │ session: document + history owner           │
//! │  - path-based mutations                     │
//! │  - bounded undo/redo                        │
//! │  - generation-checked collaborator replies  │
//! └─────────────────────────────────────────────┘
//!                     ↓ new document string
//! ┌─────────────────────────────────────────────┐
//! │ history push, then sandbox remount          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The string is the document**: trees are parsed per operation and
//!    thrown away
//! 2. **Paths are coordinates**: recompute after every mutation; a stale
//!    path is a no-op
//! 3. **Listeners are scoped**: they exist only while edit mode is on
//!
//! ## Usage
//!
//! ```rust
//! use retouch_editor::{BlockLayoutSurface, EditorConfig, EditorSession, Mutation};
//!
//! let doc = r#"<body><section id="a">X</section><section id="b">Y</section></body>"#;
//! let mut session = EditorSession::new(doc, BlockLayoutSurface::new(1024.0), EditorConfig::default())?;
//!
//! session.apply(Mutation::MoveDown { path: "section:nth-child(1)".parse()? })?;
//! assert_eq!(
//!     session.document(),
//!     r#"<body><section id="b">Y</section><section id="a">X</section></body>"#
//! );
//!
//! session.undo()?;
//! assert_eq!(session.document(), doc);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod classify;
mod collaborators;
mod config;
mod context_menu;
mod errors;
mod geometry;
mod gesture;
mod history;
mod keyboard;
mod mutations;
pub mod path;
mod sandbox;
mod session;
mod store;

pub use classify::{Classifier, ClassifierConfig, NodeKind, CONTAINER_TAGS, STRUCTURAL_TAGS};
pub use collaborators::{
    CollaboratorError, RewriteRequest, RewriteResponse, RewriteService, SectionPosition, SectionRequest,
    SectionResponse, SectionService, Ticket,
};
pub use config::EditorConfig;
pub use context_menu::{ContextMenu, MenuAction, MenuCommand, MenuItem};
pub use errors::EditorError;
pub use geometry::{Point, Rect};
pub use gesture::{
    Affordance, DragSession, GestureConfig, GestureEngine, GestureEvent, GesturePhase, HitTest, PointerButton,
    ReorderRequest, Selection,
};
pub use history::{History, Snapshot, DEFAULT_HISTORY_LIMIT};
pub use keyboard::{HistoryCommand, KeyChord, Shortcuts};
pub use mutations::{DropPosition, Mutation, MutationError, MutationOutcome};
pub use path::{NodePath, NodeRef, PathParseError, PathSegment};
pub use sandbox::{BlockLayoutSurface, EditMode, Intent, Listeners, PreviewSurface, Sandbox};
pub use session::{Completion, EditorSession};
pub use store::{DocumentStore, FileStore, SaveRequest, StoredRecord};

// Re-export the tree types for convenience
pub use retouch_parser::{Document, Element, Node};
