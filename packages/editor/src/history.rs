//! # Undo/Redo History
//!
//! Linear log of whole-document snapshots with a cursor.
//!
//! ## Design
//!
//! - Every committed change pushes a full snapshot; nothing is diffed
//! - Pushing while the cursor is behind the end discards the redo tail
//! - The log is capped; the oldest snapshot is evicted first
//! - Undo and redo only move the cursor and are no-ops at either end
//!
//! ## Example
//!
//! ```rust
//! use retouch_editor::History;
//!
//! let mut history = History::new("<p>a</p>");
//! history.push("<p>b</p>");
//!
//! assert_eq!(history.undo().map(|s| s.markup()), Some("<p>a</p>"));
//! assert_eq!(history.redo().map(|s| s.markup()), Some("<p>b</p>"));
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Immutable copy of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    markup: Arc<str>,
    checksum: u32,
}

impl Snapshot {
    pub fn new(markup: impl Into<Arc<str>>) -> Self {
        let markup = markup.into();
        let checksum = crc32fast::hash(markup.as_bytes());
        Self { markup, checksum }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// CRC32 of the markup
    pub fn checksum(&self) -> u32 {
        self.checksum
    }
}

/// Bounded undo/redo log; `cursor` always points at the current snapshot
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Create a history holding one initial snapshot, with the default cap (50)
    pub fn new(initial: impl Into<Arc<str>>) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(initial: impl Into<Arc<str>>, limit: usize) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(Snapshot::new(initial));
        Self {
            snapshots,
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    /// Record a new current document. Returns false when `markup` equals the
    /// current snapshot and nothing was recorded.
    pub fn push(&mut self, markup: impl Into<Arc<str>>) -> bool {
        let snapshot = Snapshot::new(markup);
        if snapshot == *self.current() {
            return false;
        }

        let discarded = self.snapshots.len() - (self.cursor + 1);
        if discarded > 0 {
            debug!(discarded, "redo tail discarded");
        }
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(snapshot);

        while self.snapshots.len() > self.limit {
            if let Some(evicted) = self.snapshots.pop_front() {
                debug!(checksum = evicted.checksum(), limit = self.limit, "evicted oldest snapshot");
            }
        }

        self.cursor = self.snapshots.len() - 1;
        true
    }

    /// Step back one snapshot
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Step forward one snapshot
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// Drop all history and start over from `markup`
    pub fn reset(&mut self, markup: impl Into<Arc<str>>) {
        self.snapshots.clear();
        self.snapshots.push_back(Snapshot::new(markup));
        self.cursor = 0;
    }
}
