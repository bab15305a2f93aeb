use serde::{Deserialize, Serialize};

/// A key press with its modifiers; `primary` is Ctrl or Cmd depending on
/// the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: char,
    pub primary: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: char) -> Self {
        Self {
            key,
            primary: false,
            shift: false,
        }
    }

    pub fn primary(key: char) -> Self {
        Self {
            key,
            primary: true,
            shift: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryCommand {
    Undo,
    Redo,
}

/// Undo/redo bindings
#[derive(Debug, Clone, Copy, Default)]
pub struct Shortcuts;

impl Shortcuts {
    /// Primary+Z undoes; Primary+Y and Primary+Shift+Z redo
    pub fn resolve(&self, chord: KeyChord) -> Option<HistoryCommand> {
        if !chord.primary {
            return None;
        }
        match (chord.key.to_ascii_lowercase(), chord.shift) {
            ('z', false) => Some(HistoryCommand::Undo),
            ('z', true) | ('y', false) => Some(HistoryCommand::Redo),
            _ => None,
        }
    }
}
