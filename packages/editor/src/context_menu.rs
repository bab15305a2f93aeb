//! Right-click command list. Every structural command reduces to the same
//! path-based [`Mutation`]s that drag-and-drop uses.

use retouch_parser::{serialize_node, Document};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::gesture::Selection;
use crate::mutations::Mutation;
use crate::path::{decode, NodePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuCommand {
    Rewrite,
    Duplicate,
    MoveUp,
    MoveDown,
    Delete,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 5] = [
        MenuCommand::Rewrite,
        MenuCommand::Duplicate,
        MenuCommand::MoveUp,
        MenuCommand::MoveDown,
        MenuCommand::Delete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuCommand::Rewrite => "Rewrite with AI",
            MenuCommand::Duplicate => "Duplicate",
            MenuCommand::MoveUp => "Move Up",
            MenuCommand::MoveDown => "Move Down",
            MenuCommand::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub command: MenuCommand,
    pub label: &'static str,
    pub enabled: bool,
}

/// What choosing a command asks the session to do
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    Rewrite(Selection),
    Mutate(Mutation),
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub path: NodePath,
    pub anchor: Point,
    /// Outer markup of the node when the menu opened
    pub markup: String,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    /// `None` for the root or a path that does not resolve
    pub fn open(doc: &Document, path: &NodePath, anchor: Point) -> Option<Self> {
        let node = decode(doc, path).filter(|node| !node.is_root())?;
        let ordinal = node.ordinal()?;
        let siblings = node.parent()?.child_elements().count();
        let markup = serialize_node(node.node()?);

        let items = MenuCommand::ALL
            .into_iter()
            .map(|command| MenuItem {
                command,
                label: command.label(),
                enabled: match command {
                    MenuCommand::MoveUp => ordinal > 1,
                    MenuCommand::MoveDown => ordinal < siblings,
                    _ => true,
                },
            })
            .collect();

        Some(Self {
            path: path.clone(),
            anchor,
            markup,
            items,
        })
    }

    pub fn item(&self, command: MenuCommand) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.command == command)
    }

    /// Consumes the menu; a disabled command does nothing
    pub fn choose(self, command: MenuCommand) -> MenuAction {
        if !self.item(command).is_some_and(|item| item.enabled) {
            return MenuAction::Nothing;
        }

        let path = self.path;
        match command {
            MenuCommand::Rewrite => MenuAction::Rewrite(Selection {
                path,
                markup: self.markup,
            }),
            MenuCommand::Duplicate => MenuAction::Mutate(Mutation::Duplicate { path }),
            MenuCommand::MoveUp => MenuAction::Mutate(Mutation::MoveUp { path }),
            MenuCommand::MoveDown => MenuAction::Mutate(Mutation::MoveDown { path }),
            MenuCommand::Delete => MenuAction::Mutate(Mutation::Remove { path }),
        }
    }
}
