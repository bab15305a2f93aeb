//! # Editor Session
//!
//! The top-level editor view. Owns the document and its history, the
//! sandbox that renders it, the current selection and context menu, and the
//! generation counter for outstanding collaborator requests.
//!
//! The document is whatever snapshot the history cursor points at. Every
//! change goes through [`EditorSession::commit`], which mounts the new markup
//! first and only records it once it has parsed, so a bad document can never
//! reach the history.

use tracing::{debug, info, warn};

use crate::collaborators::{
    CollaboratorError, RewriteRequest, RewriteResponse, RewriteService, SectionPosition, SectionRequest,
    SectionResponse, SectionService, Ticket,
};
use crate::config::EditorConfig;
use crate::context_menu::{ContextMenu, MenuAction, MenuCommand};
use crate::errors::EditorError;
use crate::geometry::Point;
use crate::gesture::{PointerButton, Selection};
use crate::history::History;
use crate::keyboard::{HistoryCommand, KeyChord};
use crate::mutations::Mutation;
use crate::path::NodePath;
use crate::sandbox::{EditMode, Intent, PreviewSurface, Sandbox};
use crate::store::{DocumentStore, SaveRequest, StoredRecord};

/// How a collaborator response was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response replaced the document
    Applied,
    /// The response was identical to the current document
    Unchanged,
    /// A newer request was issued, or the dialog closed; response dropped
    Stale,
}

pub struct EditorSession<S: PreviewSurface> {
    history: History,
    sandbox: Sandbox<S>,
    selection: Option<Selection>,
    menu: Option<ContextMenu>,
    generation: u64,
    in_flight: Option<u64>,
    saved_checksum: u32,
}

impl<S: PreviewSurface> EditorSession<S> {
    /// Mount `markup` in edit mode. The initial document counts as saved.
    pub fn new(markup: impl Into<String>, surface: S, config: EditorConfig) -> Result<Self, EditorError> {
        let markup = markup.into();
        let mut sandbox = Sandbox::new(surface, EditMode::Edit, config.clone());
        sandbox.mount(&markup)?;

        let history = History::with_limit(markup, config.history_limit);
        let saved_checksum = history.current().checksum();

        Ok(Self {
            history,
            sandbox,
            selection: None,
            menu: None,
            generation: 0,
            in_flight: None,
            saved_checksum,
        })
    }

    pub fn document(&self) -> &str {
        self.history.current().markup()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn sandbox(&self) -> &Sandbox<S> {
        &self.sandbox
    }

    pub fn sandbox_mut(&mut self) -> &mut Sandbox<S> {
        &mut self.sandbox
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation of the outstanding collaborator request, if any
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Pointer input

    pub fn pointer_over(&mut self, path: &NodePath) -> Result<Vec<Intent>, EditorError> {
        let intents = self.sandbox.pointer_over(path);
        self.handle(intents)
    }

    pub fn pointer_out(&mut self, path: &NodePath) -> Result<Vec<Intent>, EditorError> {
        let intents = self.sandbox.pointer_out(path);
        self.handle(intents)
    }

    pub fn pointer_down(
        &mut self,
        path: &NodePath,
        point: Point,
        button: PointerButton,
    ) -> Result<Vec<Intent>, EditorError> {
        let intents = self.sandbox.pointer_down(path, point, button);
        self.handle(intents)
    }

    pub fn pointer_move(&mut self, point: Point) -> Result<Vec<Intent>, EditorError> {
        let intents = self.sandbox.pointer_move(point);
        self.handle(intents)
    }

    pub fn pointer_up(&mut self, point: Point) -> Result<Vec<Intent>, EditorError> {
        let intents = self.sandbox.pointer_up(point);
        self.handle(intents)
    }

    /// Returns true if the key moved the history cursor
    pub fn key(&mut self, chord: KeyChord) -> Result<bool, EditorError> {
        match self.sandbox.key(chord) {
            Some(HistoryCommand::Undo) => self.undo(),
            Some(HistoryCommand::Redo) => self.redo(),
            None => Ok(false),
        }
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.sandbox.set_mode(mode);
        if mode == EditMode::Preview {
            self.menu = None;
        }
        info!(?mode, "edit mode changed");
    }

    // Context menu

    pub fn open_context_menu(&mut self, path: &NodePath, anchor: Point) -> Option<&ContextMenu> {
        self.menu = ContextMenu::open(self.sandbox.tree(), path, anchor);
        if self.menu.is_none() {
            debug!(%path, "no context menu for path");
        }
        self.menu.as_ref()
    }

    pub fn close_context_menu(&mut self) {
        self.menu = None;
    }

    /// Run a menu command. The menu closes whatever the command does.
    pub fn choose_command(&mut self, command: MenuCommand) -> Result<MenuAction, EditorError> {
        let Some(menu) = self.menu.take() else {
            return Ok(MenuAction::Nothing);
        };

        let action = menu.choose(command);
        match &action {
            MenuAction::Rewrite(selection) => self.selection = Some(selection.clone()),
            MenuAction::Mutate(mutation) => {
                self.apply(mutation.clone())?;
            }
            MenuAction::Nothing => {}
        }
        Ok(action)
    }

    // Mutations and history

    /// Apply a mutation to the current document. Returns false for a no-op.
    pub fn apply(&mut self, mutation: Mutation) -> Result<bool, EditorError> {
        let outcome = mutation.apply(self.document())?;
        if !outcome.changed {
            debug!(op = mutation.name(), path = %mutation.path(), "mutation was a no-op");
            return Ok(false);
        }

        let committed = self.commit(outcome.document)?;
        if committed {
            info!(op = mutation.name(), path = %mutation.path(), "applied mutation");
        }
        Ok(committed)
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.undo() else {
            return Ok(false);
        };
        let markup = snapshot.markup().to_string();
        self.remount(&markup)?;
        info!(cursor = self.history.cursor(), "undo");
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.redo() else {
            return Ok(false);
        };
        let markup = snapshot.markup().to_string();
        self.remount(&markup)?;
        info!(cursor = self.history.cursor(), "redo");
        Ok(true)
    }

    // Collaborators

    /// Issue a rewrite of the selected node
    pub fn begin_rewrite(&mut self, instruction: impl Into<String>) -> Result<Ticket<RewriteRequest>, EditorError> {
        let selection = self.selection.clone().ok_or(EditorError::NoSelection)?;
        let generation = self.issue();

        Ok(Ticket {
            generation,
            request: RewriteRequest {
                full_document: self.document().to_string(),
                target_subtree_markup: selection.markup,
                target_path: selection.path,
                instruction: instruction.into(),
            },
        })
    }

    pub fn complete_rewrite(
        &mut self,
        generation: u64,
        result: Result<RewriteResponse, CollaboratorError>,
    ) -> Result<Completion, EditorError> {
        let completion = self.complete(generation, result.map(|r| r.updated_full_document))?;
        if completion == Completion::Applied {
            self.selection = None;
        }
        Ok(completion)
    }

    pub fn begin_section(
        &mut self,
        section_kind: impl Into<String>,
        descriptive_prompt: impl Into<String>,
        position: SectionPosition,
    ) -> Ticket<SectionRequest> {
        let generation = self.issue();

        Ticket {
            generation,
            request: SectionRequest {
                full_document: self.document().to_string(),
                section_kind: section_kind.into(),
                descriptive_prompt: descriptive_prompt.into(),
                position,
            },
        }
    }

    pub fn complete_section(
        &mut self,
        generation: u64,
        result: Result<SectionResponse, CollaboratorError>,
    ) -> Result<Completion, EditorError> {
        self.complete(generation, result.map(|r| r.updated_full_document))
    }

    pub async fn rewrite_with<R: RewriteService>(
        &mut self,
        service: &R,
        instruction: impl Into<String>,
    ) -> Result<Completion, EditorError> {
        let ticket = self.begin_rewrite(instruction)?;
        let result = service.rewrite(ticket.request).await;
        self.complete_rewrite(ticket.generation, result)
    }

    pub async fn generate_section_with<G: SectionService>(
        &mut self,
        service: &G,
        section_kind: impl Into<String>,
        descriptive_prompt: impl Into<String>,
        position: SectionPosition,
    ) -> Result<Completion, EditorError> {
        let ticket = self.begin_section(section_kind, descriptive_prompt, position);
        let result = service.generate_section(ticket.request).await;
        self.complete_section(ticket.generation, result)
    }

    /// Drop the selection and stop listening for the outstanding response
    pub fn close_dialog(&mut self) {
        self.selection = None;
        if let Some(generation) = self.in_flight.take() {
            debug!(generation, "dialog closed with a request in flight");
        }
    }

    // Persistence

    pub fn save(
        &mut self,
        store: &impl DocumentStore,
        identifier: impl Into<String>,
        url_slug: impl Into<String>,
        publish: bool,
    ) -> Result<StoredRecord, EditorError> {
        let record = store.save(SaveRequest {
            identifier: identifier.into(),
            url_slug: url_slug.into(),
            document_markup: self.document().to_string(),
            publish,
        })?;
        self.saved_checksum = crc32fast::hash(record.document_markup.as_bytes());
        Ok(record)
    }

    /// True when the current document differs from the last save
    pub fn is_dirty(&self) -> bool {
        self.history.current().checksum() != self.saved_checksum
    }

    /// Mount `markup` and record it. Nothing is recorded if it fails to
    /// parse; returns false if it equals the current document.
    fn commit(&mut self, markup: String) -> Result<bool, EditorError> {
        if markup == self.document() {
            return Ok(false);
        }
        self.remount(&markup)?;
        Ok(self.history.push(markup))
    }

    /// Paths are only valid against the tree they came from, so the
    /// selection and menu go with the old tree.
    fn remount(&mut self, markup: &str) -> Result<(), EditorError> {
        self.sandbox.mount(markup)?;
        self.menu = None;
        if let Some(selection) = self.selection.take() {
            debug!(path = %selection.path, "selection dropped on remount");
        }
        Ok(())
    }

    fn issue(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        debug!(generation = self.generation, "request issued");
        self.generation
    }

    fn complete(&mut self, generation: u64, result: Result<String, CollaboratorError>) -> Result<Completion, EditorError> {
        if self.in_flight != Some(generation) {
            warn!(generation, latest = self.generation, "discarding stale response");
            return Ok(Completion::Stale);
        }
        self.in_flight = None;

        let markup = result.map_err(|err| {
            warn!(generation, error = %err, "collaborator request failed");
            err
        })?;

        if self.commit(markup)? {
            info!(generation, "applied collaborator response");
            Ok(Completion::Applied)
        } else {
            Ok(Completion::Unchanged)
        }
    }

    fn handle(&mut self, intents: Vec<Intent>) -> Result<Vec<Intent>, EditorError> {
        for intent in &intents {
            match intent {
                Intent::Select(selection) => {
                    self.menu = None;
                    self.selection = Some(selection.clone());
                }
                Intent::Reorder(request) => {
                    self.apply(request.clone().into())?;
                }
                Intent::ContextMenu { path, anchor } => {
                    self.open_context_menu(path, *anchor);
                }
                Intent::Navigate { .. } => {}
            }
        }
        Ok(intents)
    }
}
