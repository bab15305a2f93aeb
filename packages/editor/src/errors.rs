//! Error types for the editor

use thiserror::Error;

use crate::collaborators::CollaboratorError;
use crate::mutations::MutationError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] retouch_parser::ParseError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("No node is selected")]
    NoSelection,
}
