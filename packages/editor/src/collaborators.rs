//! # External Collaborators
//!
//! Wire contracts for the services the editor hands work to. Rewrite and
//! section generation are asynchronous round trips that answer with a full
//! replacement document, never a diff.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path::NodePath;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRequest {
    pub full_document: String,
    pub target_subtree_markup: String,
    pub target_path: NodePath,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResponse {
    pub updated_full_document: String,
}

/// Where a generated section goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "at", rename_all = "snake_case")]
pub enum SectionPosition {
    Start,
    End,
    After { path: NodePath },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub full_document: String,
    pub section_kind: String,
    pub descriptive_prompt: String,
    pub position: SectionPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub updated_full_document: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

pub trait RewriteService {
    fn rewrite(
        &self,
        request: RewriteRequest,
    ) -> impl Future<Output = Result<RewriteResponse, CollaboratorError>> + Send;
}

pub trait SectionService {
    fn generate_section(
        &self,
        request: SectionRequest,
    ) -> impl Future<Output = Result<SectionResponse, CollaboratorError>> + Send;
}

/// An issued request tagged with its generation. Only the most recently
/// issued generation may be completed.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket<R> {
    pub generation: u64,
    pub request: R,
}
