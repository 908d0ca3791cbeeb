//! Project workflow - the state machine from project creation to thread
//! establishment, and the typed error taxonomy every layer shares.

use serde::Serialize;
use thiserror::Error;

pub mod project;
pub mod state_machine;

pub use project::ProjectWorkflow;
pub use state_machine::{ProjectEvent, ProjectLifecycle, TransitionRecord, WorkflowStage};

use crate::bids::BidId;
use crate::external::records::ProjectId;
use crate::external::CollaboratorError;

/// Errors produced by workflow operations
///
/// BidStore and ThreadBinder never swallow errors; they propagate these
/// unchanged through ProjectWorkflow to AdminGateway, which is the only layer
/// allowed to turn them into user-facing text.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error(
        "project {project_id} already has confirmed bid {confirmed}; cannot confirm bid {attempted}"
    )]
    Conflict {
        project_id: ProjectId,
        confirmed: BidId,
        attempted: BidId,
    },
    #[error("precondition not met: {reason}")]
    Precondition { reason: String },
    #[error("collaborator unavailable: {source}")]
    Transport { source: CollaboratorError },
}

/// Machine-readable error kind, preserved across layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Precondition,
    Transport,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Precondition => "precondition",
            ErrorKind::Transport => "transport",
        };
        write!(f, "{kind}")
    }
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::NotFound { .. } => ErrorKind::NotFound,
            WorkflowError::Conflict { .. } => ErrorKind::Conflict,
            WorkflowError::Precondition { .. } => ErrorKind::Precondition,
            WorkflowError::Transport { .. } => ErrorKind::Transport,
        }
    }
}

impl From<CollaboratorError> for WorkflowError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            // an upstream 404 keeps its meaning instead of degrading to transport
            CollaboratorError::NotFound { resource } => WorkflowError::NotFound { resource },
            other => WorkflowError::Transport { source: other },
        }
    }
}
