//! Project lifecycle state machine
//!
//! Forward-only progression from "no project" to "thread established". The
//! boolean flags on the persisted record (`has_project`, `has_bid`) are
//! derived views of the current stage, never independent mutable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::WorkflowError;
use crate::bids::BidId;
use crate::external::records::{ProjectId, ThreadId, UserRecord};

/// Stages in order; later stages imply all earlier ones.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    #[default]
    NoProject,
    ProjectCreated,
    BidsSolicited,
    BidConfirmed,
    ThreadEstablished,
}

impl WorkflowStage {
    /// Derive the stage from a persisted record. The flags are evidence of
    /// past transitions; `thread_id` set implies a confirmed bid implies a
    /// project.
    pub fn from_record(record: &UserRecord) -> Self {
        if record.thread_id.is_some() {
            WorkflowStage::ThreadEstablished
        } else if record.has_bid {
            WorkflowStage::BidConfirmed
        } else if record.has_project || record.project_id.is_some() {
            WorkflowStage::ProjectCreated
        } else {
            WorkflowStage::NoProject
        }
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WorkflowStage::NoProject => "No Project",
            WorkflowStage::ProjectCreated => "Project Created",
            WorkflowStage::BidsSolicited => "Bids Solicited",
            WorkflowStage::BidConfirmed => "Bid Confirmed",
            WorkflowStage::ThreadEstablished => "Thread Established",
        };
        write!(f, "{label}")
    }
}

/// Events that drive the lifecycle forward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectEvent {
    CreateProject { project_id: ProjectId },
    SolicitBids,
    ConfirmBid { bid_id: BidId },
    EstablishThread { thread_id: ThreadId },
}

/// Audit record of a single transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: WorkflowStage,
    pub to: WorkflowStage,
    pub event: ProjectEvent,
    pub at: DateTime<Utc>,
}

/// The lifecycle of a single user/project
#[derive(Debug, Default)]
pub struct ProjectLifecycle {
    stage: WorkflowStage,
    project_id: Option<ProjectId>,
    confirmed_bid: Option<BidId>,
    thread_id: Option<ThreadId>,
    history: Vec<TransitionRecord>,
}

impl ProjectLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the lifecycle from a persisted record.
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            stage: WorkflowStage::from_record(record),
            project_id: record.project_id.clone(),
            confirmed_bid: None,
            thread_id: record.thread_id.clone(),
            history: Vec::new(),
        }
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn confirmed_bid(&self) -> Option<BidId> {
        self.confirmed_bid
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Derived view: a project exists
    pub fn has_project(&self) -> bool {
        self.stage >= WorkflowStage::ProjectCreated
    }

    /// Derived view: a bid has been confirmed
    pub fn has_bid(&self) -> bool {
        self.stage >= WorkflowStage::BidConfirmed
    }

    /// Derived view: a thread is bound
    pub fn thread_established(&self) -> bool {
        self.stage >= WorkflowStage::ThreadEstablished
    }

    /// Apply an event. Transitions only move forward; an event arriving in a
    /// stage that has not earned it yet fails with `Precondition` and leaves
    /// the stage untouched.
    pub fn handle(&mut self, event: ProjectEvent) -> Result<WorkflowStage, WorkflowError> {
        let next = match (self.stage, &event) {
            (WorkflowStage::NoProject, ProjectEvent::CreateProject { .. }) => {
                WorkflowStage::ProjectCreated
            }
            // soliciting again is a re-read, not a regression
            (
                WorkflowStage::ProjectCreated | WorkflowStage::BidsSolicited,
                ProjectEvent::SolicitBids,
            ) => WorkflowStage::BidsSolicited,
            (WorkflowStage::BidsSolicited, ProjectEvent::ConfirmBid { .. }) => {
                WorkflowStage::BidConfirmed
            }
            // the store enforces the single-slot invariant; a second confirm
            // only reaches the machine on the idempotent path
            (WorkflowStage::BidConfirmed, ProjectEvent::ConfirmBid { .. }) => {
                WorkflowStage::BidConfirmed
            }
            // a retried confirm stays valid after the thread is bound
            (WorkflowStage::ThreadEstablished, ProjectEvent::ConfirmBid { .. }) => {
                WorkflowStage::ThreadEstablished
            }
            (WorkflowStage::BidConfirmed, ProjectEvent::EstablishThread { .. }) => {
                WorkflowStage::ThreadEstablished
            }
            // rebinding overwrites, last writer wins
            (WorkflowStage::ThreadEstablished, ProjectEvent::EstablishThread { .. }) => {
                WorkflowStage::ThreadEstablished
            }
            (stage, event) => {
                return Err(WorkflowError::Precondition {
                    reason: format!("event {event:?} not allowed in stage '{stage}'"),
                });
            }
        };

        match &event {
            ProjectEvent::CreateProject { project_id } => {
                self.project_id = Some(project_id.clone());
            }
            ProjectEvent::SolicitBids => {}
            ProjectEvent::ConfirmBid { bid_id } => {
                self.confirmed_bid = Some(*bid_id);
            }
            ProjectEvent::EstablishThread { thread_id } => {
                self.thread_id = Some(thread_id.clone());
            }
        }

        let record = TransitionRecord {
            from: self.stage,
            to: next,
            event,
            at: Utc::now(),
        };
        info!(
            from = %record.from,
            to = %record.to,
            event = ?record.event,
            "project workflow transition"
        );
        self.history.push(record);
        self.stage = next;
        Ok(next)
    }
}
