//! ProjectWorkflow - composes BidStore and ThreadBinder
//!
//! The unit administrators interact with. Every operation loads the
//! persisted record, derives the lifecycle stage from it, and only then
//! touches state, so presentation layers can never mutate shared state
//! directly.

use std::sync::Arc;

use tracing::info;

use super::state_machine::{ProjectEvent, ProjectLifecycle, WorkflowStage};
use super::WorkflowError;
use crate::bids::{Bid, BidId, BidStore};
use crate::external::bidding::BidSource;
use crate::external::messaging::MessagingOps;
use crate::external::records::{RecordStore, ThreadId, UserRecord};
use crate::threads::ThreadBinder;

pub struct ProjectWorkflow {
    records: Arc<dyn RecordStore>,
    bids: BidStore,
    threads: ThreadBinder,
}

impl ProjectWorkflow {
    pub fn new(
        records: Arc<dyn RecordStore>,
        source: Arc<dyn BidSource>,
        messaging: Arc<dyn MessagingOps>,
    ) -> Self {
        Self {
            bids: BidStore::new(source, Arc::clone(&records)),
            threads: ThreadBinder::new(messaging, Arc::clone(&records)),
            records,
        }
    }

    /// Current record plus derived workflow stage. Side-effect-free.
    pub async fn user_details(
        &self,
        user_id: &str,
    ) -> Result<(UserRecord, WorkflowStage), WorkflowError> {
        let record = self.records.fetch_user(user_id).await?;
        let stage = WorkflowStage::from_record(&record);
        Ok((record, stage))
    }

    /// Bids for a project, in source order. A read: the observable stage
    /// moves to BidsSolicited but nothing is persisted.
    pub async fn list_bids(&self, project_id: &str) -> Result<Vec<Bid>, WorkflowError> {
        let record = self.records.fetch_by_project(project_id).await?;
        let mut lifecycle = ProjectLifecycle::from_record(&record);
        if !lifecycle.has_bid() {
            lifecycle.handle(ProjectEvent::SolicitBids)?;
        }
        self.bids.list_bids(project_id).await
    }

    /// Confirm the chosen bid for its project.
    ///
    /// The lifecycle guards the forward-only progression; the store performs
    /// the atomic check-and-set that makes the transition safe against
    /// duplicate submissions.
    pub async fn confirm_bid(&self, bid_id: BidId) -> Result<Bid, WorkflowError> {
        let bid = self.bids.get_bid(bid_id).await?;
        let record = self.records.fetch_by_project(&bid.project_id).await?;

        let mut lifecycle = ProjectLifecycle::from_record(&record);
        if !lifecycle.has_bid() {
            lifecycle.handle(ProjectEvent::SolicitBids)?;
        }
        lifecycle.handle(ProjectEvent::ConfirmBid { bid_id })?;

        let confirmed = self.bids.confirm_bid(bid_id).await?;
        info!(
            bid = confirmed.id,
            project = %confirmed.project_id,
            stage = %lifecycle.stage(),
            "bid confirmation committed"
        );
        Ok(confirmed)
    }

    /// Resolve the project's communication thread and bind it to the owning
    /// record. Requires a confirmed bid.
    pub async fn establish_thread(
        &self,
        project_id: &str,
    ) -> Result<(ThreadId, UserRecord), WorkflowError> {
        let record = self.records.fetch_by_project(project_id).await?;

        let mut lifecycle = ProjectLifecycle::from_record(&record);
        if !lifecycle.has_bid() {
            return Err(WorkflowError::Precondition {
                reason: format!(
                    "project {project_id} has no confirmed bid; thread binding requires one"
                ),
            });
        }

        let thread_id = self.threads.resolve_thread(project_id).await?;
        self.threads.bind_thread(&record.email, &thread_id).await?;
        lifecycle.handle(ProjectEvent::EstablishThread {
            thread_id: thread_id.clone(),
        })?;

        let updated = self.records.fetch_by_email(&record.email).await?;
        Ok((thread_id, updated))
    }

    /// Read-only bid lookup for glue operations such as invoicing
    pub async fn bid_details(&self, bid_id: BidId) -> Result<Bid, WorkflowError> {
        self.bids.get_bid(bid_id).await
    }

    /// Record owning a project, for glue operations
    pub async fn record_for_project(&self, project_id: &str) -> Result<UserRecord, WorkflowError> {
        Ok(self.records.fetch_by_project(project_id).await?)
    }
}
