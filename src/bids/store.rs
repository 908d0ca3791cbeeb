//! Authoritative view of bids per project and the confirm transition
//!
//! The confirmed-bid slot for every project lives behind a single lock, so
//! confirm is an atomic check-and-set rather than a read-then-write pair.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::types::{Bid, BidId, BidStatus};
use crate::external::bidding::BidSource;
use crate::external::records::{ProjectId, RecordPatch, RecordStore};
use crate::workflow::WorkflowError;

pub struct BidStore {
    source: Arc<dyn BidSource>,
    records: Arc<dyn RecordStore>,
    // project -> bids in source order
    bids: Arc<Mutex<HashMap<ProjectId, Vec<Bid>>>>,
}

impl BidStore {
    pub fn new(source: Arc<dyn BidSource>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            source,
            records,
            bids: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Bids for a project, in the order the source supplies them.
    ///
    /// A project unknown upstream fails with the source's `NotFound`.
    /// Re-ingesting never regresses a locally confirmed bid back to pending.
    pub async fn list_bids(&self, project_id: &str) -> Result<Vec<Bid>, WorkflowError> {
        let mut fetched = self.source.fetch_bids(project_id).await?;

        let mut bids = self.bids.lock().await;
        let entry = bids.entry(project_id.to_string()).or_default();
        if let Some(confirmed_id) = entry.iter().find(|b| b.is_confirmed()).map(|b| b.id) {
            for bid in &mut fetched {
                if bid.id == confirmed_id {
                    bid.status = BidStatus::Confirmed;
                }
            }
        }
        *entry = fetched.clone();

        Ok(fetched)
    }

    /// Read-only lookup across ingested projects. Non-blocking with respect
    /// to a racing confirm: observes either the pre- or post-state.
    pub async fn get_bid(&self, bid_id: BidId) -> Result<Bid, WorkflowError> {
        let bids = self.bids.lock().await;
        bids.values()
            .flatten()
            .find(|b| b.id == bid_id)
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound {
                resource: format!("bid {bid_id}"),
            })
    }

    /// One-way pending -> confirmed transition.
    ///
    /// Confirming an already-confirmed bid is an idempotent success.
    /// Confirming while a different bid holds the project's confirmed slot is
    /// a `Conflict`. The status write and the owning record's `has_bid` flag
    /// commit together: the store lock is held across the record write and
    /// the status is rolled back if that write fails, so a racing confirm for
    /// the same project observes either the pre-state or the fully committed
    /// post-state, never a split.
    pub async fn confirm_bid(&self, bid_id: BidId) -> Result<Bid, WorkflowError> {
        let mut bids = self.bids.lock().await;

        let list = bids
            .values_mut()
            .find(|list| list.iter().any(|b| b.id == bid_id))
            .ok_or_else(|| WorkflowError::NotFound {
                resource: format!("bid {bid_id}"),
            })?;

        if let Some(existing) = list.iter().find(|b| b.is_confirmed()) {
            if existing.id == bid_id {
                info!(bid = bid_id, "bid already confirmed, idempotent success");
                return Ok(existing.clone());
            }
            return Err(WorkflowError::Conflict {
                project_id: existing.project_id.clone(),
                confirmed: existing.id,
                attempted: bid_id,
            });
        }

        let idx = list
            .iter()
            .position(|b| b.id == bid_id)
            .ok_or_else(|| WorkflowError::NotFound {
                resource: format!("bid {bid_id}"),
            })?;
        let project_id = list[idx].project_id.clone();

        let record = self.records.fetch_by_project(&project_id).await?;

        list[idx].status = BidStatus::Confirmed;
        if let Err(err) = self
            .records
            .update_record(&record.email, &RecordPatch::bid_confirmed())
            .await
        {
            list[idx].status = BidStatus::Pending;
            warn!(
                bid = bid_id,
                project = %project_id,
                "record update failed, bid confirmation rolled back"
            );
            return Err(err.into());
        }

        info!(
            bid = bid_id,
            project = %project_id,
            user = %record.email,
            "bid confirmed"
        );
        Ok(list[idx].clone())
    }

    /// Confirmed bid for a project, if any
    pub async fn confirmed_bid(&self, project_id: &str) -> Option<Bid> {
        let bids = self.bids.lock().await;
        bids.get(project_id)
            .and_then(|list| list.iter().find(|b| b.is_confirmed()).cloned())
    }
}
