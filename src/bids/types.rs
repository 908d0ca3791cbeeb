//! Core bid types

use serde::{Deserialize, Serialize};

use crate::external::records::ProjectId;

pub type BidId = u64;

/// One-way lifecycle: pending until the confirm transition, then confirmed.
/// Bids are never deleted within this workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    #[default]
    Pending,
    Confirmed,
}

/// An offer by a contractor to fulfill a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub project_id: ProjectId,
    pub bidder_id: String,
    /// Positive amount in minor currency units, currency-agnostic here
    pub amount: u64,
    pub description: String,
    /// Contractor reputation score supplied by the bid source
    pub score: f64,
    #[serde(default)]
    pub status: BidStatus,
}

impl Bid {
    pub fn is_confirmed(&self) -> bool {
        self.status == BidStatus::Confirmed
    }
}
