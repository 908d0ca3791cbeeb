//! Bid source collaborator
//!
//! Bids are created upstream by the bidding service and ingested read-only.
//! The source decides the ordering; callers must preserve it.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ensure_success, CollaboratorError};
use crate::bids::Bid;

/// Trait for the external bidding service
#[async_trait]
pub trait BidSource: Send + Sync {
    /// Bids for a project in the order the source supplies them. A project
    /// unknown upstream is a `NotFound`, propagated as-is.
    async fn fetch_bids(&self, project_id: &str) -> Result<Vec<Bid>, CollaboratorError>;
}

/// Real implementation backed by the bidding service's HTTP API
pub struct HttpBidSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBidSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[derive(Deserialize)]
struct BidsEnvelope {
    bids: Vec<Bid>,
}

#[async_trait]
impl BidSource for HttpBidSource {
    async fn fetch_bids(&self, project_id: &str) -> Result<Vec<Bid>, CollaboratorError> {
        let url = format!("{}/projects/{}/bids", self.base_url, project_id);
        let response = self.client.get(&url).send().await?;
        let response = ensure_success(&format!("project {project_id}"), response).await?;
        let envelope: BidsEnvelope =
            response
                .json()
                .await
                .map_err(|e| CollaboratorError::InvalidResponse {
                    message: format!("bid list payload: {e}"),
                })?;
        Ok(envelope.bids)
    }
}
