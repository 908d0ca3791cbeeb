//! User/project record persistence collaborator
//!
//! The record store is the system of record for a client's progression
//! through the workflow. Records are fetched whole and updated with partial
//! patches; the broker never owns this data, it only reads and writes it
//! through this narrow interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ensure_success, CollaboratorError};

pub type UserId = String;
pub type ProjectId = String;
pub type ThreadId = String;

/// One project per user in this model; the flags are derived views of the
/// workflow stage, persisted for the benefit of other consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub project_id: Option<ProjectId>,
    pub has_project: bool,
    pub has_bid: bool,
    pub thread_id: Option<ThreadId>,
}

/// Partial update applied to a record, keyed by email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_bid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<ThreadId>,
}

impl RecordPatch {
    pub fn bid_confirmed() -> Self {
        Self {
            has_bid: Some(true),
            ..Default::default()
        }
    }

    pub fn thread_bound(thread_id: ThreadId) -> Self {
        Self {
            thread_id: Some(thread_id),
            ..Default::default()
        }
    }
}

/// Trait for record persistence operations
///
/// This abstraction enables testing the workflow without a live persistence
/// backend, while preserving the exact interface the workflow depends on.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a record by user identifier
    async fn fetch_user(&self, user_id: &str) -> Result<UserRecord, CollaboratorError>;

    /// Fetch a record by email (the unique lookup key)
    async fn fetch_by_email(&self, email: &str) -> Result<UserRecord, CollaboratorError>;

    /// Fetch the record owning a project
    async fn fetch_by_project(&self, project_id: &str) -> Result<UserRecord, CollaboratorError>;

    /// Apply a partial update to the record identified by email
    async fn update_record(&self, email: &str, patch: &RecordPatch)
        -> Result<(), CollaboratorError>;
}

/// Real implementation backed by the persistence service's admin API
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn get_record(&self, resource: &str, url: String) -> Result<UserRecord, CollaboratorError> {
        let response = self.client.get(&url).send().await?;
        let response = ensure_success(resource, response).await?;
        let envelope: UserEnvelope =
            response
                .json()
                .await
                .map_err(|e| CollaboratorError::InvalidResponse {
                    message: format!("user record payload: {e}"),
                })?;
        Ok(envelope.user)
    }
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserRecord,
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch_user(&self, user_id: &str) -> Result<UserRecord, CollaboratorError> {
        let url = format!("{}/admin/userDetails/{}", self.base_url, user_id);
        self.get_record(&format!("user {user_id}"), url).await
    }

    async fn fetch_by_email(&self, email: &str) -> Result<UserRecord, CollaboratorError> {
        let url = format!("{}/admin/userByEmail/{}", self.base_url, email);
        self.get_record(&format!("user {email}"), url).await
    }

    async fn fetch_by_project(&self, project_id: &str) -> Result<UserRecord, CollaboratorError> {
        let url = format!("{}/admin/userByProject/{}", self.base_url, project_id);
        self.get_record(&format!("project {project_id}"), url).await
    }

    async fn update_record(
        &self,
        email: &str,
        patch: &RecordPatch,
    ) -> Result<(), CollaboratorError> {
        let url = format!("{}/admin/userByEmail/{}", self.base_url, email);
        let response = self.client.patch(&url).json(patch).send().await?;
        ensure_success(&format!("user {email}"), response).await?;
        Ok(())
    }
}
