//! Messaging collaborator
//!
//! Resolves the communication threads the messaging service holds for a
//! project. Thread content never crosses this boundary, only identifiers.

use async_trait::async_trait;
use serde::Deserialize;

use super::records::ThreadId;
use super::{ensure_success, CollaboratorError};

/// Trait for the external messaging service
#[async_trait]
pub trait MessagingOps: Send + Sync {
    /// Thread identifiers associated with a project, in the order the
    /// messaging service returns them.
    async fn threads_for_project(&self, project_id: &str)
        -> Result<Vec<ThreadId>, CollaboratorError>;
}

/// Real implementation backed by the messaging service's HTTP API
pub struct HttpMessaging {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMessaging {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[derive(Deserialize)]
struct ThreadsEnvelope {
    threads: Vec<ThreadId>,
}

#[async_trait]
impl MessagingOps for HttpMessaging {
    async fn threads_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<ThreadId>, CollaboratorError> {
        let url = format!("{}/projects/{}/threads", self.base_url, project_id);
        let response = self.client.get(&url).send().await?;
        let response = ensure_success(&format!("project {project_id}"), response).await?;
        let envelope: ThreadsEnvelope =
            response
                .json()
                .await
                .map_err(|e| CollaboratorError::InvalidResponse {
                    message: format!("thread list payload: {e}"),
                })?;
        Ok(envelope.threads)
    }
}
