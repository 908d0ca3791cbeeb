//! Mailing-list collaborator
//!
//! Subscribes a client to the marketing list. Registration mechanics belong
//! to the list provider; the broker only supplies name and email.

use async_trait::async_trait;
use serde_json::json;

use super::{ensure_success, CollaboratorError};

/// Trait for the external mailing-list service
#[async_trait]
pub trait MailingListOps: Send + Sync {
    async fn subscribe(&self, name: &str, email: &str) -> Result<(), CollaboratorError>;
}

/// Real implementation backed by the mailing-list provider's HTTP API
pub struct HttpMailingList {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    list_id: String,
}

impl HttpMailingList {
    pub fn new(base_url: String, api_key: Option<String>, list_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            list_id,
        }
    }
}

#[async_trait]
impl MailingListOps for HttpMailingList {
    async fn subscribe(&self, name: &str, email: &str) -> Result<(), CollaboratorError> {
        let url = format!("{}/lists/{}/members", self.base_url, self.list_id);
        let body = json!({
            "email_address": email,
            "status": "subscribed",
            "merge_fields": { "FNAME": name },
        });
        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;
        ensure_success("mailing list", response).await?;
        Ok(())
    }
}
