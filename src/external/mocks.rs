//! In-memory collaborator doubles for testing - no network, no side effects

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::bidding::BidSource;
use super::invoicing::{InvoiceReceipt, InvoiceRequest, InvoicingOps};
use super::mailing::MailingListOps;
use super::messaging::MessagingOps;
use super::records::{ProjectId, RecordPatch, RecordStore, ThreadId, UserRecord};
use super::CollaboratorError;
use crate::bids::Bid;

fn unavailable(what: &str) -> CollaboratorError {
    CollaboratorError::UnexpectedStatus {
        status: 503,
        message: format!("{what} unavailable"),
    }
}

/// Record store double backed by a plain vector of records
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Vec<UserRecord>>,
    update_log: Mutex<Vec<(String, RecordPatch)>>,
    fail_updates: Mutex<u32>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, record: UserRecord) -> Self {
        self.records
            .lock()
            .expect("records lock")
            .push(record);
        self
    }

    /// Make the next `count` updates fail with a transport-class error
    pub fn fail_next_updates(&self, count: u32) {
        *self.fail_updates.lock().expect("failure lock") = count;
    }

    /// Current state of a record, for assertions
    pub fn record(&self, email: &str) -> Option<UserRecord> {
        self.records
            .lock()
            .expect("records lock")
            .iter()
            .find(|r| r.email == email)
            .cloned()
    }

    /// Number of successful updates applied
    pub fn update_count(&self) -> usize {
        self.update_log.lock().expect("log lock").len()
    }

    /// Patches applied so far, in order
    pub fn updates(&self) -> Vec<(String, RecordPatch)> {
        self.update_log.lock().expect("log lock").clone()
    }

    fn find(
        &self,
        describe: String,
        predicate: impl Fn(&UserRecord) -> bool,
    ) -> Result<UserRecord, CollaboratorError> {
        self.records
            .lock()
            .expect("records lock")
            .iter()
            .find(|r| predicate(r))
            .cloned()
            .ok_or(CollaboratorError::NotFound { resource: describe })
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_user(&self, user_id: &str) -> Result<UserRecord, CollaboratorError> {
        self.find(format!("user {user_id}"), |r| r.id == user_id)
    }

    async fn fetch_by_email(&self, email: &str) -> Result<UserRecord, CollaboratorError> {
        self.find(format!("user {email}"), |r| r.email == email)
    }

    async fn fetch_by_project(&self, project_id: &str) -> Result<UserRecord, CollaboratorError> {
        self.find(format!("project {project_id}"), |r| {
            r.project_id.as_deref() == Some(project_id)
        })
    }

    async fn update_record(
        &self,
        email: &str,
        patch: &RecordPatch,
    ) -> Result<(), CollaboratorError> {
        {
            let mut failures = self.fail_updates.lock().expect("failure lock");
            if *failures > 0 {
                *failures -= 1;
                return Err(unavailable("record store"));
            }
        }

        let mut records = self.records.lock().expect("records lock");
        let record = records
            .iter_mut()
            .find(|r| r.email == email)
            .ok_or(CollaboratorError::NotFound {
                resource: format!("user {email}"),
            })?;
        if let Some(has_bid) = patch.has_bid {
            record.has_bid = has_bid;
        }
        if let Some(thread_id) = &patch.thread_id {
            record.thread_id = Some(thread_id.clone());
        }

        self.update_log
            .lock()
            .expect("log lock")
            .push((email.to_string(), patch.clone()));
        Ok(())
    }
}

/// Bid source double returning canned bids per project
#[derive(Default)]
pub struct StaticBidSource {
    projects: Mutex<HashMap<ProjectId, Vec<Bid>>>,
}

impl StaticBidSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project_id: &str, bids: Vec<Bid>) -> Self {
        self.projects
            .lock()
            .expect("projects lock")
            .insert(project_id.to_string(), bids);
        self
    }
}

#[async_trait]
impl BidSource for StaticBidSource {
    async fn fetch_bids(&self, project_id: &str) -> Result<Vec<Bid>, CollaboratorError> {
        self.projects
            .lock()
            .expect("projects lock")
            .get(project_id)
            .cloned()
            .ok_or(CollaboratorError::NotFound {
                resource: format!("project {project_id}"),
            })
    }
}

/// Messaging double returning canned thread identifiers per project
#[derive(Default)]
pub struct StaticMessaging {
    threads: Mutex<HashMap<ProjectId, Vec<ThreadId>>>,
}

impl StaticMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threads(self, project_id: &str, threads: Vec<&str>) -> Self {
        self.threads.lock().expect("threads lock").insert(
            project_id.to_string(),
            threads.into_iter().map(String::from).collect(),
        );
        self
    }
}

#[async_trait]
impl MessagingOps for StaticMessaging {
    async fn threads_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<ThreadId>, CollaboratorError> {
        Ok(self
            .threads
            .lock()
            .expect("threads lock")
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Invoicing double that records every request it is asked to send
#[derive(Default)]
pub struct RecordingInvoicing {
    sent: Mutex<Vec<InvoiceRequest>>,
}

impl RecordingInvoicing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<InvoiceRequest> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait]
impl InvoicingOps for RecordingInvoicing {
    async fn send_invoice(
        &self,
        request: &InvoiceRequest,
    ) -> Result<InvoiceReceipt, CollaboratorError> {
        let mut sent = self.sent.lock().expect("sent lock");
        sent.push(request.clone());
        Ok(InvoiceReceipt {
            payment_link: format!("https://pay.example.com/link/{}", sent.len()),
        })
    }
}

/// Mailing-list double that records subscriptions
#[derive(Default)]
pub struct RecordingMailingList {
    subscribed: Mutex<Vec<(String, String)>>,
}

impl RecordingMailingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriptions(&self) -> Vec<(String, String)> {
        self.subscribed.lock().expect("subscribed lock").clone()
    }
}

#[async_trait]
impl MailingListOps for RecordingMailingList {
    async fn subscribe(&self, name: &str, email: &str) -> Result<(), CollaboratorError> {
        self.subscribed
            .lock()
            .expect("subscribed lock")
            .push((name.to_string(), email.to_string()));
        Ok(())
    }
}
