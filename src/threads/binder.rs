//! ThreadBinder - binds a project to a communication thread
//!
//! Pure resolve-and-persist: the binder holds no storage of its own. The
//! record exclusively owns its `thread_id` once set.

use std::sync::Arc;

use tracing::info;

use crate::external::messaging::MessagingOps;
use crate::external::records::{RecordPatch, RecordStore, ThreadId};
use crate::workflow::WorkflowError;

pub struct ThreadBinder {
    messaging: Arc<dyn MessagingOps>,
    records: Arc<dyn RecordStore>,
}

impl ThreadBinder {
    pub fn new(messaging: Arc<dyn MessagingOps>, records: Arc<dyn RecordStore>) -> Self {
        Self { messaging, records }
    }

    /// First thread the messaging collaborator returns for the project.
    /// The source ordering decides the tie-break.
    pub async fn resolve_thread(&self, project_id: &str) -> Result<ThreadId, WorkflowError> {
        let threads = self.messaging.threads_for_project(project_id).await?;
        threads
            .into_iter()
            .next()
            .ok_or_else(|| WorkflowError::NotFound {
                resource: format!("threads for project {project_id}"),
            })
    }

    /// Persist the thread onto the record identified by email.
    ///
    /// Requires a confirmed bid. Rebinding the same thread is a no-op;
    /// rebinding a different one overwrites, last writer wins.
    pub async fn bind_thread(&self, user_email: &str, thread_id: &str) -> Result<(), WorkflowError> {
        let record = self.records.fetch_by_email(user_email).await?;
        if !record.has_bid {
            return Err(WorkflowError::Precondition {
                reason: format!(
                    "no confirmed bid for {user_email}; thread binding requires a confirmed bid"
                ),
            });
        }

        if record.thread_id.as_deref() == Some(thread_id) {
            info!(user = user_email, thread = thread_id, "thread already bound, no-op");
            return Ok(());
        }

        self.records
            .update_record(user_email, &RecordPatch::thread_bound(thread_id.to_string()))
            .await?;
        info!(user = user_email, thread = thread_id, "thread bound");
        Ok(())
    }
}
