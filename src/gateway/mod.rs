//! AdminGateway - request/response boundary for the administrator's client
//!
//! Translates commands into workflow operations and reports outcomes through
//! view types, never internal representations. Stateless: all state lives in
//! the BidStore and the user/project records behind the workflow. The only
//! layer allowed to render errors, and it keeps the machine-readable kind.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, Instrument};

use crate::bids::{Bid, BidId, BidStatus};
use crate::external::invoicing::{InvoiceRequest, InvoicingOps};
use crate::external::mailing::MailingListOps;
use crate::external::records::UserRecord;
use crate::telemetry::{create_workflow_span, generate_correlation_id};
use crate::workflow::{ErrorKind, ProjectWorkflow, WorkflowError, WorkflowStage};

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub project_id: Option<String>,
    pub has_project: bool,
    pub has_bid: bool,
    pub thread_id: Option<String>,
    /// Human-readable workflow stage, e.g. "Project Created"
    pub stage: String,
}

impl UserView {
    fn from_record(record: UserRecord, stage: WorkflowStage) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            project_id: record.project_id,
            has_project: stage >= WorkflowStage::ProjectCreated,
            has_bid: stage >= WorkflowStage::BidConfirmed,
            thread_id: record.thread_id,
            stage: stage.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BidView {
    pub id: BidId,
    pub bidder_id: String,
    pub amount: u64,
    pub description: String,
    pub score: f64,
    pub status: BidStatus,
}

impl From<Bid> for BidView {
    fn from(bid: Bid) -> Self {
        Self {
            id: bid.id,
            bidder_id: bid.bidder_id,
            amount: bid.amount,
            description: bid.description,
            score: bid.score,
            status: bid.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreadView {
    pub project_id: String,
    pub thread_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    pub recipient: String,
    pub payment_link: String,
}

/// Structured error payload with a machine-readable kind
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

pub struct AdminGateway {
    workflow: ProjectWorkflow,
    invoicing: Arc<dyn InvoicingOps>,
    mailing: Arc<dyn MailingListOps>,
}

impl AdminGateway {
    pub fn new(
        workflow: ProjectWorkflow,
        invoicing: Arc<dyn InvoicingOps>,
        mailing: Arc<dyn MailingListOps>,
    ) -> Self {
        Self {
            workflow,
            invoicing,
            mailing,
        }
    }

    pub async fn get_user_details(&self, user_id: &str) -> Result<UserView, WorkflowError> {
        let span = create_workflow_span("get_user_details", &generate_correlation_id());
        async {
            info!(user = user_id, "gateway request");
            let (record, stage) = self.workflow.user_details(user_id).await?;
            Ok(UserView::from_record(record, stage))
        }
        .instrument(span)
        .await
    }

    pub async fn fetch_bids(&self, project_id: &str) -> Result<Vec<BidView>, WorkflowError> {
        let span = create_workflow_span("fetch_bids", &generate_correlation_id());
        async {
            info!(project = project_id, "gateway request");
            let bids = self.workflow.list_bids(project_id).await?;
            Ok(bids.into_iter().map(BidView::from).collect())
        }
        .instrument(span)
        .await
    }

    pub async fn confirm_bid(&self, bid_id: BidId) -> Result<BidView, WorkflowError> {
        let span = create_workflow_span("confirm_bid", &generate_correlation_id());
        async {
            info!(bid = bid_id, "gateway request");
            let confirmed = self.workflow.confirm_bid(bid_id).await?;
            Ok(BidView::from(confirmed))
        }
        .instrument(span)
        .await
    }

    pub async fn fetch_thread(&self, project_id: &str) -> Result<ThreadView, WorkflowError> {
        let span = create_workflow_span("fetch_thread", &generate_correlation_id());
        async {
            info!(project = project_id, "gateway request");
            let (thread_id, _record) = self.workflow.establish_thread(project_id).await?;
            Ok(ThreadView {
                project_id: project_id.to_string(),
                thread_id,
            })
        }
        .instrument(span)
        .await
    }

    /// Create a payment link for a confirmed bid and email it to the client.
    /// Unconfirmed bids are rejected before the collaborator is contacted.
    pub async fn send_invoice(&self, bid_id: BidId) -> Result<InvoiceView, WorkflowError> {
        let span = create_workflow_span("send_invoice", &generate_correlation_id());
        async {
            info!(bid = bid_id, "gateway request");
            let bid = self.workflow.bid_details(bid_id).await?;
            if bid.status != BidStatus::Confirmed {
                return Err(WorkflowError::Precondition {
                    reason: format!(
                        "bid {bid_id} is not confirmed; invoices are only sent for the chosen bid"
                    ),
                });
            }
            let record = self.workflow.record_for_project(&bid.project_id).await?;
            let receipt = self
                .invoicing
                .send_invoice(&InvoiceRequest {
                    email: record.email.clone(),
                    amount: bid.amount,
                    description: bid.description.clone(),
                })
                .await
                .map_err(WorkflowError::from)?;
            Ok(InvoiceView {
                recipient: record.email,
                payment_link: receipt.payment_link,
            })
        }
        .instrument(span)
        .await
    }

    /// Subscribe a client to the marketing mailing list
    pub async fn register_user(&self, name: &str, email: &str) -> Result<(), WorkflowError> {
        let span = create_workflow_span("register_user", &generate_correlation_id());
        async {
            info!(email = email, "gateway request");
            self.mailing.subscribe(name, email).await?;
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Turn a typed error into the structured payload callers render
    pub fn error_report(err: &WorkflowError) -> ErrorReport {
        ErrorReport {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
