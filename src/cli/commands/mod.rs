use anyhow::Result;
use std::sync::Arc;

use crate::config;
use crate::external::bidding::HttpBidSource;
use crate::external::invoicing::HttpInvoicing;
use crate::external::mailing::HttpMailingList;
use crate::external::messaging::HttpMessaging;
use crate::external::records::HttpRecordStore;
use crate::gateway::AdminGateway;
use crate::workflow::{ProjectWorkflow, WorkflowError};

pub mod bids;
pub mod confirm;
pub mod invoice;
pub mod register;
pub mod thread;
pub mod user;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Build the gateway from configuration and hand it to the command body
pub async fn with_gateway<F, Fut, R>(f: F) -> Result<R>
where
    F: FnOnce(AdminGateway) -> Fut + Send,
    Fut: std::future::Future<Output = Result<R>> + Send,
    R: Send,
{
    let cfg = config::config()?;

    let records = Arc::new(HttpRecordStore::new(cfg.records.base_url.clone()));
    let source = Arc::new(HttpBidSource::new(cfg.bidding.base_url.clone()));
    let messaging = Arc::new(HttpMessaging::new(cfg.messaging.base_url.clone()));
    let invoicing = Arc::new(HttpInvoicing::new(
        cfg.invoicing.base_url.clone(),
        cfg.invoicing.api_key.clone(),
    ));
    let mailing = Arc::new(HttpMailingList::new(
        cfg.mailing.base_url.clone(),
        cfg.mailing.api_key.clone(),
        cfg.mailing.list_id.clone(),
    ));

    let workflow = ProjectWorkflow::new(records, source, messaging);
    f(AdminGateway::new(workflow, invoicing, mailing)).await
}

/// Print a typed failure without losing the error kind
pub fn report_failure(err: &WorkflowError) {
    let report = AdminGateway::error_report(err);
    println!("❌ [{}] {}", report.kind, report.message);
}

pub async fn show_usage() -> Result<()> {
    println!("🏦 Bid Broker - marketplace bid review and confirmation");
    println!();
    println!("Review workflow:");
    println!("  👤 bid-broker user-details <user-id>    # Where is this client?");
    println!("  📋 bid-broker fetch-bids <project-id>   # Review submitted bids");
    println!("  ✅ bid-broker confirm-bid <bid-id>      # Choose the winning bid");
    println!("  💬 bid-broker fetch-thread <project-id> # Open the client/contractor thread");
    println!();
    println!("Follow-up:");
    println!("  💸 bid-broker send-invoice <bid-id>     # Email a payment link");
    println!("  ✉️  bid-broker register <name> <email>   # Add client to the mailing list");
    println!();
    println!("💡 Confirmation is one-way: a project keeps exactly one confirmed bid.");
    Ok(())
}
