//! End-to-end workflow tests through the AdminGateway
//!
//! Exercises the administrator-facing operations against in-memory
//! collaborator doubles: review, confirm, thread binding, invoicing,
//! and registration, plus the error taxonomy each of them reports.

use std::sync::Arc;

use bid_broker::external::mocks::{
    InMemoryRecordStore, RecordingInvoicing, RecordingMailingList, StaticBidSource,
    StaticMessaging,
};
use bid_broker::external::records::UserRecord;
use bid_broker::workflow::{ErrorKind, ProjectWorkflow, WorkflowError};
use bid_broker::{AdminGateway, Bid, BidStatus};

fn client_record(project_id: &str) -> UserRecord {
    UserRecord {
        id: "u1".to_string(),
        email: "client@example.com".to_string(),
        name: "Client".to_string(),
        project_id: Some(project_id.to_string()),
        has_project: true,
        has_bid: false,
        thread_id: None,
    }
}

fn pending_bid(id: u64, project_id: &str) -> Bid {
    Bid {
        id,
        project_id: project_id.to_string(),
        bidder_id: format!("bidder-{id}"),
        amount: 1000 * id,
        description: format!("offer {id}"),
        score: 4.0,
        status: BidStatus::Pending,
    }
}

struct Harness {
    gateway: AdminGateway,
    records: Arc<InMemoryRecordStore>,
    invoicing: Arc<RecordingInvoicing>,
    mailing: Arc<RecordingMailingList>,
}

fn harness(
    records: InMemoryRecordStore,
    source: StaticBidSource,
    messaging: StaticMessaging,
) -> Harness {
    let records = Arc::new(records);
    let invoicing = Arc::new(RecordingInvoicing::new());
    let mailing = Arc::new(RecordingMailingList::new());
    let workflow = ProjectWorkflow::new(
        Arc::clone(&records) as Arc<dyn bid_broker::external::records::RecordStore>,
        Arc::new(source),
        Arc::new(messaging),
    );
    let gateway = AdminGateway::new(
        workflow,
        Arc::clone(&invoicing) as Arc<dyn bid_broker::external::invoicing::InvoicingOps>,
        Arc::clone(&mailing) as Arc<dyn bid_broker::external::mailing::MailingListOps>,
    );
    Harness {
        gateway,
        records,
        invoicing,
        mailing,
    }
}

/// Single client with one project, two pending bids, and one thread upstream
fn default_harness() -> Harness {
    harness(
        InMemoryRecordStore::new().with_record(client_record("p1")),
        StaticBidSource::new()
            .with_project("p1", vec![pending_bid(1, "p1"), pending_bid(2, "p1")]),
        StaticMessaging::new().with_threads("p1", vec!["T1", "T2"]),
    )
}

#[tokio::test]
async fn user_details_reports_stage_from_record() {
    let h = default_harness();

    let user = h.gateway.get_user_details("u1").await.expect("details");
    assert_eq!(user.stage, "Project Created");
    assert!(user.has_project);
    assert!(!user.has_bid);

    let err = h
        .gateway
        .get_user_details("nobody")
        .await
        .expect_err("unknown user");
    assert!(matches!(err, WorkflowError::NotFound { .. }));
}

#[tokio::test]
async fn fetch_bids_preserves_source_order() {
    let h = default_harness();

    let bids = h.gateway.fetch_bids("p1").await.expect("bids");
    assert_eq!(bids.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(bids.iter().all(|b| b.status == BidStatus::Pending));
}

#[tokio::test]
async fn confirm_marks_bid_and_record() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");

    let confirmed = h.gateway.confirm_bid(1).await.expect("confirm");
    assert_eq!(confirmed.status, BidStatus::Confirmed);

    let record = h.records.record("client@example.com").expect("record");
    assert!(record.has_bid);

    let user = h.gateway.get_user_details("u1").await.expect("details");
    assert_eq!(user.stage, "Bid Confirmed");
    assert!(user.has_bid);
}

#[tokio::test]
async fn second_confirm_on_project_is_conflict() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");
    h.gateway.confirm_bid(1).await.expect("first confirm");

    let err = h.gateway.confirm_bid(2).await.expect_err("conflict");
    assert!(matches!(
        err,
        WorkflowError::Conflict {
            confirmed: 1,
            attempted: 2,
            ..
        }
    ));

    // the losing bid is untouched
    let bids = h.gateway.fetch_bids("p1").await.expect("bids");
    let bid2 = bids.iter().find(|b| b.id == 2).expect("bid 2");
    assert_eq!(bid2.status, BidStatus::Pending);
}

#[tokio::test]
async fn reconfirming_the_winner_is_idempotent() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");

    let first = h.gateway.confirm_bid(1).await.expect("first");
    let second = h.gateway.confirm_bid(1).await.expect("second");
    assert_eq!(first.id, second.id);
    assert_eq!(h.records.update_count(), 1);
}

#[tokio::test]
async fn record_write_failure_rolls_confirmation_back() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");
    h.records.fail_next_updates(1);

    let err = h.gateway.confirm_bid(1).await.expect_err("update fails");
    assert_eq!(AdminGateway::error_report(&err).kind, ErrorKind::Transport);

    let record = h.records.record("client@example.com").expect("record");
    assert!(!record.has_bid);
    let bids = h.gateway.fetch_bids("p1").await.expect("bids");
    assert!(bids.iter().all(|b| b.status == BidStatus::Pending));
}

#[tokio::test]
async fn thread_binding_requires_a_confirmed_bid() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");

    let err = h.gateway.fetch_thread("p1").await.expect_err("no bid yet");
    assert!(matches!(err, WorkflowError::Precondition { .. }));
    // the precondition short-circuits before any record write
    assert_eq!(h.records.update_count(), 0);
}

#[tokio::test]
async fn thread_binding_picks_first_of_sequence() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");
    h.gateway.confirm_bid(1).await.expect("confirm");

    let thread = h.gateway.fetch_thread("p1").await.expect("thread");
    assert_eq!(thread.thread_id, "T1");

    let record = h.records.record("client@example.com").expect("record");
    assert_eq!(record.thread_id.as_deref(), Some("T1"));

    let user = h.gateway.get_user_details("u1").await.expect("details");
    assert_eq!(user.stage, "Thread Established");
}

#[tokio::test]
async fn rebinding_the_same_thread_writes_nothing() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");
    h.gateway.confirm_bid(1).await.expect("confirm");

    let first = h.gateway.fetch_thread("p1").await.expect("first bind");
    let updates_after_first = h.records.update_count();
    let second = h.gateway.fetch_thread("p1").await.expect("second bind");

    assert_eq!(first.thread_id, second.thread_id);
    assert_eq!(h.records.update_count(), updates_after_first);
}

#[tokio::test]
async fn empty_thread_sequence_is_not_found() {
    let h = harness(
        InMemoryRecordStore::new().with_record(client_record("p1")),
        StaticBidSource::new().with_project("p1", vec![pending_bid(1, "p1")]),
        StaticMessaging::new(),
    );
    h.gateway.fetch_bids("p1").await.expect("ingest");
    h.gateway.confirm_bid(1).await.expect("confirm");

    let err = h.gateway.fetch_thread("p1").await.expect_err("no threads");
    assert!(matches!(err, WorkflowError::NotFound { .. }));
}

#[tokio::test]
async fn confirm_stays_idempotent_after_thread_binding() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");
    h.gateway.confirm_bid(1).await.expect("confirm");
    h.gateway.fetch_thread("p1").await.expect("bind");
    let updates_before_retry = h.records.update_count();

    let retried = h.gateway.confirm_bid(1).await.expect("idempotent retry");
    assert_eq!(retried.id, 1);
    assert_eq!(retried.status, BidStatus::Confirmed);
    assert_eq!(h.records.update_count(), updates_before_retry);

    // the slot is still held: a different bid loses with a conflict, not a precondition
    let err = h.gateway.confirm_bid(2).await.expect_err("conflict");
    assert!(matches!(
        err,
        WorkflowError::Conflict {
            confirmed: 1,
            attempted: 2,
            ..
        }
    ));
}

#[tokio::test]
async fn invoice_is_only_sent_for_the_confirmed_bid() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");

    let err = h.gateway.send_invoice(1).await.expect_err("not confirmed");
    assert!(matches!(err, WorkflowError::Precondition { .. }));
    assert!(h.invoicing.sent().is_empty());

    h.gateway.confirm_bid(1).await.expect("confirm");
    let invoice = h.gateway.send_invoice(1).await.expect("invoice");
    assert_eq!(invoice.recipient, "client@example.com");
    assert!(invoice.payment_link.starts_with("https://pay.example.com/"));

    let sent = h.invoicing.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].email, "client@example.com");
    assert_eq!(sent[0].amount, 1000);
}

#[tokio::test]
async fn register_subscribes_to_the_mailing_list() {
    let h = default_harness();

    h.gateway
        .register_user("New Client", "new@example.com")
        .await
        .expect("register");

    assert_eq!(
        h.mailing.subscriptions(),
        vec![("New Client".to_string(), "new@example.com".to_string())]
    );
}

#[tokio::test]
async fn error_reports_carry_machine_readable_kinds() {
    let h = default_harness();
    h.gateway.fetch_bids("p1").await.expect("ingest");

    let not_found = h.gateway.confirm_bid(99).await.expect_err("unknown bid");
    assert_eq!(AdminGateway::error_report(&not_found).kind, ErrorKind::NotFound);

    let precondition = h.gateway.fetch_thread("p1").await.expect_err("no bid");
    assert_eq!(
        AdminGateway::error_report(&precondition).kind,
        ErrorKind::Precondition
    );

    h.gateway.confirm_bid(1).await.expect("confirm");
    let conflict = h.gateway.confirm_bid(2).await.expect_err("conflict");
    let report = AdminGateway::error_report(&conflict);
    assert_eq!(report.kind, ErrorKind::Conflict);
    assert!(report.message.contains("p1"));
}
