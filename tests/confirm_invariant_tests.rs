//! Property tests for the single-confirmed-bid invariant
//!
//! Random interleavings of confirm and re-ingest operations across two
//! projects must never leave a project with more than one confirmed bid,
//! and the winner is always the first confirm that succeeded.

use std::sync::Arc;

use proptest::prelude::*;

use bid_broker::external::mocks::{InMemoryRecordStore, StaticBidSource};
use bid_broker::external::records::{RecordStore, UserRecord};
use bid_broker::{Bid, BidStatus, BidStore};

#[derive(Debug, Clone)]
enum Op {
    Confirm(u64),
    Reingest(&'static str),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..=5).prop_map(Op::Confirm),
        prop_oneof![Just("p1"), Just("p2")].prop_map(Op::Reingest),
    ]
}

fn project_for(bid_id: u64) -> &'static str {
    if bid_id <= 3 {
        "p1"
    } else {
        "p2"
    }
}

fn pending_bid(id: u64, project_id: &str) -> Bid {
    Bid {
        id,
        project_id: project_id.to_string(),
        bidder_id: format!("bidder-{id}"),
        amount: 100 * id,
        description: format!("offer {id}"),
        score: 3.5,
        status: BidStatus::Pending,
    }
}

fn client_record(user_id: &str, project_id: &str) -> UserRecord {
    UserRecord {
        id: user_id.to_string(),
        email: format!("{user_id}@example.com"),
        name: user_id.to_string(),
        project_id: Some(project_id.to_string()),
        has_project: true,
        has_bid: false,
        thread_id: None,
    }
}

fn two_project_store() -> BidStore {
    let records = Arc::new(
        InMemoryRecordStore::new()
            .with_record(client_record("u1", "p1"))
            .with_record(client_record("u2", "p2")),
    );
    let source = Arc::new(
        StaticBidSource::new()
            .with_project(
                "p1",
                vec![
                    pending_bid(1, "p1"),
                    pending_bid(2, "p1"),
                    pending_bid(3, "p1"),
                ],
            )
            .with_project("p2", vec![pending_bid(4, "p2"), pending_bid(5, "p2")]),
    );
    BidStore::new(source, records as Arc<dyn RecordStore>)
}

proptest! {
    #[test]
    fn at_most_one_confirmed_bid_per_project(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        rt.block_on(async move {
            let store = two_project_store();
            store.list_bids("p1").await.expect("ingest p1");
            store.list_bids("p2").await.expect("ingest p2");

            let mut winners: std::collections::HashMap<&str, u64> = Default::default();
            for op in &ops {
                match op {
                    Op::Confirm(bid_id) => {
                        let project = project_for(*bid_id);
                        match store.confirm_bid(*bid_id).await {
                            Ok(confirmed) => {
                                // the first successful confirm owns the slot forever
                                let winner = winners.entry(project).or_insert(confirmed.id);
                                prop_assert_eq!(*winner, confirmed.id);
                            }
                            Err(_) => {
                                // only a conflict with an earlier winner may reject
                                prop_assert!(winners.contains_key(project));
                            }
                        }
                    }
                    Op::Reingest(project) => {
                        store.list_bids(project).await.expect("reingest");
                    }
                }
            }

            for project in ["p1", "p2"] {
                let bids = store.list_bids(project).await.expect("final list");
                let confirmed: Vec<u64> =
                    bids.iter().filter(|b| b.is_confirmed()).map(|b| b.id).collect();
                prop_assert!(confirmed.len() <= 1);
                prop_assert_eq!(
                    confirmed.first().copied(),
                    winners.get(project).copied()
                );
            }
            Ok(())
        })?;
    }
}
