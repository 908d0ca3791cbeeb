use anyhow::Result;

use super::{report_failure, with_gateway, Command};
use crate::bids::BidId;

pub struct ConfirmBidCommand {
    bid_id: BidId,
}

impl ConfirmBidCommand {
    pub fn new(bid_id: BidId) -> Self {
        Self { bid_id }
    }
}

impl Command for ConfirmBidCommand {
    async fn execute(&self) -> Result<()> {
        let bid_id = self.bid_id;
        with_gateway(|gateway| async move {
            match gateway.confirm_bid(bid_id).await {
                Ok(bid) => {
                    println!(
                        "✅ Bid #{} from {} confirmed for {}",
                        bid.id, bid.bidder_id, bid.amount
                    );
                    println!("💬 Next: bid-broker fetch-thread <project-id>");
                }
                Err(err) => report_failure(&err),
            }
            Ok(())
        })
        .await
    }
}
