use anyhow::Result;

use super::{report_failure, with_gateway, Command};
use crate::bids::BidStatus;

pub struct FetchBidsCommand {
    project_id: String,
}

impl FetchBidsCommand {
    pub fn new(project_id: String) -> Self {
        Self { project_id }
    }
}

impl Command for FetchBidsCommand {
    async fn execute(&self) -> Result<()> {
        let project_id = self.project_id.clone();
        with_gateway(|gateway| async move {
            match gateway.fetch_bids(&project_id).await {
                Ok(bids) if bids.is_empty() => {
                    println!("📋 No bids submitted for project {project_id} yet");
                }
                Ok(bids) => {
                    println!("📋 {} bid(s) for project {}", bids.len(), project_id);
                    for bid in bids {
                        let marker = match bid.status {
                            BidStatus::Confirmed => "✅",
                            BidStatus::Pending => "  ",
                        };
                        println!(
                            "{} #{} {} offers {} (score {:.1})",
                            marker, bid.id, bid.bidder_id, bid.amount, bid.score
                        );
                        println!("     {}", bid.description);
                    }
                }
                Err(err) => report_failure(&err),
            }
            Ok(())
        })
        .await
    }
}
