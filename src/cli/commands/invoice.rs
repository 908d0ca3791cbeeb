use anyhow::Result;

use super::{report_failure, with_gateway, Command};
use crate::bids::BidId;

pub struct SendInvoiceCommand {
    bid_id: BidId,
}

impl SendInvoiceCommand {
    pub fn new(bid_id: BidId) -> Self {
        Self { bid_id }
    }
}

impl Command for SendInvoiceCommand {
    async fn execute(&self) -> Result<()> {
        let bid_id = self.bid_id;
        with_gateway(|gateway| async move {
            match gateway.send_invoice(bid_id).await {
                Ok(invoice) => {
                    println!("💸 Payment link sent to {}", invoice.recipient);
                    println!("🔗 {}", invoice.payment_link);
                }
                Err(err) => report_failure(&err),
            }
            Ok(())
        })
        .await
    }
}
