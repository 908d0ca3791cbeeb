use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "bid-broker")]
#[command(about = "Marketplace bid confirmation and thread binding for administrators")]
#[command(long_about = "Bid Broker drives a project's bids through review, confirmation, and \
                       thread binding. Start with 'bid-broker user-details <id>' to see where \
                       a client is in the workflow.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a client's record and current workflow stage
    UserDetails {
        /// User identifier
        user_id: String,
    },
    /// List the bids submitted for a project, in source order
    FetchBids {
        /// Project identifier
        project_id: String,
    },
    /// Confirm the chosen bid for its project (idempotent)
    ConfirmBid {
        /// Bid identifier
        bid_id: u64,
    },
    /// Resolve and bind the communication thread for a confirmed project
    FetchThread {
        /// Project identifier
        project_id: String,
    },
    /// Create a payment link for a confirmed bid and email it to the client
    SendInvoice {
        /// Bid identifier
        bid_id: u64,
    },
    /// Subscribe a client to the mailing list
    Register {
        /// Client name
        name: String,
        /// Client email
        email: String,
    },
}
