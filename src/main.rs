use anyhow::Result;
use clap::Parser;

use bid_broker::cli::commands::{
    bids::FetchBidsCommand, confirm::ConfirmBidCommand, invoice::SendInvoiceCommand,
    register::RegisterCommand, show_usage, thread::FetchThreadCommand, user::UserDetailsCommand,
    Command,
};
use bid_broker::cli::{Cli, Commands};
use bid_broker::config::BidBrokerConfig;
use bid_broker::telemetry::{init_telemetry, shutdown_telemetry};

fn main() -> Result<()> {
    let _ = BidBrokerConfig::load_env_file();
    init_telemetry()?;

    let cli = Cli::parse();

    let result = match cli.command {
        // Default behavior: no subcommand - explain the workflow
        None => tokio::runtime::Runtime::new()?.block_on(async { show_usage().await }),
        Some(Commands::UserDetails { user_id }) => tokio::runtime::Runtime::new()?
            .block_on(async { UserDetailsCommand::new(user_id).execute().await }),
        Some(Commands::FetchBids { project_id }) => tokio::runtime::Runtime::new()?
            .block_on(async { FetchBidsCommand::new(project_id).execute().await }),
        Some(Commands::ConfirmBid { bid_id }) => tokio::runtime::Runtime::new()?
            .block_on(async { ConfirmBidCommand::new(bid_id).execute().await }),
        Some(Commands::FetchThread { project_id }) => tokio::runtime::Runtime::new()?
            .block_on(async { FetchThreadCommand::new(project_id).execute().await }),
        Some(Commands::SendInvoice { bid_id }) => tokio::runtime::Runtime::new()?
            .block_on(async { SendInvoiceCommand::new(bid_id).execute().await }),
        Some(Commands::Register { name, email }) => tokio::runtime::Runtime::new()?
            .block_on(async { RegisterCommand::new(name, email).execute().await }),
    };

    shutdown_telemetry();
    result
}
