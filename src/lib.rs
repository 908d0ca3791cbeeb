// Bid Broker Library - Marketplace bid confirmation and thread binding
// This exposes the core workflow components for testing and integration

pub mod bids;
pub mod cli;
pub mod config;
pub mod external;
pub mod gateway;
pub mod telemetry;
pub mod threads;
pub mod workflow;

// Re-export key types for easy access
pub use bids::{Bid, BidId, BidStatus, BidStore};
pub use config::{config, BidBrokerConfig};
pub use external::CollaboratorError;
pub use gateway::{AdminGateway, BidView, ErrorReport, InvoiceView, ThreadView, UserView};
pub use telemetry::{
    create_workflow_span, generate_correlation_id, init_telemetry, shutdown_telemetry,
};
pub use threads::ThreadBinder;
pub use workflow::{
    ErrorKind, ProjectEvent, ProjectLifecycle, ProjectWorkflow, TransitionRecord, WorkflowError,
    WorkflowStage,
};
