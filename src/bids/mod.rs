pub mod store;
pub mod types;

pub use store::BidStore;
pub use types::{Bid, BidId, BidStatus};
