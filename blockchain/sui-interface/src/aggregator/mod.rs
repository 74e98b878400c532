pub mod client;
pub mod normalize;
pub mod obligations;

pub use client::LendingMarketAggregator;
pub use normalize::*;
pub use obligations::{obligation_id_from_cap, UserObligations};
