pub mod aggregator;
pub mod common;
pub mod suilend;
