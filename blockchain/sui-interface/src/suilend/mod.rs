pub mod client;

pub use client::SuilendClient;
