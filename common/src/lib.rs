use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

pub mod asset_utils;
pub mod lending;
pub mod serde_helpers;
pub use lending::*;

use serde_helpers::serde_js_number;

/// Suilend main lending market object on Sui mainnet
pub const LENDING_MARKET_ID: &str =
    "0x84030d26d85eaa7035084a057f2f11f701b7e2e4eda87551becbc7c97505ece1";

/// Type argument of the Suilend main lending market
pub const LENDING_MARKET_TYPE: &str =
    "0xf95b06141ed4a174f239417323bde3f209b972f5930d8521ea38a52aff3a6ddf::suilend::MAIN_POOL";

/// Public Sui mainnet full node
pub const DEFAULT_RPC_URL: &str = "https://fullnode.mainnet.sui.io:443";

/// Decimals assumed for any asset that does not report its own
pub const DEFAULT_DECIMALS: u8 = 9;

/// Identifies one lending market: the market object and its type argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    pub market_id: String,
    pub market_type: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            market_id: LENDING_MARKET_ID.to_string(),
            market_type: LENDING_MARKET_TYPE.to_string(),
        }
    }
}

impl MarketConfig {
    /// Package that defines the market type, e.g. `0xf95b…` for `0xf95b…::suilend::MAIN_POOL`
    pub fn package_id(&self) -> &str {
        self.market_type.split("::").next().unwrap_or_default()
    }

    /// Fully qualified type of the capability that owns an obligation in this market
    pub fn obligation_owner_cap_type(&self) -> String {
        format!(
            "{}::lending_market::ObligationOwnerCap<{}>",
            self.package_id(),
            self.market_type
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum ObligationType {
    Asset,     // Deposit
    Liability, // Loan
}

/// A reserve of the lending market reduced to what position display needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReserve {
    pub id: String,
    pub symbol: String,
    pub coin_type: String,
    pub decimals: u8,
}

/// One deposit or borrow line of an obligation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserve_id: Option<String>,
    pub coin_type: String,
    pub symbol: String,
    pub decimals: u8,
    /// Raw on-chain amount; NaN when the source value is not numeric
    #[serde(with = "serde_js_number")]
    pub amount_raw: f64,
    #[serde(with = "serde_js_number")]
    pub amount_human: f64,
    pub raw: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct NormalizedObligation {
    pub deposits: Vec<NormalizedEntry>,
    pub borrows: Vec<NormalizedEntry>,
    pub raw: Value,
}

/// A normalized obligation together with the id it was fetched by
#[derive(Debug, Clone, Serialize)]
pub struct ObligationRecord {
    #[serde(rename = "obligationId")]
    pub obligation_id: String,
    #[serde(flatten)]
    pub obligation: NormalizedObligation,
}

/// Everything persisted for one address in one run
#[derive(Debug, Clone, Serialize)]
pub struct ObligationSnapshot {
    pub date_iso: String,
    pub address: String,
    pub market_id: String,
    pub obligations: Vec<ObligationRecord>,
    pub reserves: Vec<NormalizedReserve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caps: Option<Vec<Value>>,
}

/// Written in place of snapshots when a run fails
#[derive(Debug, Clone, Serialize)]
pub struct ErrorSnapshot {
    pub error: String,
}

/// UTC timestamp with millisecond precision, e.g. `2024-05-01T08:30:00.000Z`
pub fn snapshot_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
