use common::{lending::LendingError, MarketConfig, DEFAULT_RPC_URL};
use std::path::PathBuf;
use std::time::Duration;
use sui_interface::common::rpc_utils::DEFAULT_RPC_TIMEOUT;

/// Settings for a snapshot run, read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotConfig {
    pub addresses: Vec<String>,
    pub rpc_url: String,
    pub market: MarketConfig,
    pub out_dir: PathBuf,
    /// Keep the raw obligation owner caps in each snapshot
    pub include_caps: bool,
    pub strict_schema: bool,
    pub rpc_timeout: Duration,
    /// Cron expression; `None` runs once and exits
    pub schedule: Option<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            market: MarketConfig::default(),
            out_dir: PathBuf::from("data"),
            include_caps: true,
            strict_schema: false,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            schedule: None,
        }
    }
}

impl SnapshotConfig {
    pub fn from_env() -> Result<Self, LendingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; unset and blank values take defaults,
    /// except for the address list where only an empty value counts as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LendingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        // A set but blank address list still wins over SUI_ADDRESS
        let set = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let addresses = set("SUI_ADDRESSES")
            .or_else(|| set("SUI_ADDRESS"))
            .map(|raw| parse_addresses(&raw))
            .unwrap_or_default();

        let market = MarketConfig {
            market_id: get("SUILEND_MARKET_ID").unwrap_or(defaults.market.market_id),
            market_type: get("SUILEND_MARKET_TYPE").unwrap_or(defaults.market.market_type),
        };

        let rpc_timeout = match get("SUI_RPC_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|e| {
                LendingError::Configuration(format!("SUI_RPC_TIMEOUT_SECS={}: {}", raw, e))
            })?),
            None => defaults.rpc_timeout,
        };

        Ok(Self {
            addresses,
            rpc_url: get("SUI_RPC_URL").unwrap_or(defaults.rpc_url),
            market,
            out_dir: get("OUT_DIR").map(PathBuf::from).unwrap_or(defaults.out_dir),
            include_caps: get("SUILEND_INCLUDE_CAPS")
                .map(|raw| parse_bool("SUILEND_INCLUDE_CAPS", &raw))
                .transpose()?
                .unwrap_or(defaults.include_caps),
            strict_schema: get("SUILEND_STRICT_SCHEMA")
                .map(|raw| parse_bool("SUILEND_STRICT_SCHEMA", &raw))
                .transpose()?
                .unwrap_or(defaults.strict_schema),
            rpc_timeout,
            schedule: get("SNAPSHOT_SCHEDULE"),
        })
    }
}

/// Split a comma-separated address list, trimming items and dropping empty ones
pub fn parse_addresses(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, LendingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LendingError::Configuration(format!("{}={} is not a boolean", key, raw))),
    }
}
