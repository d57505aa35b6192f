use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::CoreError;

use super::asset::{Address, Asset};

/// Initial configuration of a ledger, loaded from JSON.
///
/// ```json
/// {
///   "owner": "0x00000000000000000000000000000000000000aa",
///   "rpc_url": "https://eth.example.org",
///   "seed_positions": [
///     { "asset": "Btc", "principal_amount": 310000000, "avg_buy_price_usd": 6000000000000 }
///   ],
///   "manual_prices": [ { "asset": "Mstr", "price_usd": 150000000, "enabled": true } ],
///   "feeds": [ { "asset": "Eth", "feed": "0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419" } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSettings {
    pub owner: Address,

    /// JSON-RPC endpoint used to read aggregator feeds.
    #[serde(default)]
    pub rpc_url: Option<String>,

    #[serde(default)]
    pub seed_positions: Vec<SeedPosition>,

    #[serde(default)]
    pub manual_prices: Vec<SeedManualPrice>,

    #[serde(default)]
    pub feeds: Vec<SeedFeed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPosition {
    pub asset: Asset,
    #[serde(default)]
    pub principal_amount: u128,
    #[serde(default)]
    pub avg_buy_price_usd: u128,
    #[serde(default)]
    pub staking_rewards: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedManualPrice {
    pub asset: Asset,
    pub price_usd: u128,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFeed {
    pub asset: Asset,
    pub feed: Address,
}

impl LedgerSettings {
    /// Settings with only an owner; everything else empty.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            rpc_url: None,
            seed_positions: Vec::new(),
            manual_prices: Vec::new(),
            feeds: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: LedgerSettings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.owner.is_zero() {
            return Err(CoreError::Config("owner must not be the zero address".into()));
        }
        if let Some(url) = &self.rpc_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CoreError::Config(format!(
                    "rpc_url must be an http(s) URL, got '{url}'"
                )));
            }
        }
        if !self.feeds.is_empty() && self.rpc_url.is_none() {
            return Err(CoreError::Config("feeds require an rpc_url to read them from".into()));
        }
        if let Some(seed) = self.feeds.iter().find(|f| f.feed.is_zero()) {
            return Err(CoreError::Config(format!(
                "feed for {} must not be the zero address",
                seed.asset
            )));
        }
        Ok(())
    }
}
