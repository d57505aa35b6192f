use serde::{Deserialize, Serialize};

use super::asset::Address;

/// Per-asset pricing configuration.
///
/// `use_manual_override` decides which source is authoritative; the feed may
/// be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceConfig {
    pub feed: Option<Address>,
    /// 1e8-scaled USD. Zero means "never set".
    pub manual_price_usd: u128,
    pub use_manual_override: bool,
}

/// One reading of an aggregator feed, as returned by `latestRoundData()`.
///
/// Only `answer` and `updated_at` are consulted when resolving prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundData {
    pub round_id: u128,
    pub answer: i128,
    pub started_at: u64,
    pub updated_at: u64,
    pub answered_in_round: u128,
}

impl RoundData {
    /// A reading is trusted only with a positive answer and a positive
    /// update timestamp.
    pub fn accepted_price(&self) -> Option<u128> {
        if self.answer > 0 && self.updated_at > 0 {
            u128::try_from(self.answer).ok()
        } else {
            None
        }
    }

    pub fn updated_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        i64::try_from(self.updated_at)
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }
}

/// Which source produced a resolved price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceSource {
    /// Manual override enabled: the manual value wins unconditionally.
    ManualOverride,
    /// Accepted feed reading.
    Feed,
    /// No usable feed reading; last-resort manual value (possibly zero).
    ManualFallback,
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSource::ManualOverride => write!(f, "ManualOverride"),
            PriceSource::Feed => write!(f, "Feed"),
            PriceSource::ManualFallback => write!(f, "ManualFallback"),
        }
    }
}

/// A resolved price together with its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResolution {
    pub price_usd: u128,
    pub source: PriceSource,
}

impl PriceResolution {
    /// Whether the price is usable for valuation.
    pub fn is_ok(&self) -> bool {
        self.price_usd > 0
    }
}
