use serde::{Deserialize, Serialize};

use super::asset::{Asset, LegacyAssetClass};
use super::price::PriceSource;

/// Valuation of a single asset at its currently resolved price.
/// All monetary values are 1e8-scaled USD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReport {
    pub asset: Asset,

    /// Assigned taxonomy class id
    pub class_id: u64,

    pub legacy_class: LegacyAssetClass,

    pub principal_amount: u128,
    pub staking_rewards: u128,

    /// principal + staking rewards
    pub total_amount: u128,

    pub avg_buy_price_usd: u128,

    pub price_usd: u128,
    pub price_source: PriceSource,

    /// total_amount × price / SCALE
    pub value_usd: u128,

    /// principal × avg_buy_price / SCALE; rewards carry no cost
    pub cost_usd: u128,

    /// Unrealized: value − cost
    pub pnl_usd: i128,

    /// Cumulative realized PnL from recorded sells
    pub realized_pnl_usd: i128,

    pub has_position: bool,
    pub price_ok: bool,
    pub in_profit: bool,
}

/// Aggregate view over the portfolio report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value_usd: u128,
    pub total_cost_usd: u128,
    pub total_unrealized_pnl_usd: i128,
    pub total_realized_pnl_usd: i128,

    /// Assets with principal or rewards
    pub assets_with_position: usize,

    /// Held assets whose price resolved to zero; their value counts as zero
    pub assets_without_price: usize,

    /// Value per assigned class, ascending class id
    pub allocations: Vec<ClassAllocation>,
}

/// Share of portfolio value held under one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAllocation {
    pub class_id: u64,
    pub name: String,
    pub value_usd: u128,

    /// value / total value, in basis points (10_000 = 100%)
    pub allocation_bps: u32,
}
