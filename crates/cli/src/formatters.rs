//! JSON views of reports for terminal output.
//!
//! Core values are 1e8-scaled integers; these views render them as decimal
//! strings so a reader sees `"60000"` rather than `6000000000000`.

use serde::Serialize;

use asset_ledger_core::fixed::{format_scaled, format_scaled_signed};
use asset_ledger_core::models::asset::{Asset, LegacyAssetClass};
use asset_ledger_core::models::price::{PriceResolution, PriceSource};
use asset_ledger_core::models::report::{AssetReport, PortfolioSummary};

#[derive(Serialize)]
pub struct AssetView {
    asset: Asset,
    name: &'static str,
    class_id: u64,
    legacy_class: LegacyAssetClass,
    principal_amount: String,
    staking_rewards: String,
    total_amount: String,
    avg_buy_price_usd: String,
    price_usd: String,
    price_source: PriceSource,
    value_usd: String,
    cost_usd: String,
    pnl_usd: String,
    realized_pnl_usd: String,
    has_position: bool,
    price_ok: bool,
    in_profit: bool,
}

impl From<&AssetReport> for AssetView {
    fn from(r: &AssetReport) -> Self {
        Self {
            asset: r.asset,
            name: r.asset.name(),
            class_id: r.class_id,
            legacy_class: r.legacy_class,
            principal_amount: format_scaled(r.principal_amount),
            staking_rewards: format_scaled(r.staking_rewards),
            total_amount: format_scaled(r.total_amount),
            avg_buy_price_usd: format_scaled(r.avg_buy_price_usd),
            price_usd: format_scaled(r.price_usd),
            price_source: r.price_source,
            value_usd: format_scaled(r.value_usd),
            cost_usd: format_scaled(r.cost_usd),
            pnl_usd: format_scaled_signed(r.pnl_usd),
            realized_pnl_usd: format_scaled_signed(r.realized_pnl_usd),
            has_position: r.has_position,
            price_ok: r.price_ok,
            in_profit: r.in_profit,
        }
    }
}

#[derive(Serialize)]
pub struct PriceView {
    asset: Asset,
    name: &'static str,
    price_usd: String,
    source: PriceSource,
}

pub fn price_view(asset: Asset, resolution: &PriceResolution) -> PriceView {
    PriceView {
        asset,
        name: asset.name(),
        price_usd: format_scaled(resolution.price_usd),
        source: resolution.source,
    }
}

#[derive(Serialize)]
pub struct AllocationView {
    class_id: u64,
    name: String,
    value_usd: String,
    /// Percentage with two decimals, e.g. `"37.5"`
    allocation_pct: String,
}

#[derive(Serialize)]
pub struct SummaryView {
    total_value_usd: String,
    total_cost_usd: String,
    total_unrealized_pnl_usd: String,
    total_realized_pnl_usd: String,
    assets_with_position: usize,
    assets_without_price: usize,
    allocations: Vec<AllocationView>,
}

impl From<&PortfolioSummary> for SummaryView {
    fn from(s: &PortfolioSummary) -> Self {
        Self {
            total_value_usd: format_scaled(s.total_value_usd),
            total_cost_usd: format_scaled(s.total_cost_usd),
            total_unrealized_pnl_usd: format_scaled_signed(s.total_unrealized_pnl_usd),
            total_realized_pnl_usd: format_scaled_signed(s.total_realized_pnl_usd),
            assets_with_position: s.assets_with_position,
            assets_without_price: s.assets_without_price,
            allocations: s
                .allocations
                .iter()
                .map(|a| AllocationView {
                    class_id: a.class_id,
                    name: a.name.clone(),
                    value_usd: format_scaled(a.value_usd),
                    allocation_pct: bps_to_pct(a.allocation_bps),
                })
                .collect(),
        }
    }
}

/// Basis points as a percentage string: 3750 → "37.5".
fn bps_to_pct(bps: u32) -> String {
    let whole = bps / 100;
    let frac = bps % 100;
    if frac == 0 {
        whole.to_string()
    } else {
        format!("{whole}.{}", format!("{frac:02}").trim_end_matches('0'))
    }
}
