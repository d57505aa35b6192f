use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::fixed;
use crate::models::asset::Asset;
use crate::models::ledger::LedgerState;
use crate::models::price::PriceResolution;
use crate::models::report::{AssetReport, ClassAllocation, PortfolioSummary};

const BPS: u128 = 10_000;

/// Derives value, cost and profit-and-loss from positions and resolved prices.
///
/// Stateless and cache-free: reports are recomputed on every call.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value one asset at `price`.
    ///
    /// - value = (principal + rewards) × price / SCALE
    /// - cost  = principal × avg buy price / SCALE
    /// - pnl   = value − cost
    pub fn asset_report(
        &self,
        state: &LedgerState,
        asset: Asset,
        price: PriceResolution,
    ) -> Result<AssetReport, CoreError> {
        let position = state.position(asset);
        let total_amount = fixed::checked_add(position.principal_amount, position.staking_rewards)?;
        let value_usd = fixed::mul_scaled(total_amount, price.price_usd)?;
        let cost_usd = position.cost_basis()?;
        let pnl_usd = fixed::to_signed(value_usd)? - fixed::to_signed(cost_usd)?;

        Ok(AssetReport {
            asset,
            class_id: state.asset_class_id(asset),
            legacy_class: state.legacy_class(asset),
            principal_amount: position.principal_amount,
            staking_rewards: position.staking_rewards,
            total_amount,
            avg_buy_price_usd: position.avg_buy_price_usd,
            price_usd: price.price_usd,
            price_source: price.source,
            value_usd,
            cost_usd,
            pnl_usd,
            realized_pnl_usd: state.realized(asset).realized_pnl_usd,
            has_position: total_amount > 0,
            price_ok: price.is_ok(),
            in_profit: pnl_usd >= 0,
        })
    }

    /// Aggregate a portfolio report into totals and per-class allocation.
    pub fn summarize(&self, state: &LedgerState, reports: &[AssetReport]) -> Result<PortfolioSummary, CoreError> {
        let mut total_value_usd: u128 = 0;
        let mut total_cost_usd: u128 = 0;
        let mut total_unrealized_pnl_usd: i128 = 0;
        let mut total_realized_pnl_usd: i128 = 0;
        let mut per_class: BTreeMap<u64, u128> = BTreeMap::new();

        for report in reports {
            total_value_usd = fixed::checked_add(total_value_usd, report.value_usd)?;
            total_cost_usd = fixed::checked_add(total_cost_usd, report.cost_usd)?;
            total_unrealized_pnl_usd = fixed::checked_add_signed(total_unrealized_pnl_usd, report.pnl_usd)?;
            total_realized_pnl_usd = fixed::checked_add_signed(total_realized_pnl_usd, report.realized_pnl_usd)?;

            if report.has_position {
                let class_value = per_class.entry(report.class_id).or_insert(0);
                *class_value = fixed::checked_add(*class_value, report.value_usd)?;
            }
        }

        let allocations = per_class
            .into_iter()
            .map(|(class_id, value_usd)| {
                let allocation_bps = if total_value_usd > 0 {
                    let bps = value_usd
                        .checked_mul(BPS)
                        .map(|v| v / total_value_usd)
                        .unwrap_or_else(|| value_usd / (total_value_usd / BPS).max(1));
                    bps.min(BPS) as u32
                } else {
                    0
                };
                ClassAllocation {
                    class_id,
                    name: state.class(class_id).map(|c| c.name.clone()).unwrap_or_default(),
                    value_usd,
                    allocation_bps,
                }
            })
            .collect();

        Ok(PortfolioSummary {
            total_value_usd,
            total_cost_usd,
            total_unrealized_pnl_usd,
            total_realized_pnl_usd,
            assets_with_position: reports.iter().filter(|r| r.has_position).count(),
            assets_without_price: reports.iter().filter(|r| r.has_position && !r.price_ok).count(),
            allocations,
        })
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
