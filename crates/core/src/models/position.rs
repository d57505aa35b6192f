use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::fixed;

/// Holdings of one asset. All values are 1e8-scaled.
///
/// `principal_amount` is acquired at `avg_buy_price_usd`; `staking_rewards`
/// accrue with zero cost basis. `avg_buy_price_usd` is only meaningful while
/// `principal_amount > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub principal_amount: u128,
    pub avg_buy_price_usd: u128,
    pub staking_rewards: u128,
}

impl Position {
    pub fn new(principal_amount: u128, avg_buy_price_usd: u128, staking_rewards: u128) -> Self {
        Self {
            principal_amount,
            avg_buy_price_usd,
            staking_rewards,
        }
    }

    /// Principal plus rewards; `None` on overflow.
    pub fn total_amount(&self) -> Option<u128> {
        self.principal_amount.checked_add(self.staking_rewards)
    }

    pub fn is_empty(&self) -> bool {
        self.principal_amount == 0 && self.staking_rewards == 0
    }

    /// Cost of the remaining principal (`principal × avg / SCALE`).
    /// Rewards carry no cost.
    pub fn cost_basis(&self) -> Result<u128, CoreError> {
        fixed::mul_scaled(self.principal_amount, self.avg_buy_price_usd)
    }
}

/// Cumulative realized profit-and-loss of one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RealizedPnl {
    /// Sum of every sell's realized delta (signed, 1e8-scaled USD).
    pub realized_pnl_usd: i128,
    pub last_sell_price_usd: u128,
    pub last_sell_amount: u128,
}

/// Outcome of a recorded sell, returned to the caller and carried by the
/// `SellRecorded` notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellOutcome {
    pub principal_sold: u128,
    pub rewards_sold: u128,
    pub realized_delta_usd: i128,
    pub realized_total_usd: i128,
}
