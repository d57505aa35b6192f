use crate::errors::CoreError;
use crate::fixed;
use crate::models::asset::Asset;
use crate::models::event::LedgerEvent;
use crate::models::ledger::LedgerState;
use crate::models::position::{Position, SellOutcome};

/// Mutates per-asset holdings and records realized PnL on sells.
///
/// Pure business logic: no I/O, no price lookups. Every method validates
/// before it writes, so an error leaves the state untouched.
pub struct PositionService;

impl PositionService {
    pub fn new() -> Self {
        Self
    }

    /// Overwrite the whole position. Values are stored as given.
    pub fn set_position(
        &self,
        state: &mut LedgerState,
        asset: Asset,
        principal_amount: u128,
        avg_buy_price_usd: u128,
        staking_rewards: u128,
    ) -> LedgerEvent {
        *state.position_mut(asset) = Position::new(principal_amount, avg_buy_price_usd, staking_rewards);
        LedgerEvent::PositionUpdated {
            asset,
            principal_amount,
            avg_buy_price_usd,
            staking_rewards,
        }
    }

    /// Add zero-cost-basis rewards on top of the current rewards.
    pub fn add_staking_rewards(
        &self,
        state: &mut LedgerState,
        asset: Asset,
        extra: u128,
    ) -> Result<LedgerEvent, CoreError> {
        if extra == 0 {
            return Err(CoreError::InvalidInput(
                "Staking reward amount must be positive".into(),
            ));
        }
        let rewards = fixed::checked_add(state.position(asset).staking_rewards, extra)?;
        state.position_mut(asset).staking_rewards = rewards;
        Ok(LedgerEvent::StakingRewardsAdded {
            asset,
            added: extra,
            staking_rewards: rewards,
        })
    }

    /// Record a sell of `sell_amount` at `sell_price` using average-cost
    /// accounting.
    ///
    /// Principal is consumed first, then staking rewards. The principal part
    /// realizes `(price − avg) × sold / SCALE`; the rewards part has no cost
    /// basis and realizes `price × sold / SCALE`. When the principal is fully
    /// sold the average buy price resets to zero.
    pub fn record_sell(
        &self,
        state: &mut LedgerState,
        asset: Asset,
        sell_amount: u128,
        sell_price: u128,
    ) -> Result<(SellOutcome, LedgerEvent), CoreError> {
        if sell_amount == 0 {
            return Err(CoreError::InvalidInput("Sell amount must be positive".into()));
        }
        if sell_price == 0 {
            return Err(CoreError::InvalidInput("Sell price must be positive".into()));
        }

        let position = *state.position(asset);
        let available = position
            .total_amount()
            .ok_or_else(|| CoreError::Overflow(format!("{asset} holdings")))?;
        if sell_amount > available {
            return Err(CoreError::InsufficientHoldings {
                asset,
                requested: sell_amount,
                available,
            });
        }

        let principal_sold = sell_amount.min(position.principal_amount);
        let rewards_sold = sell_amount - principal_sold;

        // Compute everything before writing anything.
        let price_diff = fixed::to_signed(sell_price)? - fixed::to_signed(position.avg_buy_price_usd)?;
        let principal_pnl = fixed::mul_scaled_signed(price_diff, fixed::to_signed(principal_sold)?)?;
        let rewards_pnl = fixed::to_signed(fixed::mul_scaled(sell_price, rewards_sold)?)?;
        let delta = fixed::checked_add_signed(principal_pnl, rewards_pnl)?;
        let realized_total = fixed::checked_add_signed(state.realized(asset).realized_pnl_usd, delta)?;

        let remaining_principal = position.principal_amount - principal_sold;
        let updated = Position {
            principal_amount: remaining_principal,
            avg_buy_price_usd: if remaining_principal == 0 {
                0
            } else {
                position.avg_buy_price_usd
            },
            staking_rewards: position.staking_rewards - rewards_sold,
        };

        *state.position_mut(asset) = updated;
        let realized = state.realized_mut(asset);
        realized.realized_pnl_usd = realized_total;
        realized.last_sell_price_usd = sell_price;
        realized.last_sell_amount = sell_amount;

        let outcome = SellOutcome {
            principal_sold,
            rewards_sold,
            realized_delta_usd: delta,
            realized_total_usd: realized_total,
        };
        let event = LedgerEvent::SellRecorded {
            asset,
            amount: sell_amount,
            price_usd: sell_price,
            principal_sold,
            rewards_sold,
            realized_delta_usd: delta,
            realized_total_usd: realized_total,
        };
        Ok((outcome, event))
    }
}

impl Default for PositionService {
    fn default() -> Self {
        Self::new()
    }
}
