use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::Address;
use crate::models::price::RoundData;

/// Read access to aggregator price feeds, addressed by contract reference.
///
/// Implementations report failures as errors; the price resolver absorbs
/// them and falls back to the manual price, so a reader never needs to retry.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait FeedReader: Send + Sync {
    /// Human-readable name of this reader (for logs/errors).
    fn name(&self) -> &str;

    /// Whether code is deployed at `address`.
    async fn is_contract(&self, address: &Address) -> Result<bool, CoreError>;

    /// Decimal precision the feed reports its answer in.
    async fn decimals(&self, feed: &Address) -> Result<u8, CoreError>;

    /// The feed's latest round.
    async fn latest_round_data(&self, feed: &Address) -> Result<RoundData, CoreError>;
}
