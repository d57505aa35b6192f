use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::asset::{Address, Asset};
use crate::models::price::{PriceConfig, PriceResolution, PriceSource};
use crate::providers::traits::FeedReader;

/// Decimal precision every price in the ledger is expressed in.
pub const LEDGER_DECIMALS: u8 = 8;

/// Resolves the USD price of an asset from its `PriceConfig`.
///
/// Priority:
/// 1. **Manual override** enabled → the manual price, unconditionally (even 0).
/// 2. **Feed** configured and its latest round has a positive answer and a
///    positive update time → the feed answer.
/// 3. **Fallback** → the manual price, which may be 0 ("unknown").
///
/// Feed failures never escape: resolution always produces a price.
/// Feed answers are taken as-is; they are assumed to use 8 decimals.
pub struct PriceService {
    reader: Arc<dyn FeedReader>,
}

impl PriceService {
    pub fn new(reader: Arc<dyn FeedReader>) -> Self {
        Self { reader }
    }

    pub fn reader_name(&self) -> &str {
        self.reader.name()
    }

    pub async fn resolve(&self, asset: Asset, config: &PriceConfig) -> PriceResolution {
        if config.use_manual_override {
            tracing::debug!(%asset, price = config.manual_price_usd, "Manual override price");
            return PriceResolution {
                price_usd: config.manual_price_usd,
                source: PriceSource::ManualOverride,
            };
        }

        if let Some(feed) = &config.feed {
            match self.reader.latest_round_data(feed).await {
                Ok(round) => match round.accepted_price() {
                    Some(price) => {
                        tracing::debug!(
                            %asset,
                            %feed,
                            price,
                            round_id = round.round_id,
                            updated_at = ?round.updated_at_utc(),
                            "Feed price"
                        );
                        return PriceResolution {
                            price_usd: price,
                            source: PriceSource::Feed,
                        };
                    }
                    None => {
                        tracing::warn!(
                            %asset,
                            %feed,
                            answer = round.answer,
                            updated_at = round.updated_at,
                            "Rejected feed reading, falling back to manual price"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(%asset, %feed, error = %e, "Feed query failed, falling back to manual price");
                }
            }
        }

        tracing::debug!(%asset, price = config.manual_price_usd, "Fallback manual price");
        PriceResolution {
            price_usd: config.manual_price_usd,
            source: PriceSource::ManualFallback,
        }
    }

    /// Validate a feed reference before it is configured: non-zero and with
    /// deployed code. A reader failure counts as "not a contract".
    ///
    /// The feed's decimals are queried for diagnostics only.
    pub async fn check_feed(&self, asset: Asset, feed: &Address) -> Result<(), CoreError> {
        if feed.is_zero() {
            return Err(CoreError::InvalidInput(format!(
                "Price feed for {asset} must not be the zero address"
            )));
        }

        let deployed = match self.reader.is_contract(feed).await {
            Ok(deployed) => deployed,
            Err(e) => {
                tracing::warn!(%asset, %feed, error = %e, "Could not verify feed contract");
                false
            }
        };
        if !deployed {
            return Err(CoreError::InvalidInput(format!(
                "Price feed {feed} for {asset} is not a deployed contract"
            )));
        }

        match self.reader.decimals(feed).await {
            Ok(decimals) if decimals != LEDGER_DECIMALS => {
                tracing::warn!(
                    %asset,
                    %feed,
                    decimals,
                    "Feed precision differs from the ledger's 8 decimals; answers are not rescaled"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%asset, %feed, error = %e, "Feed decimals unavailable");
            }
        }
        Ok(())
    }
}
