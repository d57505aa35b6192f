use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::CoreError;
use crate::models::asset::Address;
use crate::models::price::RoundData;
use super::traits::FeedReader;

const PROVIDER: &str = "StaticFeeds";

/// A single in-memory aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFeed {
    pub decimals: u8,
    /// Latest round; `None` until the first answer is pushed.
    pub round: Option<RoundData>,
    /// When set, every read of this feed fails.
    pub failing: bool,
}

/// In-memory feeds for simulation, backtesting and offline use.
///
/// Feeds are "deployed" at addresses; answers are pushed by the caller.
/// Shared through an `Arc` so prices can be moved while a ledger holds it.
pub struct StaticFeedReader {
    feeds: Mutex<HashMap<Address, StaticFeed>>,
}

impl StaticFeedReader {
    /// A reader with no deployed feeds: every address reads as "no code".
    pub fn new() -> Self {
        Self {
            feeds: Mutex::new(HashMap::new()),
        }
    }

    /// Deploy an empty feed at `address`. Replaces any feed already there.
    pub fn deploy(&self, address: Address, decimals: u8) {
        let mut feeds = self.feeds.lock().unwrap_or_else(|e| e.into_inner());
        feeds.insert(
            address,
            StaticFeed {
                decimals,
                round: None,
                failing: false,
            },
        );
    }

    /// Publish a new round with `answer` updated at `updated_at` (unix seconds).
    /// Returns the new round id.
    pub fn push_answer(&self, address: &Address, answer: i128, updated_at: u64) -> Result<u128, CoreError> {
        let mut feeds = self.feeds.lock().unwrap_or_else(|e| e.into_inner());
        let feed = feeds
            .get_mut(address)
            .ok_or_else(|| CoreError::external(PROVIDER, format!("No feed deployed at {address}")))?;
        let round_id = match feed.round {
            Some(r) => r
                .round_id
                .checked_add(1)
                .ok_or_else(|| CoreError::Overflow(format!("round id after {} on {address}", r.round_id)))?,
            None => 1,
        };
        feed.round = Some(RoundData {
            round_id,
            answer,
            started_at: updated_at,
            updated_at,
            answered_in_round: round_id,
        });
        Ok(round_id)
    }

    /// Overwrite the latest round verbatim (for malformed-reading scenarios).
    pub fn set_round(&self, address: &Address, round: RoundData) -> Result<(), CoreError> {
        let mut feeds = self.feeds.lock().unwrap_or_else(|e| e.into_inner());
        let feed = feeds
            .get_mut(address)
            .ok_or_else(|| CoreError::external(PROVIDER, format!("No feed deployed at {address}")))?;
        feed.round = Some(round);
        Ok(())
    }

    /// Make every read of the feed fail (or recover).
    pub fn set_failing(&self, address: &Address, failing: bool) -> Result<(), CoreError> {
        let mut feeds = self.feeds.lock().unwrap_or_else(|e| e.into_inner());
        let feed = feeds
            .get_mut(address)
            .ok_or_else(|| CoreError::external(PROVIDER, format!("No feed deployed at {address}")))?;
        feed.failing = failing;
        Ok(())
    }

    pub fn feed(&self, address: &Address) -> Option<StaticFeed> {
        let feeds = self.feeds.lock().unwrap_or_else(|e| e.into_inner());
        feeds.get(address).cloned()
    }

    fn readable(&self, address: &Address) -> Result<StaticFeed, CoreError> {
        let feed = self
            .feed(address)
            .ok_or_else(|| CoreError::external(PROVIDER, format!("No feed deployed at {address}")))?;
        if feed.failing {
            return Err(CoreError::external(PROVIDER, format!("Feed at {address} reverted")));
        }
        Ok(feed)
    }
}

impl Default for StaticFeedReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FeedReader for StaticFeedReader {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn is_contract(&self, address: &Address) -> Result<bool, CoreError> {
        Ok(self.feed(address).is_some())
    }

    async fn decimals(&self, feed: &Address) -> Result<u8, CoreError> {
        Ok(self.readable(feed)?.decimals)
    }

    async fn latest_round_data(&self, feed: &Address) -> Result<RoundData, CoreError> {
        self.readable(feed)?
            .round
            .ok_or_else(|| CoreError::external(PROVIDER, format!("Feed at {feed} has no rounds")))
    }
}
