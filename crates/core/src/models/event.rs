use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::{Address, Asset};

/// Side effect of a successful mutation, for external observers
/// (indexers, dashboards). Never consulted by the ledger itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    PositionUpdated {
        asset: Asset,
        principal_amount: u128,
        avg_buy_price_usd: u128,
        staking_rewards: u128,
    },
    StakingRewardsAdded {
        asset: Asset,
        added: u128,
        staking_rewards: u128,
    },
    SellRecorded {
        asset: Asset,
        amount: u128,
        price_usd: u128,
        principal_sold: u128,
        rewards_sold: u128,
        realized_delta_usd: i128,
        realized_total_usd: i128,
    },
    PriceFeedUpdated {
        asset: Asset,
        feed: Address,
    },
    ManualPriceUpdated {
        asset: Asset,
        price_usd: u128,
        enabled: bool,
    },
    ClassCreated {
        class_id: u64,
        parent_id: u64,
        name: String,
    },
    ClassDeactivated {
        class_id: u64,
    },
    ClassRenamed {
        class_id: u64,
        name: String,
    },
    AssetClassUpdated {
        asset: Asset,
        class_id: u64,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

impl LedgerEvent {
    /// Short event name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::PositionUpdated { .. } => "PositionUpdated",
            LedgerEvent::StakingRewardsAdded { .. } => "StakingRewardsAdded",
            LedgerEvent::SellRecorded { .. } => "SellRecorded",
            LedgerEvent::PriceFeedUpdated { .. } => "PriceFeedUpdated",
            LedgerEvent::ManualPriceUpdated { .. } => "ManualPriceUpdated",
            LedgerEvent::ClassCreated { .. } => "ClassCreated",
            LedgerEvent::ClassDeactivated { .. } => "ClassDeactivated",
            LedgerEvent::ClassRenamed { .. } => "ClassRenamed",
            LedgerEvent::AssetClassUpdated { .. } => "AssetClassUpdated",
            LedgerEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

/// A ledger event stamped with an id and the time it was emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub event: LedgerEvent,
}

impl Notification {
    pub fn new(event: LedgerEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            event,
        }
    }
}
