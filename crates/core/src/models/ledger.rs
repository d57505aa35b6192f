use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::asset::{Address, Asset, LegacyAssetClass, ASSET_COUNT};
use super::class::ClassInfo;
use super::position::{Position, RealizedPnl};
use super::price::PriceConfig;

/// The complete ledger state. Everything in here gets serialized,
/// encrypted, and saved to the portable snapshot file.
///
/// Field order is frozen: future versions append fields at the end and bump
/// the snapshot version, they never reorder or remove existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// The single principal allowed to mutate the ledger.
    pub owner: Address,

    pub positions: [Position; ASSET_COUNT],

    pub legacy_classes: [LegacyAssetClass; ASSET_COUNT],

    pub price_configs: [PriceConfig; ASSET_COUNT],

    /// Next class id to mint. Zero means the taxonomy was never bootstrapped.
    pub next_class_id: u64,

    /// Class arena; the class with id `n` lives at index `n - 1`.
    pub classes: Vec<ClassInfo>,

    pub asset_class_ids: [u64; ASSET_COUNT],

    pub realized: [RealizedPnl; ASSET_COUNT],

    /// JSON-RPC endpoint the feeds are read from, if any.
    #[serde(default)]
    pub rpc_url: Option<String>,
}

impl LedgerState {
    /// Fresh state owned by `owner`, with zeroed positions and no taxonomy yet.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            positions: [Position::default(); ASSET_COUNT],
            legacy_classes: Asset::ALL.map(Asset::legacy_class),
            price_configs: [PriceConfig::default(); ASSET_COUNT],
            next_class_id: 0,
            classes: Vec::new(),
            asset_class_ids: [0; ASSET_COUNT],
            realized: [RealizedPnl::default(); ASSET_COUNT],
            rpc_url: None,
        }
    }

    /// Fail with `Unauthorized` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), CoreError> {
        if *caller != self.owner {
            return Err(CoreError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    pub fn position(&self, asset: Asset) -> &Position {
        &self.positions[asset.index()]
    }

    pub fn position_mut(&mut self, asset: Asset) -> &mut Position {
        &mut self.positions[asset.index()]
    }

    pub fn price_config(&self, asset: Asset) -> &PriceConfig {
        &self.price_configs[asset.index()]
    }

    pub fn price_config_mut(&mut self, asset: Asset) -> &mut PriceConfig {
        &mut self.price_configs[asset.index()]
    }

    pub fn realized(&self, asset: Asset) -> &RealizedPnl {
        &self.realized[asset.index()]
    }

    pub fn realized_mut(&mut self, asset: Asset) -> &mut RealizedPnl {
        &mut self.realized[asset.index()]
    }

    pub fn legacy_class(&self, asset: Asset) -> LegacyAssetClass {
        self.legacy_classes[asset.index()]
    }

    pub fn asset_class_id(&self, asset: Asset) -> u64 {
        self.asset_class_ids[asset.index()]
    }

    /// The class with this id, if it was ever minted.
    pub fn class(&self, id: u64) -> Option<&ClassInfo> {
        let idx = usize::try_from(id.checked_sub(1)?).ok()?;
        self.classes.get(idx)
    }

    pub fn class_mut(&mut self, id: u64) -> Option<&mut ClassInfo> {
        let idx = usize::try_from(id.checked_sub(1)?).ok()?;
        self.classes.get_mut(idx)
    }
}
