pub mod errors;
pub mod fixed;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use errors::CoreError;
use models::{
    asset::{Address, Asset, LegacyAssetClass},
    class::{ClassEntry, ClassInfo},
    event::{LedgerEvent, Notification},
    ledger::LedgerState,
    position::{Position, SellOutcome},
    price::{PriceConfig, PriceResolution},
    report::{AssetReport, PortfolioSummary},
    settings::LedgerSettings,
};
use providers::{static_feed::StaticFeedReader, traits::FeedReader};
use services::{
    position_service::PositionService, price_service::PriceService,
    taxonomy_service::TaxonomyService, valuation_service::ValuationService,
};
use storage::manager::StorageManager;

/// Main entry point for the asset-ledger core library.
///
/// Holds the ledger state, the feed reader used for price resolution, and the
/// outbox of notifications produced by successful commands. Commands take
/// `&mut self` and a `caller`; only the owner may run them. A failed command
/// changes nothing and publishes nothing.
#[must_use]
pub struct AssetLedger {
    state: LedgerState,
    position_service: PositionService,
    taxonomy_service: TaxonomyService,
    price_service: PriceService,
    valuation_service: ValuationService,
    notifications: Vec<Notification>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for AssetLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLedger")
            .field("owner", &self.state.owner)
            .field("classes", &self.state.classes.len())
            .field("feed_reader", &self.price_service.reader_name())
            .field("pending_notifications", &self.notifications.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl AssetLedger {
    /// A fresh ledger owned by `owner`, with no price feeds available.
    pub fn new(owner: Address) -> Self {
        Self::with_feed_reader(owner, Arc::new(StaticFeedReader::new()))
    }

    /// A fresh ledger reading feeds through `reader`.
    pub fn with_feed_reader(owner: Address, reader: Arc<dyn FeedReader>) -> Self {
        Self::build(LedgerState::new(owner), reader)
    }

    /// Wrap an existing state. A state whose taxonomy was never bootstrapped
    /// is bootstrapped here.
    pub fn from_state(state: LedgerState, reader: Arc<dyn FeedReader>) -> Self {
        Self::build(state, reader)
    }

    /// Build a ledger from settings, reading feeds over JSON-RPC when
    /// `rpc_url` is set. Seeds are applied as owner commands.
    pub async fn from_settings(settings: &LedgerSettings) -> Result<Self, CoreError> {
        let reader = providers::reader_for_endpoint(settings.rpc_url.as_deref());
        Self::from_settings_with_reader(settings, reader).await
    }

    /// Same as [`AssetLedger::from_settings`] but reading feeds through
    /// `reader`. The settings' `rpc_url` is still recorded in the state.
    pub async fn from_settings_with_reader(
        settings: &LedgerSettings,
        reader: Arc<dyn FeedReader>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let owner = settings.owner;
        let mut state = LedgerState::new(owner);
        state.rpc_url = settings.rpc_url.clone();
        let mut ledger = Self::build(state, reader);

        for seed in &settings.seed_positions {
            ledger.set_position(
                &owner,
                seed.asset,
                seed.principal_amount,
                seed.avg_buy_price_usd,
                seed.staking_rewards,
            )?;
        }
        for seed in &settings.manual_prices {
            ledger.set_manual_price(&owner, seed.asset, seed.price_usd, seed.enabled)?;
        }
        for seed in &settings.feeds {
            ledger.set_price_feed(&owner, seed.asset, seed.feed).await?;
        }

        tracing::info!(
            %owner,
            positions = settings.seed_positions.len(),
            manual_prices = settings.manual_prices.len(),
            feeds = settings.feeds.len(),
            rpc_url = settings.rpc_url.as_deref().unwrap_or("none"),
            "Ledger created from settings"
        );
        Ok(ledger)
    }

    /// Replace the feed reader (e.g. after changing RPC endpoint).
    pub fn set_feed_reader(&mut self, reader: Arc<dyn FeedReader>) {
        self.price_service = PriceService::new(reader);
    }

    /// The JSON-RPC endpoint recorded for this ledger.
    #[must_use]
    pub fn rpc_url(&self) -> Option<&str> {
        self.state.rpc_url.as_deref()
    }

    #[must_use]
    pub fn feed_reader_name(&self) -> &str {
        self.price_service.reader_name()
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Load a ledger from encrypted snapshot bytes.
    pub fn load_from_bytes(
        encrypted: &[u8],
        password: &str,
        reader: Arc<dyn FeedReader>,
    ) -> Result<Self, CoreError> {
        let state = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(state, reader))
    }

    /// Save the ledger to encrypted bytes. Clears the unsaved-changes flag.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.state, password)?;
        self.dirty = false;
        Ok(bytes)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(
        path: impl AsRef<Path>,
        password: &str,
        reader: Arc<dyn FeedReader>,
    ) -> Result<Self, CoreError> {
        let state = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(state, reader))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: impl AsRef<Path>, password: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.state, path, password)?;
        self.dirty = false;
        Ok(())
    }

    /// Unencrypted JSON dump of the state (debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    #[must_use]
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Returns `true` if the ledger changed since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Notifications ───────────────────────────────────────────────

    /// Notifications published since the last drain, oldest first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Hand all pending notifications to an observer.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // ── Ownership ───────────────────────────────────────────────────

    #[must_use]
    pub fn owner(&self) -> Address {
        self.state.owner
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<(), CoreError> {
        self.state.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(CoreError::InvalidInput("New owner must not be the zero address".into()));
        }
        let previous_owner = self.state.owner;
        self.state.owner = new_owner;
        self.publish(LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    // ── Pricing configuration ───────────────────────────────────────

    /// Point `asset` at an aggregator feed. The reference must be non-zero
    /// and have deployed code.
    pub async fn set_price_feed(&mut self, caller: &Address, asset: Asset, feed: Address) -> Result<(), CoreError> {
        self.state.ensure_owner(caller)?;
        self.price_service.check_feed(asset, &feed).await?;
        self.state.price_config_mut(asset).feed = Some(feed);
        self.publish(LedgerEvent::PriceFeedUpdated { asset, feed });
        Ok(())
    }

    /// Set the manual price and whether it overrides the feed.
    pub fn set_manual_price(
        &mut self,
        caller: &Address,
        asset: Asset,
        price_usd: u128,
        enabled: bool,
    ) -> Result<(), CoreError> {
        self.state.ensure_owner(caller)?;
        let config = self.state.price_config_mut(asset);
        config.manual_price_usd = price_usd;
        config.use_manual_override = enabled;
        self.publish(LedgerEvent::ManualPriceUpdated {
            asset,
            price_usd,
            enabled,
        });
        Ok(())
    }

    // ── Positions ───────────────────────────────────────────────────

    pub fn set_position(
        &mut self,
        caller: &Address,
        asset: Asset,
        principal_amount: u128,
        avg_buy_price_usd: u128,
        staking_rewards: u128,
    ) -> Result<(), CoreError> {
        self.state.ensure_owner(caller)?;
        let event = self.position_service.set_position(
            &mut self.state,
            asset,
            principal_amount,
            avg_buy_price_usd,
            staking_rewards,
        );
        self.publish(event);
        Ok(())
    }

    pub fn add_staking_rewards(&mut self, caller: &Address, asset: Asset, extra: u128) -> Result<(), CoreError> {
        self.state.ensure_owner(caller)?;
        let event = self
            .position_service
            .add_staking_rewards(&mut self.state, asset, extra)?;
        self.publish(event);
        Ok(())
    }

    /// Record a sell and realize its PnL (principal first, then rewards).
    pub fn record_sell(
        &mut self,
        caller: &Address,
        asset: Asset,
        sell_amount: u128,
        sell_price_usd: u128,
    ) -> Result<SellOutcome, CoreError> {
        self.state.ensure_owner(caller)?;
        let (outcome, event) = self
            .position_service
            .record_sell(&mut self.state, asset, sell_amount, sell_price_usd)?;
        self.publish(event);
        Ok(outcome)
    }

    // ── Class taxonomy ──────────────────────────────────────────────

    /// Bootstrap the default taxonomy. Returns `false` (and does nothing)
    /// when it already exists.
    pub fn initialize_taxonomy(&mut self, caller: &Address) -> Result<bool, CoreError> {
        self.state.ensure_owner(caller)?;
        Ok(self.bootstrap_taxonomy())
    }

    pub fn create_class(&mut self, caller: &Address, name: &str, parent_id: u64) -> Result<u64, CoreError> {
        self.state.ensure_owner(caller)?;
        let (id, event) = self
            .taxonomy_service
            .create_class(&mut self.state, name, parent_id)?;
        self.publish(event);
        Ok(id)
    }

    pub fn deactivate_class(&mut self, caller: &Address, id: u64) -> Result<(), CoreError> {
        self.state.ensure_owner(caller)?;
        let event = self.taxonomy_service.deactivate_class(&mut self.state, id)?;
        self.publish(event);
        Ok(())
    }

    pub fn rename_class(&mut self, caller: &Address, id: u64, name: &str) -> Result<(), CoreError> {
        self.state.ensure_owner(caller)?;
        let event = self.taxonomy_service.rename_class(&mut self.state, id, name)?;
        self.publish(event);
        Ok(())
    }

    pub fn set_asset_class(&mut self, caller: &Address, asset: Asset, class_id: u64) -> Result<(), CoreError> {
        self.state.ensure_owner(caller)?;
        let event = self
            .taxonomy_service
            .set_asset_class(&mut self.state, asset, class_id)?;
        self.publish(event);
        Ok(())
    }

    #[must_use]
    pub fn next_class_id(&self) -> u64 {
        self.state.next_class_id
    }

    #[must_use]
    pub fn get_class_info(&self, id: u64) -> ClassInfo {
        self.taxonomy_service.class_info(&self.state, id)
    }

    #[must_use]
    pub fn list_classes(&self) -> Vec<ClassEntry> {
        self.taxonomy_service.list_classes(&self.state)
    }

    #[must_use]
    pub fn children_of(&self, id: u64) -> Vec<ClassEntry> {
        self.taxonomy_service.children_of(&self.state, id)
    }

    #[must_use]
    pub fn class_path(&self, id: u64) -> Vec<String> {
        self.taxonomy_service.class_path(&self.state, id)
    }

    #[must_use]
    pub fn assets_in_class(&self, id: u64) -> Vec<Asset> {
        self.taxonomy_service.assets_in_class(&self.state, id)
    }

    // ── Per-asset reads ─────────────────────────────────────────────

    #[must_use]
    pub fn position(&self, asset: Asset) -> Position {
        *self.state.position(asset)
    }

    #[must_use]
    pub fn legacy_asset_class(&self, asset: Asset) -> LegacyAssetClass {
        self.state.legacy_class(asset)
    }

    #[must_use]
    pub fn asset_class_id(&self, asset: Asset) -> u64 {
        self.state.asset_class_id(asset)
    }

    #[must_use]
    pub fn price_config(&self, asset: Asset) -> PriceConfig {
        *self.state.price_config(asset)
    }

    #[must_use]
    pub fn price_feed(&self, asset: Asset) -> Option<Address> {
        self.state.price_config(asset).feed
    }

    #[must_use]
    pub fn manual_price_usd(&self, asset: Asset) -> u128 {
        self.state.price_config(asset).manual_price_usd
    }

    #[must_use]
    pub fn use_manual_price(&self, asset: Asset) -> bool {
        self.state.price_config(asset).use_manual_override
    }

    #[must_use]
    pub fn realized_pnl_usd(&self, asset: Asset) -> i128 {
        self.state.realized(asset).realized_pnl_usd
    }

    #[must_use]
    pub fn last_sell_price_usd(&self, asset: Asset) -> u128 {
        self.state.realized(asset).last_sell_price_usd
    }

    #[must_use]
    pub fn last_sell_amount(&self, asset: Asset) -> u128 {
        self.state.realized(asset).last_sell_amount
    }

    // ── Prices & valuation ──────────────────────────────────────────

    /// Current USD price of `asset` (1e8-scaled). Never fails; 0 means unknown.
    pub async fn resolve_price(&self, asset: Asset) -> u128 {
        self.resolve_price_detailed(asset).await.price_usd
    }

    /// Current price together with the source it came from.
    pub async fn resolve_price_detailed(&self, asset: Asset) -> PriceResolution {
        self.price_service
            .resolve(asset, self.state.price_config(asset))
            .await
    }

    /// Value, cost and PnL of one asset at its current price.
    pub async fn get_asset_report(&self, asset: Asset) -> Result<AssetReport, CoreError> {
        let price = self.resolve_price_detailed(asset).await;
        self.valuation_service.asset_report(&self.state, asset, price)
    }

    /// Reports for every asset, in enumerant order.
    pub async fn get_portfolio_report(&self) -> Result<Vec<AssetReport>, CoreError> {
        let mut reports = Vec::with_capacity(Asset::ALL.len());
        for asset in Asset::ALL {
            reports.push(self.get_asset_report(asset).await?);
        }
        Ok(reports)
    }

    /// Portfolio totals and per-class allocation.
    pub async fn get_portfolio_summary(&self) -> Result<PortfolioSummary, CoreError> {
        let reports = self.get_portfolio_report().await?;
        self.valuation_service.summarize(&self.state, &reports)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(state: LedgerState, reader: Arc<dyn FeedReader>) -> Self {
        let mut ledger = Self {
            state,
            position_service: PositionService::new(),
            taxonomy_service: TaxonomyService::new(),
            price_service: PriceService::new(reader),
            valuation_service: ValuationService::new(),
            notifications: Vec::new(),
            dirty: false,
        };
        ledger.bootstrap_taxonomy();
        ledger
    }

    fn bootstrap_taxonomy(&mut self) -> bool {
        match self.taxonomy_service.bootstrap(&mut self.state) {
            Some(events) => {
                tracing::info!(classes = self.state.classes.len(), "Class taxonomy bootstrapped");
                for event in events {
                    self.publish(event);
                }
                true
            }
            None => false,
        }
    }

    fn publish(&mut self, event: LedgerEvent) {
        tracing::info!(event = event.name(), details = ?event, "Ledger updated");
        self.notifications.push(Notification::new(event));
        self.dirty = true;
    }
}
