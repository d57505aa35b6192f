use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::class::{ClassEntry, ClassInfo, CRYPTOS_CLASS_ID, ROOT_PARENT, STOCKS_CLASS_ID};
use crate::models::event::LedgerEvent;
use crate::models::ledger::LedgerState;

/// Maintains the class taxonomy: an append-only forest of named classes
/// and the per-asset class assignment.
///
/// Classes are soft-deleted only. Deactivating a class neither cascades to
/// its children nor reassigns assets pointing at it.
pub struct TaxonomyService;

impl TaxonomyService {
    pub fn new() -> Self {
        Self
    }

    /// Create the two root classes and assign every asset, once.
    ///
    /// Runs only while no class id was ever minted; returns `None` otherwise.
    /// `CRYPTOS` (1) receives every asset, then `MSTR` and `COIN` move to
    /// `STOCKS` (2).
    pub fn bootstrap(&self, state: &mut LedgerState) -> Option<Vec<LedgerEvent>> {
        if state.next_class_id != 0 {
            return None;
        }
        state.next_class_id = 1;

        let mut events = Vec::new();
        for name in ["CRYPTOS", "STOCKS"] {
            let id = self.mint(state, name.to_string(), ROOT_PARENT);
            events.push(LedgerEvent::ClassCreated {
                class_id: id,
                parent_id: ROOT_PARENT,
                name: name.to_string(),
            });
        }

        for asset in Asset::ALL {
            state.asset_class_ids[asset.index()] = CRYPTOS_CLASS_ID;
        }
        for asset in [Asset::Mstr, Asset::Coin] {
            state.asset_class_ids[asset.index()] = STOCKS_CLASS_ID;
        }
        events.extend(Asset::ALL.iter().map(|&asset| LedgerEvent::AssetClassUpdated {
            asset,
            class_id: state.asset_class_id(asset),
        }));

        Some(events)
    }

    /// Create a class under `parent_id` (0 for a root). Returns the new id.
    pub fn create_class(
        &self,
        state: &mut LedgerState,
        name: &str,
        parent_id: u64,
    ) -> Result<(u64, LedgerEvent), CoreError> {
        let name = Self::validate_name(name)?;
        if parent_id != ROOT_PARENT {
            Self::require_live(state, parent_id)?;
        }
        if state.next_class_id == 0 {
            return Err(CoreError::InvalidInput(
                "Class taxonomy has not been bootstrapped".into(),
            ));
        }

        let id = self.mint(state, name.clone(), parent_id);
        Ok((
            id,
            LedgerEvent::ClassCreated {
                class_id: id,
                parent_id,
                name,
            },
        ))
    }

    pub fn deactivate_class(&self, state: &mut LedgerState, id: u64) -> Result<LedgerEvent, CoreError> {
        Self::require_live(state, id)?;
        if let Some(class) = state.class_mut(id) {
            class.active = false;
        }
        Ok(LedgerEvent::ClassDeactivated { class_id: id })
    }

    /// Rename a class. Inactive classes can still be renamed.
    pub fn rename_class(&self, state: &mut LedgerState, id: u64, name: &str) -> Result<LedgerEvent, CoreError> {
        let class = state.class_mut(id).ok_or(CoreError::ClassNotFound(id))?;
        let name = Self::validate_name(name)?;
        class.name = name.clone();
        Ok(LedgerEvent::ClassRenamed { class_id: id, name })
    }

    pub fn set_asset_class(
        &self,
        state: &mut LedgerState,
        asset: Asset,
        class_id: u64,
    ) -> Result<LedgerEvent, CoreError> {
        Self::require_live(state, class_id)?;
        state.asset_class_ids[asset.index()] = class_id;
        Ok(LedgerEvent::AssetClassUpdated { asset, class_id })
    }

    /// The class record, or the zeroed record when `id` was never minted.
    pub fn class_info(&self, state: &LedgerState, id: u64) -> ClassInfo {
        state.class(id).cloned().unwrap_or_default()
    }

    /// Every minted class in id order, active or not.
    pub fn list_classes(&self, state: &LedgerState) -> Vec<ClassEntry> {
        state
            .classes
            .iter()
            .enumerate()
            .map(|(idx, info)| ClassEntry {
                id: idx as u64 + 1,
                info: info.clone(),
            })
            .collect()
    }

    /// Direct children of `id` (use 0 for the roots), in id order.
    pub fn children_of(&self, state: &LedgerState, id: u64) -> Vec<ClassEntry> {
        self.list_classes(state)
            .into_iter()
            .filter(|entry| entry.info.parent_id == id)
            .collect()
    }

    /// Names from the root down to `id`. Empty when `id` does not exist.
    ///
    /// Parents always predate their children, so following parent links
    /// strictly decreases the id and terminates.
    pub fn class_path(&self, state: &LedgerState, id: u64) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(class) = state.class(current) {
            path.push(class.name.clone());
            if class.is_root() || class.parent_id >= current {
                break;
            }
            current = class.parent_id;
        }
        path.reverse();
        path
    }

    /// Assets currently assigned to exactly `id` (not its descendants).
    pub fn assets_in_class(&self, state: &LedgerState, id: u64) -> Vec<Asset> {
        Asset::ALL
            .iter()
            .copied()
            .filter(|&asset| state.asset_class_id(asset) == id)
            .collect()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn mint(&self, state: &mut LedgerState, name: String, parent_id: u64) -> u64 {
        let id = state.next_class_id;
        state.classes.push(ClassInfo::new(name, parent_id));
        state.next_class_id += 1;
        debug_assert_eq!(state.classes.len() as u64, id);
        id
    }

    /// Names are stored verbatim; only the empty string is rejected.
    fn validate_name(name: &str) -> Result<String, CoreError> {
        if name.is_empty() {
            return Err(CoreError::InvalidInput("Class name must not be empty".into()));
        }
        Ok(name.to_string())
    }

    fn require_live(state: &LedgerState, id: u64) -> Result<(), CoreError> {
        match state.class(id) {
            Some(class) if class.is_live() => Ok(()),
            Some(_) => Err(CoreError::ClassInactive(id)),
            None => Err(CoreError::ClassNotFound(id)),
        }
    }
}

impl Default for TaxonomyService {
    fn default() -> Self {
        Self::new()
    }
}
