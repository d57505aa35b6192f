use serde::{Deserialize, Serialize};

/// Class id `0` means "no parent" (a root class).
pub const ROOT_PARENT: u64 = 0;

/// Id of the bootstrap `CRYPTOS` root class.
pub const CRYPTOS_CLASS_ID: u64 = 1;

/// Id of the bootstrap `STOCKS` root class.
pub const STOCKS_CLASS_ID: u64 = 2;

/// A node of the class taxonomy.
///
/// Ids are minted sequentially from 1 and never reused. A class can be
/// renamed or deactivated; it is never deleted and never reactivated.
/// The zeroed record (`exists == false`) stands for "no such class".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassInfo {
    pub exists: bool,
    pub active: bool,
    pub parent_id: u64,
    pub name: String,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, parent_id: u64) -> Self {
        Self {
            exists: true,
            active: true,
            parent_id,
            name: name.into(),
        }
    }

    /// Usable as a parent or an assignment target.
    pub fn is_live(&self) -> bool {
        self.exists && self.active
    }

    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT
    }
}

/// A class together with its id, as returned by listing helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub id: u64,
    pub info: ClassInfo,
}
