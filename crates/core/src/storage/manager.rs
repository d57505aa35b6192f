use std::path::Path;

use crate::errors::CoreError;
use crate::models::ledger::LedgerState;

use super::encryption::{self, KdfParams};
use super::format;

/// Save/load ledger snapshots to/from encrypted bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// LedgerState → bincode → AES-256-GCM(Argon2id(password)) → framed bytes.
    pub fn save_to_bytes(state: &LedgerState, password: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_to_bytes_with_params(state, password, KdfParams::default())
    }

    /// Like [`save_to_bytes`](Self::save_to_bytes) with explicit KDF cost.
    pub fn save_to_bytes_with_params(
        state: &LedgerState,
        password: &str,
        kdf_params: KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        kdf_params.validate()?;
        let plaintext = bincode::serialize(state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))?;
        let sealed = encryption::seal(&plaintext, password, kdf_params)?;
        Ok(format::encode(format::CURRENT_VERSION, &sealed))
    }

    /// Framed bytes → header → Argon2id(password, salt) → AES-256-GCM → bincode → LedgerState.
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<LedgerState, CoreError> {
        let (version, sealed) = format::decode(data)?;
        let plaintext = encryption::open(&sealed, password)?;
        let state: LedgerState = bincode::deserialize(&plaintext).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize ledger (v{version}): {e}"))
        })?;
        Ok(state)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(state: &LedgerState, path: impl AsRef<Path>, password: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(state, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<Path>, password: &str) -> Result<LedgerState, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
