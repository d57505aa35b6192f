use thiserror::Error;

use crate::models::asset::{Address, Asset};

/// Unified error type for the entire asset-ledger-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Access control ──────────────────────────────────────────────
    #[error("Unauthorized caller: {caller}")]
    Unauthorized { caller: Address },

    // ── Validation ──────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Class not found: {0}")]
    ClassNotFound(u64),

    #[error("Class is inactive: {0}")]
    ClassInactive(u64),

    #[error("Insufficient holdings of {asset}: requested {requested}, available {available}")]
    InsufficientHoldings {
        asset: Asset,
        requested: u128,
        available: u128,
    },

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    // ── External price sources ──────────────────────────────────────
    #[error("External source unavailable ({source_name}): {message}")]
    ExternalSourceUnavailable {
        source_name: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Storage / File ──────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed — wrong password or corrupted file")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

/// Coarse failure classes, for callers that branch on the kind of failure
/// rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    InvalidInput,
    NotFound,
    InvalidState,
    ExternalSourceUnavailable,
    Arithmetic,
    Config,
    Storage,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Unauthorized { .. } => ErrorKind::Unauthorized,
            CoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            CoreError::ClassNotFound(_) => ErrorKind::NotFound,
            CoreError::ClassInactive(_) | CoreError::InsufficientHoldings { .. } => {
                ErrorKind::InvalidState
            }
            CoreError::ExternalSourceUnavailable { .. } | CoreError::Network(_) => {
                ErrorKind::ExternalSourceUnavailable
            }
            CoreError::Overflow(_) => ErrorKind::Arithmetic,
            CoreError::Config(_) => ErrorKind::Config,
            CoreError::InvalidFileFormat(_)
            | CoreError::UnsupportedVersion(_)
            | CoreError::Encryption(_)
            | CoreError::Decryption
            | CoreError::Serialization(_)
            | CoreError::Deserialization(_)
            | CoreError::FileIO(_) => ErrorKind::Storage,
        }
    }

    /// Shorthand used by feed readers.
    pub(crate) fn external(source_name: &str, message: impl Into<String>) -> Self {
        CoreError::ExternalSourceUnavailable {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<hex::FromHexError> for CoreError {
    fn from(e: hex::FromHexError) -> Self {
        CoreError::InvalidInput(format!("Invalid hex: {e}"))
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // RPC endpoints commonly embed API keys in the URL path or query;
        // keep only the scheme and host in the message.
        let msg = e.to_string();
        let sanitized = match e.url() {
            Some(url) => {
                let full = url.as_str();
                let host = url.host_str().unwrap_or("<unknown host>");
                msg.replace(full, &format!("{}://{host}/<redacted>", url.scheme()))
            }
            None => msg,
        };
        CoreError::Network(sanitized)
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}
