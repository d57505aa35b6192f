use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Number of tracked assets. The set is closed: no creation, no deletion.
pub const ASSET_COUNT: usize = 11;

/// One of the fixed, tracked assets.
///
/// The declaration order is the enumerant order used by every per-asset table
/// and by the portfolio report. Never reorder, only append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Asset {
    Btc,
    Eth,
    Sol,
    Bnb,
    Xrp,
    Ada,
    Dot,
    Link,
    Mstr,
    Coin,
    Tron,
}

impl Asset {
    /// All assets in enumerant order.
    pub const ALL: [Asset; ASSET_COUNT] = [
        Asset::Btc,
        Asset::Eth,
        Asset::Sol,
        Asset::Bnb,
        Asset::Xrp,
        Asset::Ada,
        Asset::Dot,
        Asset::Link,
        Asset::Mstr,
        Asset::Coin,
        Asset::Tron,
    ];

    /// Position of this asset in per-asset tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: u8) -> Option<Asset> {
        Self::ALL.get(index as usize).copied()
    }

    /// Ticker symbol, uppercase.
    pub fn symbol(self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Sol => "SOL",
            Asset::Bnb => "BNB",
            Asset::Xrp => "XRP",
            Asset::Ada => "ADA",
            Asset::Dot => "DOT",
            Asset::Link => "LINK",
            Asset::Mstr => "MSTR",
            Asset::Coin => "COIN",
            Asset::Tron => "TRON",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Asset::Btc => "Bitcoin",
            Asset::Eth => "Ethereum",
            Asset::Sol => "Solana",
            Asset::Bnb => "BNB",
            Asset::Xrp => "XRP",
            Asset::Ada => "Cardano",
            Asset::Dot => "Polkadot",
            Asset::Link => "Chainlink",
            Asset::Mstr => "MicroStrategy",
            Asset::Coin => "Coinbase Global",
            Asset::Tron => "TRON",
        }
    }

    /// Classification used before the class taxonomy existed.
    pub fn legacy_class(self) -> LegacyAssetClass {
        match self {
            Asset::Mstr | Asset::Coin => LegacyAssetClass::Stock,
            _ => LegacyAssetClass::Crypto,
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        // TRX is the exchange ticker for TRON
        let upper = if upper == "TRX" { "TRON".to_string() } else { upper };
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.symbol() == upper)
            .ok_or_else(|| CoreError::InvalidInput(format!("Unknown asset: {s}")))
    }
}

/// Two-value classification kept for compatibility with readers that predate
/// the class taxonomy. Set once at construction, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LegacyAssetClass {
    #[default]
    Crypto,
    Stock,
}

impl std::fmt::Display for LegacyAssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegacyAssetClass::Crypto => write!(f, "Crypto"),
            LegacyAssetClass::Stock => write!(f, "Stock"),
        }
    }
}

/// A 20-byte account or contract reference (owner identity, feed contract).
///
/// Text form is `0x` followed by 40 hex digits; parsing accepts either case
/// and an optional `0x` prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null reference.
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 40 {
            return Err(CoreError::InvalidInput(format!(
                "Address must be 40 hex digits, got {} in '{s}'",
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Address(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.to_string()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({self})")
    }
}
