// ═══════════════════════════════════════════════════════════════════
// Model Tests — Asset, Address, RoundData, fixed-point helpers,
// LedgerState, LedgerSettings
// ═══════════════════════════════════════════════════════════════════

use std::str::FromStr;

use asset_ledger_core::errors::CoreError;
use asset_ledger_core::fixed::{self, SCALE};
use asset_ledger_core::models::asset::{Address, Asset, LegacyAssetClass, ASSET_COUNT};
use asset_ledger_core::models::class::ClassInfo;
use asset_ledger_core::models::event::{LedgerEvent, Notification};
use asset_ledger_core::models::ledger::LedgerState;
use asset_ledger_core::models::position::Position;
use asset_ledger_core::models::price::{PriceResolution, PriceSource, RoundData};
use asset_ledger_core::models::settings::LedgerSettings;

const OWNER: &str = "0x00000000000000000000000000000000000000aa";

fn owner() -> Address {
    OWNER.parse().unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Asset
// ═══════════════════════════════════════════════════════════════════

mod asset {
    use super::*;

    #[test]
    fn enumerant_order_is_fixed() {
        let symbols: Vec<&str> = Asset::ALL.iter().map(|a| a.symbol()).collect();
        assert_eq!(
            symbols,
            vec!["BTC", "ETH", "SOL", "BNB", "XRP", "ADA", "DOT", "LINK", "MSTR", "COIN", "TRON"]
        );
        assert_eq!(Asset::ALL.len(), ASSET_COUNT);
    }

    #[test]
    fn index_round_trips_through_from_index() {
        for (i, asset) in Asset::ALL.iter().enumerate() {
            assert_eq!(asset.index(), i);
            assert_eq!(Asset::from_index(i as u8), Some(*asset));
        }
        assert_eq!(Asset::from_index(11), None);
    }

    #[test]
    fn legacy_classes() {
        assert_eq!(Asset::Mstr.legacy_class(), LegacyAssetClass::Stock);
        assert_eq!(Asset::Coin.legacy_class(), LegacyAssetClass::Stock);
        assert_eq!(Asset::Btc.legacy_class(), LegacyAssetClass::Crypto);
        assert_eq!(Asset::Tron.legacy_class(), LegacyAssetClass::Crypto);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Asset::from_str("btc").unwrap(), Asset::Btc);
        assert_eq!(Asset::from_str(" Link ").unwrap(), Asset::Link);
        assert_eq!(Asset::from_str("MSTR").unwrap(), Asset::Mstr);
    }

    #[test]
    fn trx_is_tron() {
        assert_eq!(Asset::from_str("trx").unwrap(), Asset::Tron);
        assert_eq!(Asset::from_str("TRON").unwrap(), Asset::Tron);
    }

    #[test]
    fn unknown_symbol_rejected() {
        let err = Asset::from_str("DOGE").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ref m) if m.contains("DOGE")));
    }

    #[test]
    fn display_is_symbol() {
        assert_eq!(Asset::Coin.to_string(), "COIN");
        assert_eq!(Asset::Ada.name(), "Cardano");
    }

    #[test]
    fn serde_uses_variant_names() {
        assert_eq!(serde_json::to_string(&Asset::Eth).unwrap(), "\"Eth\"");
        let parsed: Asset = serde_json::from_str("\"Sol\"").unwrap();
        assert_eq!(parsed, Asset::Sol);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Address
// ═══════════════════════════════════════════════════════════════════

mod address {
    use super::*;

    #[test]
    fn parse_with_and_without_prefix() {
        let a: Address = "0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419".parse().unwrap();
        let b: Address = "5F4EC3DF9CBD43714FE2740F5E3616155C5B8419".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes()[0], 0x5f);
    }

    #[test]
    fn display_is_lowercase_with_prefix() {
        let a: Address = "0X5F4EC3DF9CBD43714FE2740F5E3616155C5B8419".parse().unwrap();
        assert_eq!(a.to_string(), "0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419");
        assert_eq!(format!("{a:?}"), "Address(0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419)");
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_hex_rejected() {
        let bad = format!("0x{}", "g".repeat(40));
        assert!(matches!(bad.parse::<Address>(), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn zero() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!owner().is_zero());
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&owner()).unwrap();
        assert_eq!(json, format!("\"{OWNER}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, owner());
        assert!(serde_json::from_str::<Address>("\"0xabc\"").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Position & RoundData
// ═══════════════════════════════════════════════════════════════════

mod position {
    use super::*;

    #[test]
    fn total_and_empty() {
        let p = Position::new(3 * SCALE, 100 * SCALE, SCALE / 2);
        assert_eq!(p.total_amount(), Some(3 * SCALE + SCALE / 2));
        assert!(!p.is_empty());
        assert!(Position::default().is_empty());
    }

    #[test]
    fn total_overflow_is_none() {
        let p = Position::new(u128::MAX, 0, 1);
        assert_eq!(p.total_amount(), None);
    }

    #[test]
    fn cost_basis_ignores_rewards() {
        let p = Position::new(310_000_000, 60_000 * SCALE, 9 * SCALE);
        assert_eq!(p.cost_basis().unwrap(), 18_600_000_000_000);
    }

    #[test]
    fn cost_basis_overflow() {
        let p = Position::new(u128::MAX, 2 * SCALE, 0);
        assert!(matches!(p.cost_basis(), Err(CoreError::Overflow(_))));
    }
}

mod round_data {
    use super::*;

    fn round(answer: i128, updated_at: u64) -> RoundData {
        RoundData {
            round_id: 1,
            answer,
            started_at: updated_at,
            updated_at,
            answered_in_round: 1,
        }
    }

    #[test]
    fn positive_answer_with_timestamp_accepted() {
        assert_eq!(round(200_000_000_000, 1_700_000_000).accepted_price(), Some(200_000_000_000));
    }

    #[test]
    fn non_positive_answer_rejected() {
        assert_eq!(round(0, 1_700_000_000).accepted_price(), None);
        assert_eq!(round(-5, 1_700_000_000).accepted_price(), None);
    }

    #[test]
    fn zero_timestamp_rejected() {
        assert_eq!(round(100, 0).accepted_price(), None);
    }

    #[test]
    fn updated_at_as_datetime() {
        let dt = round(1, 1_700_000_000).updated_at_utc().unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
    }

    #[test]
    fn resolution_ok_only_when_positive() {
        let zero = PriceResolution {
            price_usd: 0,
            source: PriceSource::ManualFallback,
        };
        assert!(!zero.is_ok());
        let some = PriceResolution {
            price_usd: 1,
            source: PriceSource::Feed,
        };
        assert!(some.is_ok());
        assert_eq!(PriceSource::ManualOverride.to_string(), "ManualOverride");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Fixed-point
// ═══════════════════════════════════════════════════════════════════

mod fixed_point {
    use super::*;

    #[test]
    fn mul_scaled_truncates() {
        // 3.1 units at 60_000 USD
        assert_eq!(fixed::mul_scaled(310_000_000, 6_000_000_000_000).unwrap(), 18_600_000_000_000);
        assert_eq!(fixed::mul_scaled(1, 1).unwrap(), 0);
    }

    #[test]
    fn mul_scaled_overflow() {
        assert!(matches!(
            fixed::mul_scaled(u128::MAX, 2),
            Err(CoreError::Overflow(_))
        ));
    }

    #[test]
    fn mul_scaled_signed_truncates_toward_zero() {
        assert_eq!(fixed::mul_scaled_signed(-1, 1).unwrap(), 0);
        assert_eq!(fixed::mul_scaled_signed(-3 * SCALE as i128, 2 * SCALE as i128).unwrap(), -6 * SCALE as i128);
    }

    #[test]
    fn to_signed_rejects_huge() {
        assert!(fixed::to_signed(u128::MAX).is_err());
        assert_eq!(fixed::to_signed(42).unwrap(), 42);
    }

    #[test]
    fn format_values() {
        assert_eq!(fixed::format_scaled(150_000_000), "1.5");
        assert_eq!(fixed::format_scaled(0), "0");
        assert_eq!(fixed::format_scaled(1), "0.00000001");
        assert_eq!(fixed::format_scaled(60_000 * SCALE), "60000");
        assert_eq!(fixed::format_scaled_signed(-150_000_000), "-1.5");
    }

    #[test]
    fn parse_values() {
        assert_eq!(fixed::parse_scaled("1.5").unwrap(), 150_000_000);
        assert_eq!(fixed::parse_scaled("60000").unwrap(), 6_000_000_000_000);
        assert_eq!(fixed::parse_scaled("0.00000001").unwrap(), 1);
        assert_eq!(fixed::parse_scaled(".5").unwrap(), 50_000_000);
        assert_eq!(fixed::parse_scaled("2.").unwrap(), 200_000_000);
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", ".", "-1", "1.123456789", "1,5", "abc", "1.2.3"] {
            assert!(
                matches!(fixed::parse_scaled(bad), Err(CoreError::InvalidInput(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn parse_format_agree() {
        for s in ["1.5", "0.00000001", "123456.789", "42"] {
            assert_eq!(fixed::format_scaled(fixed::parse_scaled(s).unwrap()), s);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// LedgerState
// ═══════════════════════════════════════════════════════════════════

mod ledger_state {
    use super::*;

    #[test]
    fn new_state_is_empty_and_unbootstrapped() {
        let state = LedgerState::new(owner());
        assert_eq!(state.owner, owner());
        assert_eq!(state.next_class_id, 0);
        assert!(state.classes.is_empty());
        assert!(state.positions.iter().all(Position::is_empty));
        assert_eq!(state.legacy_class(Asset::Mstr), LegacyAssetClass::Stock);
        assert_eq!(state.legacy_class(Asset::Eth), LegacyAssetClass::Crypto);
    }

    #[test]
    fn ensure_owner() {
        let state = LedgerState::new(owner());
        assert!(state.ensure_owner(&owner()).is_ok());
        let stranger = Address([1u8; 20]);
        assert!(matches!(
            state.ensure_owner(&stranger),
            Err(CoreError::Unauthorized { caller }) if caller == stranger
        ));
    }

    #[test]
    fn class_lookup_is_one_based() {
        let mut state = LedgerState::new(owner());
        state.classes.push(ClassInfo::new("CRYPTOS", 0));
        assert!(state.class(0).is_none());
        assert_eq!(state.class(1).unwrap().name, "CRYPTOS");
        assert!(state.class(2).is_none());
        assert!(state.class(u64::MAX).is_none());
    }

    #[test]
    fn class_info_default_is_zeroed() {
        let info = ClassInfo::default();
        assert!(!info.exists);
        assert!(!info.active);
        assert_eq!(info.parent_id, 0);
        assert!(info.name.is_empty());
        assert!(!info.is_live());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════

mod events {
    use super::*;

    #[test]
    fn notification_stamps_event() {
        let n = Notification::new(LedgerEvent::ClassDeactivated { class_id: 3 });
        assert_eq!(n.event.name(), "ClassDeactivated");
        assert!(!n.id.is_nil());
    }

    #[test]
    fn notifications_have_distinct_ids() {
        let a = Notification::new(LedgerEvent::ClassDeactivated { class_id: 1 });
        let b = Notification::new(LedgerEvent::ClassDeactivated { class_id: 1 });
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn event_serializes_to_json() {
        let event = LedgerEvent::ManualPriceUpdated {
            asset: Asset::Mstr,
            price_usd: 150_000_000,
            enabled: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ManualPriceUpdated"));
        assert!(json.contains("150000000"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// LedgerSettings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn parse_full_settings() {
        let json = format!(
            r#"{{
                "owner": "{OWNER}",
                "rpc_url": "https://eth.example.org",
                "seed_positions": [
                    {{ "asset": "Btc", "principal_amount": 310000000, "avg_buy_price_usd": 6000000000000 }}
                ],
                "manual_prices": [ {{ "asset": "Mstr", "price_usd": 150000000, "enabled": true }} ],
                "feeds": [ {{ "asset": "Eth", "feed": "0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419" }} ]
            }}"#
        );
        let settings = LedgerSettings::from_json_str(&json).unwrap();
        assert_eq!(settings.owner, owner());
        assert_eq!(settings.seed_positions.len(), 1);
        assert_eq!(settings.seed_positions[0].staking_rewards, 0);
        assert!(settings.manual_prices[0].enabled);
        assert_eq!(settings.feeds[0].asset, Asset::Eth);
    }

    #[test]
    fn minimal_settings() {
        let settings = LedgerSettings::from_json_str(&format!(r#"{{ "owner": "{OWNER}" }}"#)).unwrap();
        assert_eq!(settings, LedgerSettings::new(owner()));
    }

    #[test]
    fn zero_owner_rejected() {
        let json = format!(r#"{{ "owner": "0x{}" }}"#, "0".repeat(40));
        assert!(matches!(LedgerSettings::from_json_str(&json), Err(CoreError::Config(_))));
    }

    #[test]
    fn non_http_rpc_rejected() {
        let mut settings = LedgerSettings::new(owner());
        settings.rpc_url = Some("ws://node".into());
        assert!(matches!(settings.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn feeds_without_rpc_url_rejected() {
        let json = format!(
            r#"{{
                "owner": "{OWNER}",
                "feeds": [ {{ "asset": "Eth", "feed": "0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419" }} ]
            }}"#
        );
        assert!(matches!(
            LedgerSettings::from_json_str(&json),
            Err(CoreError::Config(ref m)) if m.contains("rpc_url")
        ));
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            LedgerSettings::from_json_str("{ owner: }"),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, format!(r#"{{ "owner": "{OWNER}" }}"#)).unwrap();
        let settings = LedgerSettings::from_json_file(&path).unwrap();
        assert_eq!(settings.owner, owner());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LedgerSettings::from_json_file(dir.path().join("absent.json")),
            Err(CoreError::FileIO(_))
        ));
    }
}
