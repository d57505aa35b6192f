// ═══════════════════════════════════════════════════════════════════
// Provider Tests — ABI decoding for the JSON-RPC reader,
// StaticFeedReader behaviour
// ═══════════════════════════════════════════════════════════════════

use asset_ledger_core::errors::CoreError;
use asset_ledger_core::models::asset::Address;
use asset_ledger_core::models::price::RoundData;
use asset_ledger_core::providers::rpc::{
    decode_decimals, decode_round_data, decode_words, RpcFeedReader, SELECTOR_DECIMALS,
    SELECTOR_LATEST_ROUND_DATA,
};
use asset_ledger_core::providers::static_feed::StaticFeedReader;
use asset_ledger_core::providers::traits::FeedReader;

fn feed_addr() -> Address {
    "0x5f4ec3df9cbd43714fe2740f5e3616155c5b8419".parse().unwrap()
}

/// 64 hex digits for an unsigned value.
fn uint_word(v: u128) -> String {
    format!("{:064x}", v)
}

/// 64 hex digits for a two's-complement int256.
fn int_word(v: i128) -> String {
    let fill = if v < 0 { "f" } else { "0" };
    format!("{}{:032x}", fill.repeat(32), v)
}

// ═══════════════════════════════════════════════════════════════════
// ABI decoding
// ═══════════════════════════════════════════════════════════════════

mod abi {
    use super::*;

    #[test]
    fn selectors() {
        assert_eq!(SELECTOR_DECIMALS, "0x313ce567");
        assert_eq!(SELECTOR_LATEST_ROUND_DATA, "0xfeaf968c");
    }

    #[test]
    fn words_split_on_32_bytes() {
        let data = format!("0x{}{}", uint_word(1), uint_word(2));
        let words = decode_words(&data).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0][31], 1);
        assert_eq!(words[1][31], 2);
    }

    #[test]
    fn words_reject_partial_word() {
        let err = decode_words("0x0102").unwrap_err();
        assert!(matches!(err, CoreError::ExternalSourceUnavailable { .. }));
    }

    #[test]
    fn words_reject_non_hex() {
        assert!(decode_words("0xnothex").is_err());
    }

    #[test]
    fn empty_data_is_no_words() {
        assert!(decode_words("0x").unwrap().is_empty());
    }

    #[test]
    fn decimals() {
        assert_eq!(decode_decimals(&format!("0x{}", uint_word(8))).unwrap(), 8);
        assert_eq!(decode_decimals(&format!("0x{}", uint_word(18))).unwrap(), 18);
    }

    #[test]
    fn decimals_out_of_range() {
        assert!(decode_decimals(&format!("0x{}", uint_word(256))).is_err());
        assert!(decode_decimals("0x").is_err());
    }

    #[test]
    fn round_data() {
        let data = format!(
            "0x{}{}{}{}{}",
            uint_word(18_446_744_073_709_562_301),
            int_word(6_000_000_000_000),
            uint_word(1_700_000_000),
            uint_word(1_700_000_012),
            uint_word(18_446_744_073_709_562_301),
        );
        let round = decode_round_data(&data).unwrap();
        assert_eq!(
            round,
            RoundData {
                round_id: 18_446_744_073_709_562_301,
                answer: 6_000_000_000_000,
                started_at: 1_700_000_000,
                updated_at: 1_700_000_012,
                answered_in_round: 18_446_744_073_709_562_301,
            }
        );
        assert_eq!(round.accepted_price(), Some(6_000_000_000_000));
    }

    #[test]
    fn round_data_negative_answer() {
        let data = format!(
            "0x{}{}{}{}{}",
            uint_word(1),
            int_word(-42),
            uint_word(1),
            uint_word(1),
            uint_word(1),
        );
        let round = decode_round_data(&data).unwrap();
        assert_eq!(round.answer, -42);
        assert_eq!(round.accepted_price(), None);
    }

    #[test]
    fn round_data_too_short() {
        let data = format!("0x{}{}", uint_word(1), int_word(1));
        assert!(matches!(
            decode_round_data(&data),
            Err(CoreError::ExternalSourceUnavailable { .. })
        ));
    }

    #[test]
    fn round_data_answer_beyond_i128() {
        // Positive int256 with bits set above 128
        let huge = format!("{}{}", "0".repeat(31), "1".repeat(33));
        let data = format!(
            "0x{}{}{}{}{}",
            uint_word(1),
            huge,
            uint_word(1),
            uint_word(1),
            uint_word(1),
        );
        assert!(decode_round_data(&data).is_err());
    }

    #[test]
    fn round_data_timestamp_beyond_u64() {
        let data = format!(
            "0x{}{}{}{}{}",
            uint_word(1),
            int_word(1),
            uint_word(1),
            uint_word(u64::MAX as u128 + 1),
            uint_word(1),
        );
        assert!(decode_round_data(&data).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// RpcFeedReader
// ═══════════════════════════════════════════════════════════════════

mod rpc_reader {
    use super::*;

    #[test]
    fn name() {
        let reader = RpcFeedReader::new("http://127.0.0.1:8545");
        assert_eq!(reader.name(), "JSON-RPC");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        // Port 9 (discard) on localhost is not an RPC node
        let reader = RpcFeedReader::new("http://127.0.0.1:9");
        assert!(reader.latest_round_data(&feed_addr()).await.is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// StaticFeedReader
// ═══════════════════════════════════════════════════════════════════

mod static_reader {
    use super::*;

    #[tokio::test]
    async fn undeployed_address_is_not_a_contract() {
        let reader = StaticFeedReader::new();
        assert!(!reader.is_contract(&feed_addr()).await.unwrap());
        assert!(reader.latest_round_data(&feed_addr()).await.is_err());
        assert!(reader.decimals(&feed_addr()).await.is_err());
    }

    #[tokio::test]
    async fn deployed_feed_without_rounds() {
        let reader = StaticFeedReader::new();
        reader.deploy(feed_addr(), 8);
        assert!(reader.is_contract(&feed_addr()).await.unwrap());
        assert_eq!(reader.decimals(&feed_addr()).await.unwrap(), 8);
        assert!(reader.latest_round_data(&feed_addr()).await.is_err());
    }

    #[tokio::test]
    async fn push_answer_advances_rounds() {
        let reader = StaticFeedReader::new();
        reader.deploy(feed_addr(), 8);
        assert_eq!(reader.push_answer(&feed_addr(), 100, 10).unwrap(), 1);
        assert_eq!(reader.push_answer(&feed_addr(), 200, 20).unwrap(), 2);

        let round = reader.latest_round_data(&feed_addr()).await.unwrap();
        assert_eq!(round.round_id, 2);
        assert_eq!(round.answer, 200);
        assert_eq!(round.started_at, 20);
        assert_eq!(round.updated_at, 20);
        assert_eq!(round.answered_in_round, 2);
    }

    #[test]
    fn push_to_missing_feed_fails() {
        let reader = StaticFeedReader::new();
        assert!(reader.push_answer(&feed_addr(), 1, 1).is_err());
        assert!(reader.set_failing(&feed_addr(), true).is_err());
    }

    #[tokio::test]
    async fn set_round_verbatim() {
        let reader = StaticFeedReader::new();
        reader.deploy(feed_addr(), 8);
        let round = RoundData {
            round_id: 9,
            answer: 5,
            started_at: 0,
            updated_at: 0,
            answered_in_round: 9,
        };
        reader.set_round(&feed_addr(), round).unwrap();
        assert_eq!(reader.latest_round_data(&feed_addr()).await.unwrap(), round);
    }

    #[tokio::test]
    async fn push_after_last_round_id_overflows() {
        let reader = StaticFeedReader::new();
        reader.deploy(feed_addr(), 8);
        let last = RoundData {
            round_id: u128::MAX,
            answer: 5,
            started_at: 1,
            updated_at: 1,
            answered_in_round: u128::MAX,
        };
        reader.set_round(&feed_addr(), last).unwrap();

        assert!(matches!(
            reader.push_answer(&feed_addr(), 6, 2),
            Err(CoreError::Overflow(_))
        ));
        // The stored round is untouched
        assert_eq!(reader.latest_round_data(&feed_addr()).await.unwrap(), last);
    }

    #[tokio::test]
    async fn failing_feed_errors_but_stays_deployed() {
        let reader = StaticFeedReader::new();
        reader.deploy(feed_addr(), 8);
        reader.push_answer(&feed_addr(), 100, 10).unwrap();
        reader.set_failing(&feed_addr(), true).unwrap();

        assert!(reader.is_contract(&feed_addr()).await.unwrap());
        assert!(matches!(
            reader.latest_round_data(&feed_addr()).await,
            Err(CoreError::ExternalSourceUnavailable { .. })
        ));

        reader.set_failing(&feed_addr(), false).unwrap();
        assert_eq!(reader.latest_round_data(&feed_addr()).await.unwrap().answer, 100);
    }

    #[test]
    fn redeploy_resets_feed() {
        let reader = StaticFeedReader::new();
        reader.deploy(feed_addr(), 8);
        reader.push_answer(&feed_addr(), 100, 10).unwrap();
        reader.deploy(feed_addr(), 18);
        let feed = reader.feed(&feed_addr()).unwrap();
        assert_eq!(feed.decimals, 18);
        assert!(feed.round.is_none());
    }
}
