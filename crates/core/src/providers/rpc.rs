use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::asset::Address;
use crate::models::price::RoundData;
use super::traits::FeedReader;

const PROVIDER: &str = "JSON-RPC";

/// `decimals()`
pub const SELECTOR_DECIMALS: &str = "0x313ce567";

/// `latestRoundData()`
pub const SELECTOR_LATEST_ROUND_DATA: &str = "0xfeaf968c";

const WORD: usize = 32;

/// Reads Chainlink-style aggregator contracts through an Ethereum JSON-RPC
/// endpoint.
///
/// - **`is_contract`**: `eth_getCode` at `latest`, non-empty code means deployed.
/// - **`decimals` / `latest_round_data`**: `eth_call` with the function
///   selector, ABI-decoded from the returned 32-byte words.
///
/// Every call is a single request: no retries, no caching.
pub struct RpcFeedReader {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcFeedReader {
    pub fn new(url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn request(&self, method: &str, params: serde_json::Value) -> Result<String, CoreError> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let resp: RpcResponse = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::external(PROVIDER, format!("Malformed response to {method}: {e}")))?;

        if let Some(err) = resp.error {
            return Err(CoreError::external(
                PROVIDER,
                format!("{method} failed ({}): {}", err.code, err.message),
            ));
        }

        resp.result
            .ok_or_else(|| CoreError::external(PROVIDER, format!("{method} returned no result")))
    }

    async fn eth_call(&self, to: &Address, selector: &str) -> Result<String, CoreError> {
        self.request(
            "eth_call",
            json!([{ "to": to.to_string(), "data": selector }, "latest"]),
        )
        .await
    }
}

// ── JSON-RPC wire types ─────────────────────────────────────────────

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl FeedReader for RpcFeedReader {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn is_contract(&self, address: &Address) -> Result<bool, CoreError> {
        let code = self
            .request("eth_getCode", json!([address.to_string(), "latest"]))
            .await?;
        let digits = strip_0x(&code);
        Ok(!digits.is_empty() && digits.chars().any(|c| c != '0'))
    }

    async fn decimals(&self, feed: &Address) -> Result<u8, CoreError> {
        let data = self.eth_call(feed, SELECTOR_DECIMALS).await?;
        decode_decimals(&data)
    }

    async fn latest_round_data(&self, feed: &Address) -> Result<RoundData, CoreError> {
        let data = self.eth_call(feed, SELECTOR_LATEST_ROUND_DATA).await?;
        decode_round_data(&data)
    }
}

// ── ABI decoding ────────────────────────────────────────────────────

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// Split hex return data into 32-byte ABI words.
pub fn decode_words(data: &str) -> Result<Vec<[u8; WORD]>, CoreError> {
    let bytes = hex::decode(strip_0x(data.trim()))
        .map_err(|e| CoreError::external(PROVIDER, format!("Return data is not hex: {e}")))?;
    if bytes.len() % WORD != 0 {
        return Err(CoreError::external(
            PROVIDER,
            format!("Return data length {} is not a multiple of 32", bytes.len()),
        ));
    }
    Ok(bytes
        .chunks_exact(WORD)
        .map(|chunk| {
            let mut word = [0u8; WORD];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

/// Decode the return data of `decimals() returns (uint8)`.
pub fn decode_decimals(data: &str) -> Result<u8, CoreError> {
    let words = decode_words(data)?;
    let word = words
        .first()
        .ok_or_else(|| CoreError::external(PROVIDER, "decimals() returned no data"))?;
    if word[..WORD - 1].iter().any(|&b| b != 0) {
        return Err(CoreError::external(PROVIDER, "decimals() value exceeds uint8"));
    }
    Ok(word[WORD - 1])
}

/// Decode the return data of
/// `latestRoundData() returns (uint80, int256, uint256, uint256, uint80)`.
pub fn decode_round_data(data: &str) -> Result<RoundData, CoreError> {
    let words = decode_words(data)?;
    if words.len() < 5 {
        return Err(CoreError::external(
            PROVIDER,
            format!("latestRoundData() returned {} words, expected 5", words.len()),
        ));
    }
    Ok(RoundData {
        round_id: word_to_u128(&words[0], "roundId")?,
        answer: word_to_i128(&words[1])?,
        started_at: word_to_u64(&words[2], "startedAt")?,
        updated_at: word_to_u64(&words[3], "updatedAt")?,
        answered_in_round: word_to_u128(&words[4], "answeredInRound")?,
    })
}

fn word_to_u128(word: &[u8; WORD], field: &str) -> Result<u128, CoreError> {
    if word[..16].iter().any(|&b| b != 0) {
        return Err(CoreError::external(PROVIDER, format!("{field} exceeds 128 bits")));
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

fn word_to_u64(word: &[u8; WORD], field: &str) -> Result<u64, CoreError> {
    if word[..24].iter().any(|&b| b != 0) {
        return Err(CoreError::external(PROVIDER, format!("{field} exceeds 64 bits")));
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(low))
}

/// Two's-complement `int256` narrowed to `i128`; values outside the `i128`
/// range are rejected as malformed.
fn word_to_i128(word: &[u8; WORD]) -> Result<i128, CoreError> {
    let negative = word[16] & 0x80 != 0;
    let extension = if negative { 0xff } else { 0x00 };
    if word[..16].iter().any(|&b| b != extension) {
        return Err(CoreError::external(PROVIDER, "answer exceeds 128 bits"));
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(i128::from_be_bytes(low))
}
