use super::FundingHistorySource;
use crate::errors::ExchangeError;
use crate::models::{FetchWindow, FundingRecord, lenient};
use async_trait::async_trait;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.bybit.com";

const CATEGORY: &str = "inverse";
const SYMBOL: &str = "BTCUSD";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BybitResponse {
    #[serde(rename = "retCode", deserialize_with = "lenient")]
    ret_code: i64,

    #[serde(rename = "retMsg", deserialize_with = "lenient")]
    ret_msg: String,

    #[serde(deserialize_with = "lenient")]
    result: BybitResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BybitResult {
    // decoded item by item so a malformed entry can't sink the page
    #[serde(deserialize_with = "lenient")]
    list: Vec<serde_json::Value>,
}

pub struct Bybit {
    client: reqwest::Client,
    base_url: String,
}

impl Bybit {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn history_url(&self, window: FetchWindow) -> String {
        let mut url = format!(
            "{}/v5/market/funding/history?category={}&symbol={}",
            self.base_url, CATEGORY, SYMBOL
        );

        if let FetchWindow::Range(range) = window {
            url.push_str(&format!(
                "&startTime={}&endTime={}",
                range.start_ms, range.end_ms
            ));
        }

        url
    }
}

impl Default for Bybit {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a history response body. Anything that doesn't decode is treated
/// as an empty page rather than an error.
fn decode_page(body: &[u8]) -> Vec<FundingRecord> {
    let response = match serde_json::from_slice::<BybitResponse>(body) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("[bybit] undecodable funding history body: {e}");
            return Vec::new();
        }
    };

    // status is reported but never fails the fetch
    if response.ret_code != 0 {
        tracing::warn!(
            "[bybit] retCode {}: {}",
            response.ret_code,
            response.ret_msg
        );
    }

    response
        .result
        .list
        .into_iter()
        .map(|item| serde_json::from_value::<FundingRecord>(item).unwrap_or_default())
        .collect()
}

#[async_trait]
impl FundingHistorySource for Bybit {
    fn name(&self) -> &'static str {
        "bybit"
    }

    async fn fetch_page(&self, window: FetchWindow) -> Result<Vec<FundingRecord>, ExchangeError> {
        let url = self.history_url(window);

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ExchangeError::Http)?
            .bytes()
            .await
            .map_err(ExchangeError::Http)?;

        let page = decode_page(&body);
        tracing::debug!("[bybit] {url} -> {} records", page.len());

        Ok(page)
    }
}
