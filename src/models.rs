use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Bybit caps funding history pages at 200 records.
pub const MAX_PAGE_SIZE: usize = 200;

/// One funding settlement as the exchange reports it. Both values stay
/// strings until the paginator decides what to do with them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FundingRecord {
    #[serde(rename = "fundingRate", deserialize_with = "lenient")]
    pub funding_rate: String,

    #[serde(rename = "fundingRateTimestamp", deserialize_with = "lenient")]
    pub funding_rate_timestamp: String,
}

/// Query range of a single request, epoch milliseconds, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

/// What a single fetch asks the exchange for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchWindow {
    /// Let the exchange pick: the most recent page.
    Latest,
    Range(TimeWindow),
}

/// Field deserializer that falls back to `T::default()` when the value has
/// the wrong shape (null, number for a string, and so on), so one bad field
/// never takes its siblings down with it.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
