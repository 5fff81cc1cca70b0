use crate::errors::ExchangeError;
use crate::models::{FetchWindow, FundingRecord};
use async_trait::async_trait;

pub mod bybit;

#[async_trait]
pub trait FundingHistorySource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch one page of funding history, newest record first.
    async fn fetch_page(&self, window: FetchWindow) -> Result<Vec<FundingRecord>, ExchangeError>;
}
