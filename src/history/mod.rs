pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use crate::errors::ExchangeError;
use crate::exchanges::FundingHistorySource;
use crate::models::{FetchWindow, FundingRecord, MAX_PAGE_SIZE, TimeWindow};

/// What to do with a record whose rate isn't a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    #[default]
    SkipInvalid,
    FailFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pagination {
    /// Walk backward through full pages until a short one comes back.
    #[default]
    Exhaustive,
    /// Take the exchange's latest page and stop.
    FirstPageOnly,
}

/// Walks an exchange's funding history backward in time and collects every
/// parsed rate, newest first.
pub struct Paginator<'a> {
    source: &'a dyn FundingHistorySource,
    clock: &'a dyn Clock,
    policy: ParsePolicy,
    pagination: Pagination,
}

impl<'a> Paginator<'a> {
    pub fn new(source: &'a dyn FundingHistorySource, clock: &'a dyn Clock) -> Self {
        Self {
            source,
            clock,
            policy: ParsePolicy::default(),
            pagination: Pagination::default(),
        }
    }

    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Collects all rates from `start_ms` up to now. The first fetch error
    /// aborts the walk and nothing collected so far is returned.
    pub async fn collect_rates(&self, start_ms: i64) -> Result<Vec<f64>, ExchangeError> {
        let name = self.source.name();
        let mut window = TimeWindow {
            start_ms,
            end_ms: self.clock.now_ms(),
        };
        let mut rates = Vec::new();
        let mut pages = 0usize;

        loop {
            let request = match self.pagination {
                Pagination::Exhaustive => FetchWindow::Range(window),
                Pagination::FirstPageOnly => FetchWindow::Latest,
            };

            let page = self.source.fetch_page(request).await?;
            pages += 1;
            tracing::debug!(
                "[{name}] page {pages}: {}..{} returned {} records",
                window.start_ms,
                window.end_ms,
                page.len()
            );

            self.push_rates(&page, &mut rates)?;

            if self.pagination == Pagination::FirstPageOnly || page.len() != MAX_PAGE_SIZE {
                break;
            }

            let next_end = next_end_ms(&page)?;
            if next_end >= window.end_ms {
                return Err(ExchangeError::UnexpectedData(format!(
                    "pagination stalled: next endTime {next_end} is not before {}",
                    window.end_ms
                )));
            }
            window.end_ms = next_end;
        }

        tracing::info!(
            "[{name}] collected {} funding rates over {pages} page(s)",
            rates.len()
        );

        Ok(rates)
    }

    fn push_rates(&self, page: &[FundingRecord], rates: &mut Vec<f64>) -> Result<(), ExchangeError> {
        for record in page {
            match record.funding_rate.parse::<f64>() {
                Ok(rate) => rates.push(rate),
                Err(e) => match self.policy {
                    ParsePolicy::SkipInvalid => {
                        tracing::debug!("skipping funding rate {:?}: {e}", record.funding_rate);
                    }
                    ParsePolicy::FailFast => {
                        return Err(ExchangeError::UnexpectedData(format!(
                            "invalid funding rate {:?}: {e}",
                            record.funding_rate
                        )));
                    }
                },
            }
        }

        Ok(())
    }
}

/// End of the next window: just before the oldest record of a full page.
/// Pages are newest first, so the oldest record is the last one.
fn next_end_ms(page: &[FundingRecord]) -> Result<i64, ExchangeError> {
    let oldest = page
        .last()
        .ok_or_else(|| ExchangeError::UnexpectedData("empty page has no oldest record".into()))?;

    let ts = oldest.funding_rate_timestamp.parse::<i64>().map_err(|e| {
        ExchangeError::UnexpectedData(format!(
            "invalid fundingRateTimestamp {:?}: {e}",
            oldest.funding_rate_timestamp
        ))
    })?;

    ts.checked_sub(1).ok_or_else(|| {
        ExchangeError::UnexpectedData(format!("fundingRateTimestamp {ts} has no predecessor"))
    })
}
