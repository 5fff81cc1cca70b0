use crate::config::Config;
use crate::errors::ExchangeError;
use crate::exchanges::FundingHistorySource;
use crate::history::clock::lookback_start;
use crate::history::{Clock, Paginator};
use crate::report::Report;

/// Fetches the configured lookback from `source` and summarises it.
pub async fn run(
    config: &Config,
    source: &dyn FundingHistorySource,
    clock: &dyn Clock,
) -> Result<Report, ExchangeError> {
    let start_ms = lookback_start(clock, config.lookback_days);

    tracing::info!(
        "[{}] fetching funding history for the last {} days (from {start_ms})",
        source.name(),
        config.lookback_days
    );

    let rates = Paginator::new(source, clock)
        .with_policy(config.policy)
        .with_pagination(config.pagination)
        .collect_rates(start_ms)
        .await?;

    Ok(Report::from_rates(&rates, config.year_basis))
}
