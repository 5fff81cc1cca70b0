use crate::exchanges::bybit::DEFAULT_BASE_URL;
use crate::history::{Pagination, ParsePolicy};
use crate::report::YearBasis;
use std::env;
use std::ffi::OsString;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub lookback_days: u32,
    pub base_url: String,
    pub policy: ParsePolicy,
    pub pagination: Pagination,
    pub year_basis: YearBasis,
}

impl Config {
    /// Builds the run configuration from the optional day-count argument.
    /// `.env` is loaded first so `RUST_LOG` and `BYBIT_REST_URL` can live there.
    pub fn from_args(days: Option<&str>) -> Self {
        dotenvy::dotenv().ok();

        // only the host is overridable; the query itself is fixed
        let base_url = env::var("BYBIT_REST_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            lookback_days: parse_lookback_days(days),
            base_url,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            base_url: DEFAULT_BASE_URL.to_string(),
            policy: ParsePolicy::default(),
            pagination: Pagination::default(),
            year_basis: YearBasis::default(),
        }
    }
}

/// The day count is only read when exactly one argument was given and it is
/// valid UTF-8. Anything else runs with the default lookback.
pub fn day_argument(args: &[OsString]) -> Option<&str> {
    match args {
        [days] => days.to_str(),
        _ => None,
    }
}

/// Anything that isn't a positive whole number of days means the default.
/// That includes negative counts such as `-3`, which would otherwise put the
/// start of the window in the future.
pub fn parse_lookback_days(arg: Option<&str>) -> u32 {
    match arg.and_then(|s| s.parse::<u32>().ok()).unwrap_or(0) {
        0 => DEFAULT_LOOKBACK_DAYS,
        days => days,
    }
}
