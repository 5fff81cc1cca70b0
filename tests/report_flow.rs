use async_trait::async_trait;
use funding_apr::app;
use funding_apr::config::Config;
use funding_apr::errors::ExchangeError;
use funding_apr::exchanges::FundingHistorySource;
use funding_apr::exchanges::bybit::Bybit;
use funding_apr::history::FixedClock;
use funding_apr::models::{FetchWindow, FundingRecord, MAX_PAGE_SIZE, TimeWindow};
use std::collections::VecDeque;
use std::process::Command;
use std::sync::Mutex;

const NOW: i64 = 1_735_689_600_000;
const EIGHT_HOURS: i64 = 8 * 60 * 60 * 1000;

struct Replay {
    pages: Mutex<VecDeque<Vec<FundingRecord>>>,
    requests: Mutex<Vec<TimeWindow>>,
}

impl Replay {
    fn new(pages: Vec<Vec<FundingRecord>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<TimeWindow> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FundingHistorySource for Replay {
    fn name(&self) -> &'static str {
        "replay"
    }

    async fn fetch_page(&self, window: FetchWindow) -> Result<Vec<FundingRecord>, ExchangeError> {
        let FetchWindow::Range(range) = window else {
            panic!("expected a bounded window, got {window:?}");
        };
        self.requests.lock().unwrap().push(range);
        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }
}

fn record(rate: &str, ts: i64) -> FundingRecord {
    FundingRecord {
        funding_rate: rate.into(),
        funding_rate_timestamp: ts.to_string(),
    }
}

fn settlements(len: usize, newest_ts: i64) -> Vec<FundingRecord> {
    (0..len)
        .map(|i| record("0.0001", newest_ts - i as i64 * EIGHT_HOURS))
        .collect()
}

#[tokio::test]
async fn single_page_report() {
    let source = Replay::new(vec![vec![
        record("0.0001", NOW - EIGHT_HOURS),
        record("0.0002", NOW - 2 * EIGHT_HOURS),
        record("0.0003", NOW - 3 * EIGHT_HOURS),
    ]]);

    let report = app::run(&Config::default(), &source, &FixedClock(NOW))
        .await
        .unwrap();

    assert_eq!(report.days, 1.0);
    assert_eq!(
        report.to_string(),
        "Days:  1.0\nTotal: 0.06%\nAPR:   21.90%\n"
    );
    assert_eq!(source.requests().len(), 1);
}

#[tokio::test]
async fn connection_error_aborts_the_run() {
    let config = Config {
        base_url: "http://127.0.0.1:1".into(),
        ..Config::default()
    };
    let bybit = Bybit::with_base_url(config.base_url.as_str());

    let err = app::run(&config, &bybit, &FixedClock(NOW)).await.unwrap_err();

    assert!(matches!(err, ExchangeError::Http(_)));
    assert!(err.to_string().starts_with("HTTP error: "));
}

#[test]
fn binary_prints_error_and_exits_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_funding-apr"))
        .env("BYBIT_REST_URL", "http://127.0.0.1:1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.starts_with("HTTP error: "), "{stdout}");
    assert!(!stdout.contains("Days:"));
}

#[test]
fn extra_arguments_fall_back_to_the_default_window() {
    let output = Command::new(env!("CARGO_BIN_EXE_funding-apr"))
        .args(["7", "8"])
        .env("BYBIT_REST_URL", "http://127.0.0.1:1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    // past argument handling and into the fetch, which fails on the closed port
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.starts_with("HTTP error: "), "{stdout}");
}

#[tokio::test]
async fn full_page_then_short_page() {
    let first = settlements(MAX_PAGE_SIZE, NOW - 1_000);
    let oldest = NOW - 1_000 - (MAX_PAGE_SIZE as i64 - 1) * EIGHT_HOURS;
    let second = settlements(5, oldest - EIGHT_HOURS);
    let source = Replay::new(vec![first, second]);

    let report = app::run(&Config::default(), &source, &FixedClock(NOW))
        .await
        .unwrap();

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].end_ms, NOW);
    assert_eq!(requests[1].end_ms, oldest - 1);
    assert_eq!(requests[1].start_ms, requests[0].start_ms);
    assert_eq!(report.days, 205.0 / 3.0);
}

#[tokio::test]
async fn non_numeric_rate_is_dropped() {
    let source = Replay::new(vec![vec![
        record("0.0001", NOW - EIGHT_HOURS),
        record("0.0001", NOW - 2 * EIGHT_HOURS),
        record("not-a-number", NOW - 3 * EIGHT_HOURS),
        record("0.0001", NOW - 4 * EIGHT_HOURS),
        record("0.0001", NOW - 5 * EIGHT_HOURS),
    ]]);

    let report = app::run(&Config::default(), &source, &FixedClock(NOW))
        .await
        .unwrap();

    assert_eq!(report.days, 4.0 / 3.0);
    assert_eq!(format!("{:.2}", report.total * 100.0), "0.04");
}

#[tokio::test]
async fn default_lookback_is_thirty_days() {
    let source = Replay::new(vec![Vec::new()]);
    let config = Config::from_args(None);

    app::run(&config, &source, &FixedClock(NOW)).await.unwrap();

    assert_eq!(
        source.requests(),
        vec![TimeWindow {
            start_ms: NOW - 30 * 24 * 60 * 60 * 1000,
            end_ms: NOW,
        }]
    );
}
