use clap::Parser;
use funding_apr::app;
use funding_apr::config::{Config, day_argument};
use funding_apr::exchanges::bybit::Bybit;
use funding_apr::history::SystemClock;
use std::ffi::OsString;

/// Annualised BTCUSD inverse funding rate on Bybit.
#[derive(Parser)]
#[command(author, version)]
struct Cli {
    /// Days to look back. Anything other than a single positive integer means 30.
    #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
    days: Vec<OsString>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_args(day_argument(&cli.days));

    // stdout carries the report, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let bybit = Bybit::with_base_url(config.base_url.as_str());

    match app::run(&config, &bybit, &SystemClock).await {
        Ok(report) => print!("{report}"),
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    }
}
