//! weeklows CLI: weekly high/low timing report for one ticker.
//!
//! Loads hourly bars (live from Yahoo Finance, or `--data` CSV), ranks the
//! target week's extremes, and averages when weekly lows and highs happen
//! over a trailing window.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use weeklows_core::analysis::{analyze, AnalysisOptions, DEFAULT_TOP};
use weeklows_core::data::{load_bars, DataProvider, FetchRequest, SourceSpec, YahooProvider};
use weeklows_core::report::{render_text, to_json};
use weeklows_core::{AnalysisError, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "weeklows",
    version,
    about = "Weekly highs/lows and their average time of day from hourly bars"
)]
struct Cli {
    /// Ticker symbol to analyze (e.g., AAPL).
    symbol: String,

    /// Any date in the target week (YYYY-MM-DD). Defaults to the most recent complete week.
    #[arg(long, value_parser = parse_date)]
    week: Option<NaiveDate>,

    /// Trailing weeks to average, target week included. Defaults to 12.
    #[arg(long)]
    window: Option<i64>,

    /// CSV with timestamp,low,high columns; skips the live download.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Calendar days of hourly history to download. Defaults to 60.
    #[arg(long)]
    days: Option<u32>,

    /// Disable split/dividend adjustment on the live download.
    #[arg(long, default_value_t = false)]
    no_auto_adjust: bool,

    /// TOML settings file. Defaults to ./weeklows.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the analysis as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn init_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<AnalysisError>()
                .map(AnalysisError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.config.as_deref())?;

    let window = match cli.window {
        Some(w) if w < 1 => {
            return Err(AnalysisError::InvalidArgument(format!(
                "--window must be at least 1, got {w}"
            ))
            .into())
        }
        Some(w) => w as usize,
        None => settings.window,
    };

    let origin = match &cli.data {
        Some(path) => SourceSpec::File(path.clone()),
        None => SourceSpec::Live(FetchRequest::hourly(
            cli.days.unwrap_or(settings.lookback_days),
            settings.auto_adjust && !cli.no_auto_adjust,
        )),
    };

    // A client that cannot be built is just another reason to fall back.
    let provider = match &origin {
        SourceSpec::Live(_) => match YahooProvider::new(&settings.provider) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(error = %e, "live provider unavailable");
                None
            }
        },
        SourceSpec::File(_) => None,
    };
    let provider_ref = provider.as_ref().map(|p| p as &dyn DataProvider);

    let loaded = load_bars(
        &cli.symbol,
        &origin,
        provider_ref,
        settings.sample_data.as_deref(),
    )?;

    if let Some(notice) = loaded.fallback_notice(&cli.symbol) {
        eprintln!("{notice}");
    }

    let opts = AnalysisOptions {
        target: cli.week,
        window,
        top: DEFAULT_TOP,
        as_of: None,
    };
    let analysis = analyze(&cli.symbol, &loaded.bars, &opts)?;

    let output = if cli.json {
        let mut json = to_json(&analysis).context("failed to serialize analysis")?;
        json.push('\n');
        json
    } else {
        render_text(&analysis)
    };
    print!("{output}");

    Ok(())
}
