//! Volbreak CLI: volume/price breakout analysis for a single ticker.
//!
//! Commands:
//! - `analyze`: detect breakout days, measure forward returns, print the
//!   table and write the report, series and manifest artifacts
//! - `series`: write only the indicator-augmented series CSV (for charting)

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_appender::non_blocking;
use tracing_subscriber::{prelude::*, EnvFilter};

use volbreak_core::data::{CircuitBreaker, DataProvider, YahooProvider};
use volbreak_core::report::{format_optional, format_price, format_volume, render_text};
use volbreak_core::{ColumnSet, MissPolicy};
use volbreak_runner::{
    run_analysis, save_artifacts, save_series_csv, AnalysisConfig, AnalysisRun, LoadOptions,
};

#[derive(Parser)]
#[command(
    name = "volbreak",
    about = "Volbreak: volume/price breakout detection and forward-return analysis"
)]
struct Cli {
    /// Append logs to this file as well as stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find breakout days and their forward returns.
    Analyze {
        #[command(flatten)]
        run: RunArgs,

        /// Export holding dates and every indicator column in the report CSV.
        #[arg(long, default_value_t = false)]
        with_indicators: bool,
    },
    /// Write only the indicator-augmented series CSV.
    Series {
        #[command(flatten)]
        run: RunArgs,
    },
}

/// Options shared by every command.
#[derive(Args)]
struct RunArgs {
    /// Ticker symbol (e.g., AAPL).
    #[arg(long)]
    ticker: Option<String>,

    /// Start date (YYYY-MM-DD). Defaults to one year before the end date.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Path to a TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Volume breakout threshold in percent of the average volume.
    #[arg(long)]
    volume_threshold: Option<f64>,

    /// Daily price change threshold in percent.
    #[arg(long)]
    price_change_threshold: Option<f64>,

    /// Holding period in calendar days.
    #[arg(long)]
    holding_period: Option<u32>,

    /// Holding-period miss policy: exact, next_trading_day, previous_trading_day.
    #[arg(long)]
    miss_policy: Option<MissPolicy>,

    /// Read bars from a local CSV instead of Yahoo Finance.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Offline mode: no network access.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Use synthetic data as fallback.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Output directory for CSV and manifest files.
    #[arg(long, default_value = "reports")]
    output_dir: PathBuf,
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| anyhow!("failed to create log directory {parent:?}: {err}"))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| anyhow!("failed to open log file {path:?}: {err}"))?;
        let (writer, guard) = non_blocking(file);
        // The writer must outlive main.
        let _guard = Box::leak(Box::new(guard));
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing: {err}"))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .map_err(|err| anyhow!("failed to initialize tracing: {err}"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Analyze {
            run,
            with_indicators,
        } => run_analyze_cmd(run, with_indicators),
        Commands::Series { run } => run_series_cmd(run),
    }
}

/// Merge the config file (if any) with command-line overrides.
fn build_config(args: &RunArgs) -> Result<AnalysisConfig> {
    let mut config = if let Some(path) = &args.config {
        AnalysisConfig::from_file(path)?
    } else {
        let Some(ticker) = args.ticker.as_deref() else {
            bail!("please enter a valid ticker symbol (--ticker or --config)");
        };
        let end = args.end.unwrap_or_else(|| chrono::Local::now().date_naive());
        let start = args
            .start
            .unwrap_or_else(|| end - chrono::Duration::days(365));
        AnalysisConfig::new(ticker, start, end)
    };

    if let Some(ticker) = &args.ticker {
        config.analysis.ticker = ticker.clone();
    }
    if let Some(start) = args.start {
        config.analysis.start_date = start;
    }
    if let Some(end) = args.end {
        config.analysis.end_date = end;
    }
    let t = &mut config.thresholds;
    if let Some(v) = args.volume_threshold {
        t.volume_threshold_pct = v;
    }
    if let Some(v) = args.price_change_threshold {
        t.price_change_threshold_pct = v;
    }
    if let Some(v) = args.holding_period {
        t.holding_period_days = v;
    }
    if let Some(v) = args.miss_policy {
        t.miss_policy = v;
    }

    config.normalize();
    config.validate()?;
    Ok(config)
}

fn execute(args: &RunArgs) -> Result<AnalysisRun> {
    let config = build_config(args)?;
    let opts: LoadOptions = config.load_options(args.offline, args.synthetic, args.input.clone());

    let provider = if args.offline || args.input.is_some() {
        None
    } else {
        let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
        Some(YahooProvider::new(circuit_breaker)?)
    };
    let provider_ref = provider.as_ref().map(|p| p as &dyn DataProvider);

    run_analysis(&config, provider_ref, &opts)
        .with_context(|| format!("analysis failed for {}", config.ticker()))
}

fn run_analyze_cmd(args: RunArgs, with_indicators: bool) -> Result<()> {
    let run = execute(&args)?;

    print_series_overview(&run);
    println!("=== Breakout Days ===");
    if run.report.is_empty() {
        println!("No breakout days found with the given thresholds.");
    } else {
        print!("{}", render_text(&run.report));
    }
    print_summary(&run);

    let columns = if with_indicators {
        ColumnSet::WithIndicators
    } else {
        ColumnSet::Basic
    };
    let paths = save_artifacts(&run, &args.output_dir, columns)?;
    println!("Report saved to:   {}", paths.report_csv.display());
    println!("Series saved to:   {}", paths.series_csv.display());
    println!("Manifest saved to: {}", paths.manifest.display());
    Ok(())
}

fn run_series_cmd(args: RunArgs) -> Result<()> {
    let run = execute(&args)?;
    print_series_overview(&run);
    let path = save_series_csv(&run, &args.output_dir)?;
    println!("Series saved to: {}", path.display());
    Ok(())
}

fn print_series_overview(run: &AnalysisRun) {
    let series = &run.analysis.series;
    let bars = series.bars();
    println!();
    println!("=== Data for {} ===", series.symbol());
    println!("Source:         {}", run.source.as_str());
    match (series.first_date(), series.last_date()) {
        (Some(first), Some(last)) => println!("Period:         {first} to {last}"),
        _ => println!("Period:         (no bars)"),
    }
    println!(
        "Bars:           {} ({} warmup)",
        series.len(),
        run.analysis.warmup_bars.min(series.len())
    );
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        let high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        println!("First Close:    {}", format_price(first.close));
        println!("Last Close:     {}", format_price(last.close));
        println!("Range:          {} to {}", format_price(low), format_price(high));
        let total: f64 = bars.iter().map(|b| b.volume as f64).sum();
        println!("Avg Volume:     {}", format_volume(total / bars.len() as f64));
    }
    let dropped = run.canonicalize.dropped();
    if dropped > 0 {
        println!("Dropped Rows:   {dropped}");
    }
    println!();
}

fn print_summary(run: &AnalysisRun) {
    let s = &run.summary;
    let pct = |v: Option<f64>| {
        let text = format_optional(v, format_price);
        if text.is_empty() {
            "n/a".to_string()
        } else {
            format!("{text}%")
        }
    };

    println!();
    println!("--- Summary ---");
    println!("Holding Period: {} days", run.report.holding_period_days);
    println!("Breakouts:      {}", s.breakout_count);
    println!("Measured:       {}", s.measured_count);
    println!("Mean Return:    {}", pct(s.mean_return_pct));
    println!("Best Return:    {}", pct(s.best_return_pct));
    println!("Worst Return:   {}", pct(s.worst_return_pct));
    println!("Positive Share: {}", pct(s.positive_share.map(|p| p * 100.0)));
    if run.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn run_args(cli: Cli) -> RunArgs {
        match cli.command {
            Commands::Analyze { run, .. } | Commands::Series { run } => run,
        }
    }

    #[test]
    fn flags_build_config() {
        let cli = parse(&[
            "volbreak",
            "analyze",
            "--ticker",
            "msft",
            "--start",
            "2023-01-01",
            "--end",
            "2023-12-31",
            "--holding-period",
            "5",
            "--miss-policy",
            "next",
        ]);
        let cfg = build_config(&run_args(cli)).unwrap();
        assert_eq!(cfg.ticker(), "MSFT");
        assert_eq!(cfg.thresholds.holding_period_days, 5);
        assert_eq!(cfg.thresholds.miss_policy, MissPolicy::NextTradingDay);
        assert_eq!(cfg.thresholds.volume_threshold_pct, 200.0);
    }

    #[test]
    fn missing_ticker_is_an_error() {
        let cli = parse(&["volbreak", "series", "--offline", "--synthetic"]);
        let err = build_config(&run_args(cli)).unwrap_err();
        assert!(err.to_string().contains("valid ticker"));
    }

    #[test]
    fn invalid_threshold_is_an_error() {
        let cli = parse(&[
            "volbreak",
            "analyze",
            "--ticker",
            "SPY",
            "--volume-threshold=-5",
        ]);
        assert!(build_config(&run_args(cli)).is_err());
    }

    #[test]
    fn unknown_miss_policy_is_rejected_by_parser() {
        assert!(Cli::try_parse_from([
            "volbreak",
            "analyze",
            "--ticker",
            "SPY",
            "--miss-policy",
            "nearest"
        ])
        .is_err());
    }

    #[test]
    fn log_file_is_global() {
        let cli = parse(&["volbreak", "series", "--ticker", "SPY", "--log-file", "run.log"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
    }
}
