//! TrendCast CLI: analyze price series, write reports, generate sample data.
//!
//! Commands:
//! - `analyze`: run the pipeline on a CSV file or symbols and print a summary
//! - `report`: run the pipeline and write CSV/JSON artifacts to a directory
//! - `synthetic`: write a seeded sample price CSV

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use trendcast_core::{PipelineConfig, TimeWindow, ToTable, TrendConfig};
use trendcast_runner::{
    analyze_batch, analyze_symbols, export_analysis, load_csv, normalize_symbol,
    sample_quote, write_table_csv, BatchItem, FallbackSource, LiveSource, PriceSource, SampleQuote,
    SourceCache, SyntheticSource,
};

#[derive(Parser)]
#[command(
    name = "trendcast",
    about = "TrendCast CLI: trend regimes, metrics and linear forecasts for daily closes"
)]
struct Cli {
    /// Debug-level logging (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and print metrics, latest regime and forecast.
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Print the full analysis as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run the pipeline and write trend, forecast and summary CSVs plus analysis.json.
    Report {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output directory. One subdirectory per symbol when several are given.
        #[arg(long)]
        out: PathBuf,
    },
    /// Write a seeded synthetic price CSV (Date, Close, Volume).
    Synthetic {
        /// Symbol whose sample quote sets the base price.
        #[arg(long)]
        symbol: String,

        /// Number of daily rows.
        #[arg(long, default_value_t = SyntheticSource::DEFAULT_DAYS)]
        days: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Last date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["csv", "symbol"])))]
struct InputArgs {
    /// CSV file with Date and Close columns (Volume optional).
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Symbols to fetch (repeatable). Bare symbols get the .NS suffix.
    #[arg(long)]
    symbol: Vec<String>,

    /// Fall back to synthetic sample data when the live fetch fails.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Offline mode: serve symbols from synthetic data only.
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args)]
struct PipelineArgs {
    /// TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Time window: 1M, 6M, 1Y or Max.
    #[arg(long)]
    window: Option<TimeWindow>,

    /// Short moving-average window in rows.
    #[arg(long)]
    short: Option<usize>,

    /// Long moving-average window in rows.
    #[arg(long)]
    long: Option<usize>,

    /// Forecast horizon in days.
    #[arg(long)]
    horizon: Option<NonZeroUsize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Analyze {
            input,
            pipeline,
            json,
        } => run_analyze(&input, &pipeline, json),
        Commands::Report {
            input,
            pipeline,
            out,
        } => run_report(&input, &pipeline, &out),
        Commands::Synthetic {
            symbol,
            days,
            seed,
            end,
            out,
        } => run_synthetic(&symbol, days, seed, end.as_deref(), &out),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(window) = args.window {
        config.window = window;
    }
    if args.short.is_some() || args.long.is_some() {
        let short = args.short.unwrap_or(config.trend.short_window.get());
        let long = args.long.unwrap_or(config.trend.long_window.get());
        config.trend = TrendConfig::new(short, long)?.with_tie_policy(config.trend.tie_policy);
    }
    if let Some(horizon) = args.horizon {
        config.forecast.horizon_days = horizon;
    }

    tracing::debug!(?config, "pipeline config");
    Ok(config)
}

fn build_source(input: &InputArgs) -> Result<Box<dyn PriceSource>> {
    let synthetic = SyntheticSource::new(input.seed);
    if input.offline {
        return Ok(Box::new(synthetic));
    }
    let live = LiveSource::new().context("failed to set up live source")?;
    if input.synthetic {
        Ok(Box::new(FallbackSource::new(Box::new(live), Box::new(synthetic))))
    } else {
        Ok(Box::new(live))
    }
}

/// Load every requested input and analyze it. Symbols that fail to load are
/// logged and skipped; it is an error if nothing loads.
fn collect_analyses(input: &InputArgs, config: &PipelineConfig) -> Result<Vec<BatchItem>> {
    if let Some(path) = &input.csv {
        let series =
            load_csv(path).with_context(|| format!("failed to load {}", path.display()))?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "series".to_string());
        return Ok(analyze_batch(vec![(label, series)], config));
    }

    let source = build_source(input)?;
    let cache = SourceCache::default();
    let mut items = Vec::with_capacity(input.symbol.len());
    for (symbol, result) in analyze_symbols(&input.symbol, source.as_ref(), &cache, config) {
        match result {
            Ok(item) => items.push(item),
            Err(e) => tracing::error!(symbol = %symbol, error = %e, "skipping symbol"),
        }
    }
    if items.is_empty() {
        bail!("no input could be loaded (use --synthetic to fall back to sample data)");
    }
    Ok(items)
}

fn run_analyze(input: &InputArgs, pipeline: &PipelineArgs, json: bool) -> Result<()> {
    let config = build_config(pipeline)?;
    let items = collect_analyses(input, &config)?;

    if json {
        let summaries: Vec<_> = items.iter().map(BatchItem::summary).collect();
        let out = if summaries.len() == 1 {
            serde_json::to_string_pretty(&summaries[0])?
        } else {
            serde_json::to_string_pretty(&summaries)?
        };
        println!("{out}");
        return Ok(());
    }

    for item in &items {
        print_summary(item);
    }
    Ok(())
}

fn print_summary(item: &BatchItem) {
    let analysis = &item.analysis;
    let latest = analysis.trend.latest();

    println!();
    match item.kind {
        Some(kind) if kind.is_synthetic() => println!("=== {} (synthetic data) ===", item.label),
        _ => println!("=== {} ===", item.label),
    }
    println!(
        "Window: {} ({} rows, {} to {})",
        analysis.window,
        analysis.filtered.len(),
        analysis.filtered.first().date,
        analysis.filtered.last().date
    );
    println!("{}", analysis.metrics);
    println!(
        "Trend: {} (short MA {}, long MA {})",
        latest.regime,
        format_ma(latest.short_ma),
        format_ma(latest.long_ma)
    );
    match &analysis.forecast {
        Ok(forecast) => {
            if let (Some(first), Some(last)) = (forecast.first(), forecast.last()) {
                println!(
                    "Forecast: {} days, {} {:.2} -> {} {:.2} (slope {:.4}/day)",
                    forecast.len(),
                    first.date,
                    first.predicted_close,
                    last.date,
                    last.predicted_close,
                    forecast.trend.slope
                );
            }
        }
        Err(e) => println!("Forecast: unavailable ({e})"),
    }
}

fn format_ma(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn run_report(input: &InputArgs, pipeline: &PipelineArgs, out: &Path) -> Result<()> {
    let config = build_config(pipeline)?;
    let items = collect_analyses(input, &config)?;
    let nested = items.len() > 1;

    for item in &items {
        let dir = if nested {
            out.join(&item.label)
        } else {
            out.to_path_buf()
        };
        let written = export_analysis(&item.label, &item.analysis, &dir)
            .with_context(|| format!("failed to write report for {}", item.label))?;
        println!("{}: {} files written to {}", item.label, written.len(), dir.display());
    }
    Ok(())
}

fn run_synthetic(
    symbol: &str,
    days: usize,
    seed: u64,
    end: Option<&str>,
    out: &Path,
) -> Result<()> {
    let end_date = end
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --end date")?
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let symbol = normalize_symbol(symbol);
    let series = SyntheticSource::new(seed)
        .with_days(days)
        .with_end(end_date)
        .generate(&symbol)
        .with_context(|| format!("failed to generate {days} rows for {symbol}"))?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_table_csv(&series.to_table(), out)
        .with_context(|| format!("failed to write {}", out.display()))?;

    println!(
        "Wrote {} rows for {symbol} ({} to {}) to {}",
        series.len(),
        series.first().date,
        series.last().date,
        out.display()
    );
    println!("{}", describe_quote(sample_quote(&symbol)));
    Ok(())
}

fn describe_quote(quote: &SampleQuote) -> String {
    format!(
        "Reference quote {}: {:.2} (52w high {:.2}, low {:.2})",
        quote.symbol, quote.price, quote.high_52w, quote.low_52w
    )
}
