//! RevLab CLI — download, run, and cache management commands.
//!
//! Commands:
//! - `download` — fetch daily closes from Yahoo Finance and cache as CSV
//! - `run` — execute a mean-reversion backtest from a TOML config or flags
//! - `cache status` — list cached symbols with date ranges
//! - `cache remove` — drop one symbol from the cache

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use revlab_core::data::{CsvCache, DataProvider, YahooProvider};
use revlab_runner::{
    render_summary, render_trade_table, run_single_backtest, save_artifacts, BacktestConfig,
    LoadOptions,
};

#[derive(Parser)]
#[command(name = "revlab", about = "RevLab CLI — mean-reversion backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily closes from Yahoo Finance and cache as CSV.
    Download {
        /// Symbols to download (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 10 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Force re-download even if cached.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Execute a backtest from a TOML config file or inline flags.
    Run {
        /// Path to a TOML config file (mutually exclusive with --symbol).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbol to backtest (required without --config).
        #[arg(long)]
        symbol: Option<String>,

        /// Buy when the close drops this fraction below the previous close.
        #[arg(long, default_value_t = 0.015)]
        buy_threshold: f64,

        /// Sell when the close rises this fraction above the entry price.
        #[arg(long, default_value_t = 0.03)]
        sell_threshold: f64,

        /// Proportional fee per fill.
        #[arg(long, default_value_t = 0.001)]
        fee_rate: f64,

        /// Starting cash.
        #[arg(long, default_value_t = 10_000.0)]
        capital: f64,

        /// Start date (YYYY-MM-DD). Defaults to 5 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Use synthetic data as fallback.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached symbols with row counts and date ranges.
    Status {
        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Remove one symbol from the cache.
    Remove {
        symbol: String,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            symbols,
            start,
            end,
            force,
            cache_dir,
        } => run_download(symbols, start, end, force, cache_dir),
        Commands::Run {
            config,
            symbol,
            buy_threshold,
            sell_threshold,
            fee_rate,
            capital,
            start,
            end,
            offline,
            synthetic,
            cache_dir,
            output_dir,
        } => run_backtest_cmd(RunArgs {
            config,
            symbol,
            buy_threshold,
            sell_threshold,
            fee_rate,
            capital,
            start,
            end,
            offline,
            synthetic,
            cache_dir,
            output_dir,
        }),
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => run_cache_status(&cache_dir),
            CacheAction::Remove { symbol, cache_dir } => run_cache_remove(&symbol, &cache_dir),
        },
    }
}

fn parse_date_or(arg: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match arg {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD")),
        None => Ok(default),
    }
}

fn run_download(
    symbols: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    force: bool,
    cache_dir: PathBuf,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let start_date = parse_date_or(start.as_deref(), today - chrono::Duration::days(365 * 10))?;
    let end_date = parse_date_or(end.as_deref(), today)?;

    let provider = YahooProvider::new()?;
    let cache = CsvCache::new(cache_dir);

    let mut failures = 0usize;
    for symbol in &symbols {
        // Partial overlap is not enough: the cached range must span the
        // whole request, or the missing span would never be fetched.
        if !force && cache.covers(symbol, start_date, end_date) {
            println!("{symbol}: already cached, skipping (--force to re-download)");
            continue;
        }
        match provider.fetch(symbol, start_date, end_date) {
            Ok(fetched) => {
                cache.write(symbol, &fetched.points, provider.name())?;
                println!("{symbol}: cached {} closes", fetched.points.len());
            }
            Err(e) => {
                eprintln!("Error for {symbol}: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

struct RunArgs {
    config: Option<PathBuf>,
    symbol: Option<String>,
    buy_threshold: f64,
    sell_threshold: f64,
    fee_rate: f64,
    capital: f64,
    start: Option<String>,
    end: Option<String>,
    offline: bool,
    synthetic: bool,
    cache_dir: PathBuf,
    output_dir: PathBuf,
}

fn run_backtest_cmd(args: RunArgs) -> Result<()> {
    if args.config.is_some() && args.symbol.is_some() {
        bail!("--config and --symbol are mutually exclusive");
    }

    let backtest_config = if let Some(path) = &args.config {
        BacktestConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?
    } else {
        let Some(symbol) = args.symbol.clone() else {
            bail!("one of --config or --symbol is required");
        };
        build_inline_config(&symbol, &args)?
    };

    let opts = LoadOptions {
        start: backtest_config.backtest.start_date,
        end: backtest_config.backtest.end_date,
        offline: args.offline,
        synthetic: args.synthetic,
        force: false,
    };

    let cache = CsvCache::new(&args.cache_dir);
    let provider;
    let provider_ref: Option<&dyn DataProvider> = if args.offline {
        None
    } else {
        provider = YahooProvider::new()?;
        Some(&provider)
    };

    let result = run_single_backtest(&backtest_config, &cache, provider_ref, &opts)?;

    print!("{}", render_summary(&result));
    let table = render_trade_table(&result);
    if !table.is_empty() {
        println!("\n{table}");
    }

    let run_dir = save_artifacts(&result, &args.output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

/// Builds a config from flags through the same TOML path a file would take.
fn build_inline_config(symbol: &str, args: &RunArgs) -> Result<BacktestConfig> {
    let today = chrono::Local::now().date_naive();
    let start_date = parse_date_or(args.start.as_deref(), today - chrono::Duration::days(365 * 5))?;
    let end_date = parse_date_or(args.end.as_deref(), today)?;

    let toml_str = format!(
        r#"[backtest]
symbol = "{symbol}"
start_date = "{start_date}"
end_date = "{end_date}"
initial_capital = {capital:?}

[strategy]
buy_threshold = {buy:?}
sell_threshold = {sell:?}
fee_rate = {fee:?}
"#,
        capital = args.capital,
        buy = args.buy_threshold,
        sell = args.sell_threshold,
        fee = args.fee_rate,
    );

    Ok(BacktestConfig::from_toml_str(&toml_str)?)
}

fn run_cache_status(cache_dir: &Path) -> Result<()> {
    if !cache_dir.exists() {
        println!("Cache directory does not exist: {}", cache_dir.display());
        return Ok(());
    }

    let cache = CsvCache::new(cache_dir);
    let mut metas = cache.status()?;
    if metas.is_empty() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }
    metas.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    println!(
        "{:<10} {:>8} {:<12} {:<12} {:<14}",
        "Symbol", "Rows", "From", "To", "Source"
    );
    for meta in metas {
        println!(
            "{:<10} {:>8} {:<12} {:<12} {:<14}",
            meta.symbol,
            meta.row_count,
            meta.start_date.to_string(),
            meta.end_date.to_string(),
            meta.source
        );
    }
    Ok(())
}

fn run_cache_remove(symbol: &str, cache_dir: &Path) -> Result<()> {
    let cache = CsvCache::new(cache_dir);
    cache.remove(symbol)?;
    println!("Removed {symbol} from {}", cache_dir.display());
    Ok(())
}
