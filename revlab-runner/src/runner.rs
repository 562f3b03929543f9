//! Backtest runner — wires together data loading, the simulator, and metrics.
//!
//! Two entry points:
//! - `run_single_backtest()`: loads data via the cache/provider ladder, then
//!   runs. Used by the CLI.
//! - `run_backtest_from_data()`: takes pre-loaded prices — no I/O. Used by
//!   sweeps and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use revlab_core::data::{CsvCache, DataProvider, DataSource};
use revlab_core::domain::{EquityPoint, PricePoint, Trade};
use revlab_core::engine::{simulate, SimError, StrategyParams};

use crate::config::{BacktestConfig, ConfigError};
use crate::data_loader::{load_prices, LoadError, LoadOptions};
use crate::metrics::PerformanceMetrics;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("simulation error: {0}")]
    Sim(#[from] SimError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub params: StrategyParams,
    pub metrics: PerformanceMetrics,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run a single backtest from a BacktestConfig (loads data through the cache).
///
/// This is the high-level entry point used by the CLI. For pre-loaded data,
/// use `run_backtest_from_data()` instead.
pub fn run_single_backtest(
    config: &BacktestConfig,
    cache: &CsvCache,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let loaded = load_prices(&config.backtest.symbol, cache, provider, opts)?;

    let mut result = run_backtest_from_data(
        &config.backtest.symbol,
        &loaded.points,
        &config.strategy_params(),
    )?;
    result.dataset_hash = loaded.dataset_hash;
    result.has_synthetic = loaded.has_synthetic || loaded.source == DataSource::Synthetic;
    Ok(result)
}

/// Run a backtest over pre-loaded prices — pure computation, no I/O.
pub fn run_backtest_from_data(
    symbol: &str,
    prices: &[PricePoint],
    params: &StrategyParams,
) -> Result<BacktestResult, RunError> {
    let sim = simulate(prices, params)?;
    let metrics = PerformanceMetrics::compute(&sim.equity, &sim.trades, params.initial_capital);

    let start_date = prices.first().map(|p| p.date.to_string()).unwrap_or_default();
    let end_date = prices.last().map(|p| p.date.to_string()).unwrap_or_default();

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        symbol: symbol.to_string(),
        start_date,
        end_date,
        params: *params,
        metrics,
        trades: sim.trades,
        equity_curve: sim.equity,
        dataset_hash: String::new(),
        has_synthetic: false,
    })
}
