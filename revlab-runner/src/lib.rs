//! RevLab Runner — backtest orchestration, metrics, exports.
//!
//! This crate builds on `revlab-core` to provide:
//! - Data loading with cache/download/synthetic fallback
//! - Single-backtest runner producing trades, equity curve, and metrics
//! - Performance metrics (total return, Sharpe, drawdowns)
//! - JSON/CSV result export and artifact bundles
//! - Parallel parameter-grid sweeps
//! - Plain-text run summaries

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod sweep;

pub use config::{BacktestConfig, ConfigError};
pub use data_loader::{load_prices, LoadError, LoadOptions, LoadedPrices};
pub use export::{
    export_drawdown_csv, export_equity_csv, export_json, export_trades_csv, import_json,
    load_artifacts, save_artifacts,
};
pub use metrics::PerformanceMetrics;
pub use report::{render_summary, render_trade_table};
pub use runner::{run_backtest_from_data, run_single_backtest, BacktestResult, RunError};
pub use sweep::{run_sweep, ParamGrid};
