//! Parameter sweep utilities.
//!
//! Runs one simulation per grid cell in parallel. Each call owns its own
//! `Position` state and output buffers; the price slice is shared read-only,
//! so no locking is involved. The sweep only evaluates — ranking or searching
//! over the results is the caller's concern.

use rayon::prelude::*;

use revlab_core::domain::PricePoint;
use revlab_core::engine::StrategyParams;

use crate::runner::{run_backtest_from_data, BacktestResult, RunError};

/// Parameter grid specification.
///
/// Defines the threshold/fee values to sweep over; every combination is run
/// with the same initial capital.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub buy_thresholds: Vec<f64>,
    pub sell_thresholds: Vec<f64>,
    pub fee_rates: Vec<f64>,
    pub initial_capital: f64,
}

impl ParamGrid {
    /// Default sweep ranges: buy 0.5%–5%, sell 0.5%–10%, both in 0.1%
    /// steps, at the default fee and capital.
    pub fn default_ranges() -> Self {
        Self {
            buy_thresholds: percent_steps(0.5, 5.0),
            sell_thresholds: percent_steps(0.5, 10.0),
            fee_rates: vec![0.001],
            initial_capital: 10_000.0,
        }
    }

    /// Returns the total number of configurations in this grid.
    pub fn size(&self) -> usize {
        self.buy_thresholds.len() * self.sell_thresholds.len() * self.fee_rates.len()
    }

    /// Generates all parameter sets in the grid.
    pub fn generate_params(&self) -> Vec<StrategyParams> {
        let mut params = Vec::with_capacity(self.size());
        for &buy in &self.buy_thresholds {
            for &sell in &self.sell_thresholds {
                for &fee in &self.fee_rates {
                    params.push(StrategyParams::new(buy, sell, fee, self.initial_capital));
                }
            }
        }
        params
    }
}

/// 0.1%-step inclusive range, expressed as fractions.
fn percent_steps(from_pct: f64, to_pct: f64) -> Vec<f64> {
    let steps = ((to_pct - from_pct) / 0.1).round() as usize;
    (0..=steps).map(|i| (from_pct + i as f64 * 0.1) / 100.0).collect()
}

/// Run every grid cell over the same price series, in parallel.
///
/// Results come back in grid order (buy-major, then sell, then fee),
/// regardless of worker scheduling.
pub fn run_sweep(
    symbol: &str,
    prices: &[PricePoint],
    grid: &ParamGrid,
) -> Vec<Result<BacktestResult, RunError>> {
    grid.generate_params()
        .into_par_iter()
        .map(|params| run_backtest_from_data(symbol, prices, &params))
        .collect()
}
