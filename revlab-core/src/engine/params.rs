//! Strategy parameters for a single simulation run.

use serde::{Deserialize, Serialize};

use super::simulator::SimError;

/// Parameters of one mean-reversion run.
///
/// All fractions, not percents: a 1.5% buy threshold is `0.015`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Entry: buy when the close drops to `prev_close * (1 - buy_threshold)`
    /// or below. Must be in (0, 1].
    pub buy_threshold: f64,
    /// Exit: sell when the close reaches `entry_price * (1 + sell_threshold)`
    /// or above. Must be in (0, 1].
    pub sell_threshold: f64,
    /// Multiplicative transaction cost applied on both legs. Must be in [0, 1).
    pub fee_rate: f64,
    /// Starting cash. Must be strictly positive.
    pub initial_capital: f64,
}

impl StrategyParams {
    pub fn new(
        buy_threshold: f64,
        sell_threshold: f64,
        fee_rate: f64,
        initial_capital: f64,
    ) -> Self {
        Self {
            buy_threshold,
            sell_threshold,
            fee_rate,
            initial_capital,
        }
    }

    /// Check the simulator's preconditions.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.buy_threshold > 0.0 && self.buy_threshold <= 1.0) {
            return Err(SimError::InvalidParams(format!(
                "buy_threshold must be in (0, 1], got {}",
                self.buy_threshold
            )));
        }
        if !(self.sell_threshold > 0.0 && self.sell_threshold <= 1.0) {
            return Err(SimError::InvalidParams(format!(
                "sell_threshold must be in (0, 1], got {}",
                self.sell_threshold
            )));
        }
        if !(self.fee_rate >= 0.0 && self.fee_rate < 1.0) {
            return Err(SimError::InvalidParams(format!(
                "fee_rate must be in [0, 1), got {}",
                self.fee_rate
            )));
        }
        if !(self.initial_capital > 0.0 && self.initial_capital.is_finite()) {
            return Err(SimError::InvalidParams(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        Ok(())
    }
}

impl Default for StrategyParams {
    /// Defaults: 1.5% entry, 3% exit, 0.1% fee, 10 000 capital.
    fn default() -> Self {
        Self::new(0.015, 0.03, 0.001, 10_000.0)
    }
}
