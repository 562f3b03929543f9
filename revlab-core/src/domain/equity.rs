//! EquityPoint — per-day mark-to-market portfolio value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Single point in the equity curve: `cash + shares_held * close_of_day`.
///
/// The simulator emits exactly one point per input price point, in the same
/// order, with no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

impl EquityPoint {
    pub fn new(date: NaiveDate, equity: f64) -> Self {
        Self { date, equity }
    }
}

/// Extract the bare equity values from a curve (metric functions take `&[f64]`).
pub fn equity_values(curve: &[EquityPoint]) -> Vec<f64> {
    curve.iter().map(|p| p.equity).collect()
}
