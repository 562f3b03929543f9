//! PricePoint — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day's observed close for a single symbol.
///
/// Points arrive as a sequence ascending by date with no duplicates; the
/// previous close for day `i` is the close of day `i-1`, and day 0 has no
/// previous close. `simulate` rejects sequences that break this contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Basic sanity check: close must be finite and strictly positive.
    pub fn is_sane(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
