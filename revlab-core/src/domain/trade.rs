//! Trade — an immutable fill record emitted by the simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which side of the market a fill was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Uppercase label for exports and tabular display.
    pub fn label(&self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

/// A single executed fill.
///
/// `value` is the cash amount after transaction cost: the cost debited for a
/// BUY, the proceeds credited for a SELL. The trade log is append-only and
/// alternates BUY/SELL — the strategy holds at most one open lot at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    /// Fill price, strictly positive.
    pub price: f64,
    /// Post-fee cash amount for this fill.
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> Trade {
        Trade {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            side: TradeSide::Buy,
            price: 97.0,
            value: 970.0,
        }
    }

    #[test]
    fn side_labels() {
        assert_eq!(TradeSide::Buy.label(), "BUY");
        assert_eq!(TradeSide::Sell.label(), "SELL");
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
