//! Position — the simulator's loop-local accounting state.

use serde::{Deserialize, Serialize};

/// Position tracking for a single simulation pass.
///
/// Exactly one instance lives inside each `simulate` call; nothing outside
/// the loop mutates it. `entry_price` is meaningful only while
/// `shares_held > 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub shares_held: u64,
    pub entry_price: f64,
    pub cash: f64,
}

impl Position {
    /// Flat position holding only the starting capital.
    pub fn flat(initial_capital: f64) -> Self {
        Self {
            shares_held: 0,
            entry_price: 0.0,
            cash: initial_capital,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares_held == 0
    }

    /// Mark-to-market value at the given close.
    pub fn equity(&self, close: f64) -> f64 {
        self.cash + self.shares_held as f64 * close
    }

    /// Open a lot: debit the post-fee cost and record the entry.
    pub fn open(&mut self, shares: u64, price: f64, cost: f64) {
        debug_assert!(self.is_flat());
        self.cash -= cost;
        self.shares_held = shares;
        self.entry_price = price;
    }

    /// Close the open lot: credit the post-fee proceeds and go flat.
    pub fn close(&mut self, revenue: f64) {
        debug_assert!(!self.is_flat());
        self.cash += revenue;
        self.shares_held = 0;
        self.entry_price = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_position_equity_is_cash() {
        let pos = Position::flat(10_000.0);
        assert!(pos.is_flat());
        assert_eq!(pos.equity(123.45), 10_000.0);
    }

    #[test]
    fn open_then_close_roundtrip() {
        let mut pos = Position::flat(1_000.0);
        pos.open(10, 97.0, 970.0);
        assert!(!pos.is_flat());
        assert_eq!(pos.shares_held, 10);
        assert_eq!(pos.entry_price, 97.0);
        assert!((pos.cash - 30.0).abs() < 1e-12);
        assert!((pos.equity(97.0) - 1_000.0).abs() < 1e-12);

        pos.close(1_030.0);
        assert!(pos.is_flat());
        assert!((pos.cash - 1_060.0).abs() < 1e-12);
    }
}
