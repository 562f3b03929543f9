//! Domain types for RevLab.

pub mod equity;
pub mod position;
pub mod price;
pub mod trade;

pub use equity::{equity_values, EquityPoint};
pub use position::Position;
pub use price::PricePoint;
pub use trade::{Trade, TradeSide};

/// Symbol type alias
pub type Symbol = String;
