//! Day-by-day simulation loop — the heart of the backtester.
//!
//! One forward pass over the price series, three outcomes per day:
//! buy, sell, or nothing (at most one action — the buy condition requires a
//! flat position, the sell condition a held one). Every day emits a
//! mark-to-market equity point whether or not an action fired.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{EquityPoint, Position, PricePoint, Trade, TradeSide};

use super::params::StrategyParams;

/// Errors from the simulator.
#[derive(Debug, Clone, Error)]
pub enum SimError {
    #[error("no price data — cannot simulate an empty series")]
    NoData,

    #[error("invalid strategy parameters: {0}")]
    InvalidParams(String),

    #[error("non-positive or non-finite close {close} on {date}")]
    NonPositivePrice { date: NaiveDate, close: f64 },

    #[error("price series not strictly ascending by date: {prev} then {next}")]
    OutOfOrderDates { prev: NaiveDate, next: NaiveDate },
}

/// Output of one simulation pass: the equity trajectory and the trade log.
///
/// `equity` has exactly one point per input price point. `trades` alternates
/// BUY/SELL; a trailing BUY with no SELL means the run ended with an open lot
/// (there is no forced liquidation), so realized trade accounting and final
/// equity can legitimately diverge.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub equity: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
}

/// Run the mean-reversion strategy over an ordered daily close series.
///
/// Pure function of its inputs: no clock, no RNG, no I/O. The only date used
/// is the one carried by each price point, so identical inputs produce
/// identical outputs.
pub fn simulate(prices: &[PricePoint], params: &StrategyParams) -> Result<Simulation, SimError> {
    params.validate()?;
    if prices.is_empty() {
        return Err(SimError::NoData);
    }
    validate_series(prices)?;

    let mut position = Position::flat(params.initial_capital);
    let mut equity = Vec::with_capacity(prices.len());
    let mut trades = Vec::new();
    let mut prev_close: Option<f64> = None;

    for point in prices {
        let price = point.close;

        if position.is_flat() {
            // Entry is only evaluated once a previous close exists, so the
            // first day never trades.
            if let Some(prev) = prev_close {
                if price <= prev * (1.0 - params.buy_threshold) {
                    let unit_cost = price * (1.0 + params.fee_rate);
                    let mut shares = (position.cash / unit_cost).floor() as u64;
                    let mut cost = shares as f64 * unit_cost;
                    // Above 2^53 the rounded product can exceed the cash the
                    // division sized against; step down until the debit fits.
                    while shares >= 1 && cost > position.cash {
                        shares -= 1;
                        cost = shares as f64 * unit_cost;
                    }
                    // shares == 0 means insufficient cash: a silent no-op,
                    // not an error.
                    if shares >= 1 {
                        position.open(shares, price, cost);
                        trades.push(Trade {
                            date: point.date,
                            side: TradeSide::Buy,
                            price,
                            value: cost,
                        });
                    }
                }
            }
        } else if price >= position.entry_price * (1.0 + params.sell_threshold) {
            let revenue = position.shares_held as f64 * price * (1.0 - params.fee_rate);
            position.close(revenue);
            trades.push(Trade {
                date: point.date,
                side: TradeSide::Sell,
                price,
                value: revenue,
            });
        }

        equity.push(EquityPoint::new(point.date, position.equity(price)));
        prev_close = Some(price);
    }

    Ok(Simulation { equity, trades })
}

/// Reject malformed input instead of propagating garbage equity values:
/// every close must be sane and dates strictly ascending (duplicates count
/// as out of order).
fn validate_series(prices: &[PricePoint]) -> Result<(), SimError> {
    for pair in prices.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(SimError::OutOfOrderDates {
                prev: pair[0].date,
                next: pair[1].date,
            });
        }
    }
    for point in prices {
        if !point.is_sane() {
            return Err(SimError::NonPositivePrice {
                date: point.date,
                close: point.close,
            });
        }
    }
    Ok(())
}
