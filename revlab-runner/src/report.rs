//! Plain-text run summaries.
//!
//! Formatting is presentation-only: percentages and money are rounded to two
//! decimals here, while the CSV/JSON artifacts keep full precision.

use crate::runner::BacktestResult;

/// Render a human-readable summary of a completed run.
pub fn render_summary(result: &BacktestResult) -> String {
    let m = &result.metrics;
    let mut out = String::new();

    out.push_str(&format!("=== Backtest summary: {} ===\n", result.symbol));
    out.push_str(&format!(
        "Period:            {} to {}\n",
        result.start_date, result.end_date
    ));
    out.push_str(&format!(
        "Parameters:        buy {:.2}% / sell {:.2}% / fee {:.3}%\n",
        result.params.buy_threshold * 100.0,
        result.params.sell_threshold * 100.0,
        result.params.fee_rate * 100.0,
    ));
    out.push_str(&format!(
        "Initial capital:   {:.2}\n",
        result.params.initial_capital
    ));
    if let Some(last) = result.equity_curve.last() {
        out.push_str(&format!("Final equity:      {:.2}\n", last.equity));
    }
    out.push_str(&format!("Total return:      {:.2}%\n", m.total_return * 100.0));
    out.push_str(&format!("Sharpe ratio:      {:.2}\n", m.sharpe));
    out.push_str(&format!("Max drawdown:      {:.2}%\n", m.max_drawdown * 100.0));
    out.push_str(&format!("Final/initial:     {:.2}\n", m.equity_final_ratio));
    out.push_str(&format!("Trades:            {}\n", m.trade_count));
    if result.has_synthetic {
        out.push_str("NOTE: run used synthetic data, results are not market-derived\n");
    }
    out
}

/// Render the trade log as an aligned table. Empty string when no trades.
pub fn render_trade_table(result: &BacktestResult) -> String {
    if result.trades.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<5} {:>12} {:>14}\n",
        "Date", "Side", "Price", "Value"
    ));
    for t in &result.trades {
        out.push_str(&format!(
            "{:<12} {:<5} {:>12.2} {:>14.2}\n",
            t.date.to_string(),
            t.side.label(),
            t.price,
            t.value,
        ));
    }
    out
}
