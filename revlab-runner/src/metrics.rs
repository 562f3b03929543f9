//! Performance metrics — pure functions that compute strategy statistics.
//!
//! Every metric is a pure function: equity curve and/or trade list in,
//! value out. No dependencies on the runner or the data pipeline.

use serde::{Deserialize, Serialize};

use revlab_core::domain::{equity_values, EquityPoint, Trade, TradeSide};

/// Trading days per year used for annualization.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
    /// Per-day underwater trajectory, same length and order as the equity
    /// curve; every value in [-1, 0].
    pub drawdown_series: Vec<f64>,
    /// Final equity over initial capital when at least one SELL occurred,
    /// else 0.0. NOT a profit factor; named for what it actually is rather
    /// than dressed up as a gross-wins/gross-losses computation.
    pub equity_final_ratio: f64,
    pub trade_count: usize,
}

impl PerformanceMetrics {
    /// Compute all metrics from an equity curve and trade list.
    pub fn compute(equity_curve: &[EquityPoint], trades: &[Trade], initial_capital: f64) -> Self {
        let values = equity_values(equity_curve);
        Self {
            total_return: total_return(&values, initial_capital),
            sharpe: sharpe_ratio(&values),
            max_drawdown: max_drawdown(&values),
            drawdown_series: drawdown_series(&values),
            equity_final_ratio: equity_final_ratio(&values, trades, initial_capital),
            trade_count: trades.len(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction of the starting capital.
pub fn total_return(equity_curve: &[f64], initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    match equity_curve.last() {
        Some(&final_eq) => final_eq / initial_capital - 1.0,
        None => 0.0,
    }
}

/// Annualized Sharpe ratio from daily returns.
///
/// Sharpe = mean(daily returns) / std(daily returns) * sqrt(252).
/// Returns 0.0 when there are no return samples or the variance is zero —
/// an explicit branch, never a division sentinel.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = daily_returns(equity_curve);
    if returns.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(&returns);
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean / std) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Per-day drawdown from the running peak: `(equity - peak) / peak`.
///
/// Same length and order as the input; every value is in [-1, 0].
pub fn drawdown_series(equity_curve: &[f64]) -> Vec<f64> {
    let mut peak = f64::MIN;
    equity_curve
        .iter()
        .map(|&eq| {
            if eq > peak {
                peak = eq;
            }
            if peak > 0.0 {
                (eq - peak) / peak
            } else {
                0.0
            }
        })
        .collect()
}

/// Maximum drawdown as a non-positive fraction (e.g., -0.15 = 15% drawdown).
///
/// Returns 0.0 if equity never dips below its running peak.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    drawdown_series(equity_curve)
        .into_iter()
        .fold(0.0, f64::min)
}

/// Final equity over initial capital when the log contains a SELL,
/// otherwise 0.0. A coarse stand-in for a per-trade profit factor.
pub fn equity_final_ratio(equity_curve: &[f64], trades: &[Trade], initial_capital: f64) -> f64 {
    let has_sell = trades.iter().any(|t| t.side == TradeSide::Sell);
    if !has_sell || initial_capital <= 0.0 {
        return 0.0;
    }
    match equity_curve.last() {
        Some(&final_eq) => final_eq / initial_capital,
        None => 0.0,
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Compute daily simple returns from an equity curve.
///
/// Empty when the curve has fewer than 2 points.
pub fn daily_returns(equity_curve: &[f64]) -> Vec<f64> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 {
                w[1] / w[0] - 1.0
            } else {
                0.0
            }
        })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n-1 denominator, matching pandas `.std()`).
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| EquityPoint::new(start + Days::new(i as u64), v))
            .collect()
    }

    fn round_trip_trades() -> Vec<Trade> {
        let d = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        vec![
            Trade {
                date: d,
                side: TradeSide::Buy,
                price: 97.0,
                value: 970.0,
            },
            Trade {
                date: d + Days::new(2),
                side: TradeSide::Sell,
                price: 103.0,
                value: 1_030.0,
            },
        ]
    }

    // ── Total return ──

    #[test]
    fn total_return_positive() {
        let eq = vec![1_000.0, 1_005.0, 1_060.0];
        assert!((total_return(&eq, 1_000.0) - 0.06).abs() < 1e-10);
    }

    #[test]
    fn total_return_negative() {
        let eq = vec![1_000.0, 950.0, 900.0];
        assert!((total_return(&eq, 1_000.0) - (-0.1)).abs() < 1e-10);
    }

    #[test]
    fn total_return_single_point() {
        assert_eq!(total_return(&[1_000.0], 1_000.0), 0.0);
    }

    #[test]
    fn total_return_empty() {
        assert_eq!(total_return(&[], 1_000.0), 0.0);
    }

    // ── Daily returns ──

    #[test]
    fn daily_returns_basic() {
        let eq = vec![100.0, 110.0, 105.0];
        let r = daily_returns(&eq);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-10);
        assert!((r[1] - (105.0 / 110.0 - 1.0)).abs() < 1e-10);
    }

    #[test]
    fn daily_returns_short_curves_are_empty() {
        assert!(daily_returns(&[]).is_empty());
        assert!(daily_returns(&[100.0]).is_empty());
    }

    // ── Sharpe ──

    #[test]
    fn sharpe_constant_equity_is_exactly_zero() {
        let eq = vec![1_000.0; 100];
        assert_eq!(sharpe_ratio(&eq), 0.0);
    }

    #[test]
    fn sharpe_constant_return_is_zero() {
        // Perfectly constant daily return: zero variance, explicit branch.
        let mut eq = vec![1_000.0];
        for i in 1..100 {
            eq.push(eq[i - 1] * 1.001);
        }
        assert_eq!(sharpe_ratio(&eq), 0.0);
    }

    #[test]
    fn sharpe_single_point_is_zero() {
        assert_eq!(sharpe_ratio(&[1_000.0]), 0.0);
    }

    #[test]
    fn sharpe_positive_for_mostly_rising_curve() {
        let mut eq = vec![1_000.0];
        for i in 1..253 {
            let r = if i % 2 == 0 { 1.002 } else { 1.0005 };
            eq.push(eq[i - 1] * r);
        }
        let s = sharpe_ratio(&eq);
        assert!(s > 5.0, "expected high Sharpe, got {s}");
    }

    #[test]
    fn sharpe_annualization_matches_hand_computation() {
        let eq = vec![100.0, 102.0, 100.98];
        let r = daily_returns(&eq);
        let expected = mean_f64(&r) / std_dev(&r) * 252.0_f64.sqrt();
        assert!((sharpe_ratio(&eq) - expected).abs() < 1e-12);
    }

    // ── Drawdown ──

    #[test]
    fn drawdown_series_known_path() {
        let eq = vec![100.0, 110.0, 99.0, 110.0, 121.0];
        let dd = drawdown_series(&eq);
        assert_eq!(dd.len(), 5);
        assert_eq!(dd[0], 0.0);
        assert_eq!(dd[1], 0.0);
        assert!((dd[2] - (99.0 - 110.0) / 110.0).abs() < 1e-10);
        assert_eq!(dd[3], 0.0);
        assert_eq!(dd[4], 0.0);
    }

    #[test]
    fn drawdown_values_bounded() {
        let eq = vec![100.0, 50.0, 25.0, 12.5, 100.0];
        for dd in drawdown_series(&eq) {
            assert!((-1.0..=0.0).contains(&dd), "drawdown {dd} out of bounds");
        }
    }

    #[test]
    fn max_drawdown_is_minimum_of_series() {
        let eq = vec![100.0, 110.0, 90.0, 95.0, 120.0, 100.0];
        let series_min = drawdown_series(&eq).into_iter().fold(0.0, f64::min);
        assert_eq!(max_drawdown(&eq), series_min);
    }

    #[test]
    fn max_drawdown_monotone_curve_is_zero() {
        let eq: Vec<f64> = (0..100).map(|i| 1_000.0 + i as f64).collect();
        assert_eq!(max_drawdown(&eq), 0.0);
    }

    #[test]
    fn max_drawdown_single_point_is_zero() {
        assert_eq!(max_drawdown(&[1_000.0]), 0.0);
    }

    // ── Equity final ratio ──

    #[test]
    fn equity_final_ratio_with_sell() {
        let eq = vec![1_000.0, 1_000.0, 1_060.0];
        let ratio = equity_final_ratio(&eq, &round_trip_trades(), 1_000.0);
        assert!((ratio - 1.06).abs() < 1e-10);
    }

    #[test]
    fn equity_final_ratio_zero_without_sell() {
        let eq = vec![1_000.0, 970.0];
        let buy_only = vec![round_trip_trades()[0].clone()];
        assert_eq!(equity_final_ratio(&eq, &buy_only, 1_000.0), 0.0);
        assert_eq!(equity_final_ratio(&eq, &[], 1_000.0), 0.0);
    }

    // ── Aggregate ──

    #[test]
    fn compute_all_metrics_no_trades() {
        let eq = curve(&[1_000.0; 10]);
        let m = PerformanceMetrics::compute(&eq, &[], 1_000.0);
        assert_eq!(m.total_return, 0.0);
        assert_eq!(m.sharpe, 0.0);
        assert_eq!(m.max_drawdown, 0.0);
        assert_eq!(m.trade_count, 0);
        assert_eq!(m.equity_final_ratio, 0.0);
        assert_eq!(m.drawdown_series.len(), 10);
    }

    #[test]
    fn compute_all_metrics_round_trip() {
        let eq = curve(&[1_000.0, 1_000.0, 990.0, 1_020.0, 1_060.0]);
        let m = PerformanceMetrics::compute(&eq, &round_trip_trades(), 1_000.0);
        assert!((m.total_return - 0.06).abs() < 1e-10);
        assert!(m.max_drawdown <= 0.0);
        assert_eq!(m.trade_count, 2);
        assert!((m.equity_final_ratio - 1.06).abs() < 1e-10);
        assert_eq!(m.drawdown_series.len(), eq.len());
        assert!(m.sharpe.is_finite());
    }

    #[test]
    fn drawdown_series_same_length_as_curve() {
        let eq = curve(&[1_000.0, 900.0, 950.0]);
        let m = PerformanceMetrics::compute(&eq, &[], 1_000.0);
        assert_eq!(m.drawdown_series.len(), 3);
        assert_eq!(m.max_drawdown, m.drawdown_series.iter().copied().fold(0.0, f64::min));
    }
}
