//! Reporting and export — JSON and CSV artifact generation.
//!
//! Provides two export formats for backtest results:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: trade log, equity curve, and underwater series for external tools
//!
//! Persisted manifests include a `schema_version` field; unknown versions are
//! rejected on load. CSV exports carry full stored precision — any 2-decimal
//! rounding is presentation-layer only (see `report`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use revlab_core::domain::{EquityPoint, Trade};

use crate::runner::{BacktestResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the trade log as CSV: `Date,Side,Price,Value`, unformatted values.
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["Date", "Side", "Price", "Value"])?;
    for t in trades {
        wtr.write_record([
            t.date.to_string(),
            t.side.label().to_string(),
            t.price.to_string(),
            t.value.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export an equity curve as CSV with date and equity columns.
pub fn export_equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "equity"])?;
    for p in equity_curve {
        wtr.write_record([&p.date.to_string(), &p.equity.to_string()])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the underwater series as CSV, date-indexed like the equity curve.
pub fn export_drawdown_csv(equity_curve: &[EquityPoint], drawdown: &[f64]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "drawdown"])?;
    for (p, dd) in equity_curve.iter().zip(drawdown) {
        wtr.write_record([&p.date.to_string(), &dd.to_string()])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single backtest run.
///
/// Creates a directory named `{symbol}_{timestamp}/` under `output_dir`
/// containing:
/// - `manifest.json` — the full `BacktestResult`
/// - `trades.csv` — the trade log
/// - `equity.csv` — day-by-day equity curve
/// - `drawdown.csv` — underwater series
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let base = format!(
        "{}_{}",
        result.symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    // Two runs for one symbol can start within the same second; claim the
    // directory atomically and uniquify instead of overwriting.
    let mut run_dir = output_dir.join(&base);
    let mut attempt = 1u32;
    loop {
        match std::fs::create_dir(&run_dir) {
            Ok(()) => break,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                attempt += 1;
                run_dir = output_dir.join(format!("{base}_{attempt}"));
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to create artifact dir: {}", run_dir.display())
                })
            }
        }
    }

    let json = export_json(result)?;
    std::fs::write(run_dir.join("manifest.json"), &json)?;

    let trades_csv = export_trades_csv(&result.trades)?;
    std::fs::write(run_dir.join("trades.csv"), &trades_csv)?;

    let equity_csv = export_equity_csv(&result.equity_curve)?;
    std::fs::write(run_dir.join("equity.csv"), &equity_csv)?;

    let drawdown_csv =
        export_drawdown_csv(&result.equity_curve, &result.metrics.drawdown_series)?;
    std::fs::write(run_dir.join("drawdown.csv"), &drawdown_csv)?;

    Ok(run_dir)
}

/// Load a `BacktestResult` from an artifact directory's manifest.json.
pub fn load_artifacts(run_dir: &Path) -> Result<BacktestResult> {
    let manifest_path = run_dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use revlab_core::domain::{PricePoint, TradeSide};
    use revlab_core::engine::StrategyParams;

    use crate::runner::run_backtest_from_data;

    fn sample_result() -> BacktestResult {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let prices: Vec<PricePoint> = [100.0, 97.0, 96.0, 99.0, 103.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::new(start + chrono::Days::new(i as u64), c))
            .collect();
        let params = StrategyParams::new(0.02, 0.03, 0.0, 1_000.0);
        run_backtest_from_data("SPY", &prices, &params).unwrap()
    }

    #[test]
    fn json_roundtrip() {
        let result = sample_result();
        let json = export_json(&result).unwrap();
        let loaded = import_json(&json).unwrap();
        assert_eq!(loaded.symbol, result.symbol);
        assert_eq!(loaded.trades, result.trades);
        assert_eq!(loaded.equity_curve, result.equity_curve);
    }

    #[test]
    fn import_rejects_future_schema() {
        let result = sample_result();
        let json = export_json(&result)
            .unwrap()
            .replace("\"schema_version\": 1", "\"schema_version\": 99");
        assert!(import_json(&json).is_err());
    }

    #[test]
    fn trades_csv_has_header_and_full_precision() {
        let result = sample_result();
        let csv = export_trades_csv(&result.trades).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "Date,Side,Price,Value");

        let buy = lines.next().unwrap();
        assert!(buy.starts_with("2024-01-03,BUY,97,970"));
        assert_eq!(result.trades[0].side, TradeSide::Buy);
    }

    #[test]
    fn equity_csv_one_row_per_day() {
        let result = sample_result();
        let csv = export_equity_csv(&result.equity_curve).unwrap();
        // Header plus one row per equity point.
        assert_eq!(csv.lines().count(), result.equity_curve.len() + 1);
    }

    #[test]
    fn artifact_bundle_roundtrip() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&result, dir.path()).unwrap();

        for file in ["manifest.json", "trades.csv", "equity.csv", "drawdown.csv"] {
            assert!(run_dir.join(file).exists(), "{file} missing");
        }

        let loaded = load_artifacts(&run_dir).unwrap();
        assert_eq!(loaded.symbol, result.symbol);
        assert_eq!(loaded.metrics.trade_count, result.metrics.trade_count);
    }

    #[test]
    fn same_second_saves_get_distinct_dirs() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();

        // Back-to-back saves share the timestamp; neither may clobber the other.
        let first = save_artifacts(&result, dir.path()).unwrap();
        let second = save_artifacts(&result, dir.path()).unwrap();
        assert_ne!(first, second);
        assert!(first.join("manifest.json").exists());
        assert!(second.join("manifest.json").exists());
    }
}
