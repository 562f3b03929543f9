//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV
//! import) so we can swap implementations and mock for tests. The simulator
//! never sees a provider — it receives a validated slice of price points.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PricePoint, Symbol};

/// Structured error types for data operations.
///
/// Designed to be displayable directly in the CLI.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no rows for '{symbol}' in the requested date range")]
    NoDataInRange { symbol: String },

    #[error("no cached data for symbol '{symbol}' — run `download {symbol}` first")]
    NoCachedData { symbol: String },

    #[error("cache error: {0}")]
    CacheError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: Symbol,
    pub points: Vec<PricePoint>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Cache,
    Synthetic,
}

/// Trait for data providers (Yahoo Finance, CSV import, etc).
///
/// Implementations handle the specifics of fetching data from a particular
/// source. The cache layer sits above this trait — providers don't know
/// about the cache.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily closes for a symbol over a date range (inclusive).
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

/// Validate an ingested close series: non-empty, strictly ascending dates,
/// every close finite and positive.
pub fn validate_points(symbol: &str, points: &[PricePoint]) -> Result<(), DataError> {
    if points.is_empty() {
        return Err(DataError::NoDataInRange {
            symbol: symbol.to_string(),
        });
    }
    for pair in points.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(DataError::ValidationError(format!(
                "{symbol}: dates not strictly ascending ({} then {})",
                pair[0].date, pair[1].date
            )));
        }
    }
    for p in points {
        if !p.is_sane() {
            return Err(DataError::ValidationError(format!(
                "{symbol}: bad close {} on {}",
                p.close, p.date
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), close)
    }

    #[test]
    fn validates_clean_series() {
        let points = vec![point(2, 100.0), point(3, 101.0)];
        assert!(validate_points("SPY", &points).is_ok());
    }

    #[test]
    fn empty_series_is_no_data_in_range() {
        let err = validate_points("SPY", &[]).unwrap_err();
        assert!(matches!(err, DataError::NoDataInRange { .. }));
    }

    #[test]
    fn rejects_descending_dates() {
        let points = vec![point(3, 100.0), point(2, 101.0)];
        assert!(matches!(
            validate_points("SPY", &points),
            Err(DataError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_zero_close() {
        let points = vec![point(2, 100.0), point(3, 0.0)];
        assert!(matches!(
            validate_points("SPY", &points),
            Err(DataError::ValidationError(_))
        ));
    }
}
