//! Price loading and data resolution for the runner.
//!
//! Given a symbol, loads a close series and implements the fallback policy:
//! 1. If cached data covers the range → use it
//! 2. If not cached and a provider is available → download and cache
//! 3. If no data and `synthetic` is set → generate a synthetic walk (tagged)
//! 4. Otherwise → fail with a clear error
//!
//! Synthetic data is a developer-only debug mode; results produced on it are
//! tagged so they can never be mistaken for real runs.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use revlab_core::data::{CsvCache, DataError, DataProvider, DataSource};
use revlab_core::domain::PricePoint;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no cached data for '{symbol}' and no network access (use --synthetic for synthetic data)")]
    NoCachedDataOffline { symbol: String },

    #[error("no cached data for '{symbol}' and download failed: {reason}")]
    DownloadFailed { symbol: String, reason: String },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Options controlling how prices are loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
    /// If true, never make network requests.
    pub offline: bool,
    /// If true, generate synthetic prices when real data is unavailable.
    pub synthetic: bool,
    /// Force re-download even if cached.
    pub force: bool,
}

/// Result of loading a close series, including provenance.
#[derive(Debug, Clone)]
pub struct LoadedPrices {
    pub symbol: String,
    pub points: Vec<PricePoint>,
    pub source: DataSource,
    /// Deterministic BLAKE3 hash over the loaded series.
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

/// Load a close series for one symbol from the cache, with fallback to
/// download or synthetic data. The primary entry point for the runner.
pub fn load_prices(
    symbol: &str,
    cache: &CsvCache,
    provider: Option<&dyn DataProvider>,
    opts: &LoadOptions,
) -> Result<LoadedPrices, LoadError> {
    // Step 1: Try cache
    if !opts.force {
        if let Ok(points) = cache.load_range(symbol, opts.start, opts.end) {
            return Ok(finish(symbol, points, DataSource::Cache));
        }
    }

    // Step 2: Try download (if not offline and provider available)
    if !opts.offline {
        if let Some(prov) = provider {
            match prov.fetch(symbol, opts.start, opts.end) {
                Ok(fetched) => {
                    cache.write(symbol, &fetched.points, prov.name())?;
                    return Ok(finish(symbol, fetched.points, fetched.source));
                }
                Err(e) => {
                    if !opts.synthetic {
                        return Err(LoadError::DownloadFailed {
                            symbol: symbol.to_string(),
                            reason: e.to_string(),
                        });
                    }
                    // Fall through to synthetic
                }
            }
        }
    }

    // Step 3: Synthetic fallback (if enabled)
    if opts.synthetic {
        eprintln!(
            "WARNING: generating synthetic data for {symbol} — results will be tagged as synthetic"
        );
        let points = generate_synthetic_prices(symbol, opts.start, opts.end);
        return Ok(LoadedPrices {
            has_synthetic: true,
            ..finish(symbol, points, DataSource::Synthetic)
        });
    }

    // Step 4: Fail
    Err(LoadError::NoCachedDataOffline {
        symbol: symbol.to_string(),
    })
}

fn finish(symbol: &str, points: Vec<PricePoint>, source: DataSource) -> LoadedPrices {
    let dataset_hash = compute_dataset_hash(symbol, &points);
    LoadedPrices {
        symbol: symbol.to_string(),
        points,
        source,
        dataset_hash,
        has_synthetic: false,
    }
}

/// Deterministic BLAKE3 hash over the symbol and every (date, close) pair.
fn compute_dataset_hash(symbol: &str, points: &[PricePoint]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    for p in points {
        hasher.update(p.date.to_string().as_bytes());
        hasher.update(&p.close.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Generate a synthetic close series for testing/development.
///
/// A simple random walk from 100.0, weekdays only, seeded deterministically
/// from the symbol name so repeated runs agree.
pub fn generate_synthetic_prices(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut points = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        price *= 1.0 + daily_return;
        points.push(PricePoint::new(current, price));

        current += chrono::Duration::days(1);
    }

    points
}
