//! Close-series cache.
//!
//! Layout: `{cache_dir}/{SYMBOL}.csv` plus a `{SYMBOL}.meta.json` sidecar
//! (date range, row count, content hash, source). Writes are atomic: write
//! to `.tmp`, rename into place. Loads are validated before being handed to
//! the runner.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::csv_import::{read_closes_csv, write_closes_csv};
use super::provider::{validate_points, DataError};
use crate::domain::{PricePoint, Symbol};

/// Metadata sidecar for a cached symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub symbol: Symbol,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub row_count: usize,
    pub data_hash: String,
    pub source: String,
    pub cached_at: chrono::NaiveDateTime,
}

/// The on-disk cache of close series.
pub struct CsvCache {
    cache_dir: PathBuf,
}

impl CsvCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Root directory of the cache.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn data_path(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("{symbol}.csv"))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.cache_dir.join(format!("{symbol}.meta.json"))
    }

    /// Write a close series for a symbol to the cache.
    pub fn write(&self, symbol: &str, points: &[PricePoint], source: &str) -> Result<(), DataError> {
        validate_points(symbol, points)?;

        fs::create_dir_all(&self.cache_dir)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        let path = self.data_path(symbol);
        let tmp_path = path.with_extension("csv.tmp");
        write_closes_csv(&tmp_path, points)?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::CacheError(format!("atomic rename failed: {e}"))
        })?;

        // validate_points already rejected the empty series.
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(DataError::ValidationError("empty series".into()));
        };
        let meta = CacheMeta {
            symbol: symbol.to_string(),
            start_date: first.date,
            end_date: last.date,
            row_count: points.len(),
            data_hash: blake3::hash(
                &serde_json::to_vec(points)
                    .map_err(|e| DataError::CacheError(format!("hash serialization: {e}")))?,
            )
            .to_hex()
            .to_string(),
            source: source.to_string(),
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(symbol), meta_json)
            .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;

        Ok(())
    }

    /// Load the cached close series for a symbol, validated.
    pub fn load(&self, symbol: &str) -> Result<Vec<PricePoint>, DataError> {
        let path = self.data_path(symbol);
        if !path.exists() {
            return Err(DataError::NoCachedData {
                symbol: symbol.to_string(),
            });
        }
        let points = read_closes_csv(&path)?;
        validate_points(symbol, &points)?;
        Ok(points)
    }

    /// Load only the points inside `[start, end]`.
    pub fn load_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let points = self.load(symbol)?;
        let filtered: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();
        if filtered.is_empty() {
            return Err(DataError::NoDataInRange {
                symbol: symbol.to_string(),
            });
        }
        Ok(filtered)
    }

    /// Whether the cached range for `symbol` spans all of `[start, end]`.
    ///
    /// Partial overlap does not count: a request extending past either edge
    /// of the cached range needs a fresh download.
    pub fn covers(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> bool {
        self.meta(symbol)
            .map(|m| m.start_date <= start && m.end_date >= end)
            .unwrap_or(false)
    }

    /// Read the metadata sidecar for a symbol.
    pub fn meta(&self, symbol: &str) -> Result<CacheMeta, DataError> {
        let path = self.meta_path(symbol);
        let json = fs::read_to_string(&path).map_err(|_| DataError::NoCachedData {
            symbol: symbol.to_string(),
        })?;
        serde_json::from_str(&json)
            .map_err(|e| DataError::CacheError(format!("meta parse: {e}")))
    }

    /// List metadata for every cached symbol.
    pub fn status(&self) -> Result<Vec<CacheMeta>, DataError> {
        if !self.cache_dir.exists() {
            return Ok(Vec::new());
        }
        let mut metas = Vec::new();
        let entries = fs::read_dir(&self.cache_dir)
            .map_err(|e| DataError::CacheError(format!("read dir: {e}")))?;
        for entry in entries {
            let entry = entry.map_err(|e| DataError::CacheError(format!("dir entry: {e}")))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(symbol) = name.strip_suffix(".meta.json") {
                metas.push(self.meta(symbol)?);
            }
        }
        metas.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(metas)
    }

    /// Remove a cached symbol (data file and sidecar).
    pub fn remove(&self, symbol: &str) -> Result<(), DataError> {
        for path in [self.data_path(symbol), self.meta_path(symbol)] {
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| DataError::CacheError(format!("remove: {e}")))?;
            }
        }
        Ok(())
    }
}
