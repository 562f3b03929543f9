//! CSV import/export of close series.
//!
//! Format: header `date,close`, one row per trading day, dates as
//! YYYY-MM-DD. This is both the user-facing import format and the cache's
//! on-disk storage format.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::provider::DataError;
use crate::domain::PricePoint;

#[derive(Debug, Serialize, Deserialize)]
struct CloseRow {
    date: NaiveDate,
    close: f64,
}

/// Read a `date,close` CSV file into price points.
pub fn read_closes_csv(path: &Path) -> Result<Vec<PricePoint>, DataError> {
    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| DataError::Other(format!("failed to open {}: {e}", path.display())))?;

    let mut points = Vec::new();
    for row in rdr.deserialize() {
        let row: CloseRow =
            row.map_err(|e| DataError::ValidationError(format!("bad CSV row: {e}")))?;
        points.push(PricePoint::new(row.date, row.close));
    }
    Ok(points)
}

/// Write price points as a `date,close` CSV file.
pub fn write_closes_csv(path: &Path, points: &[PricePoint]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| DataError::Other(format!("failed to create {}: {e}", path.display())))?;

    for p in points {
        wtr.serialize(CloseRow {
            date: p.date,
            close: p.close,
        })
        .map_err(|e| DataError::Other(format!("CSV write: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| DataError::Other(format!("CSV flush: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spy.csv");
        let points = vec![
            PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 100.0),
            PricePoint::new(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), 101.5),
        ];
        write_closes_csv(&path, &points).unwrap();
        let loaded = read_closes_csv(&path).unwrap();
        assert_eq!(loaded, points);
    }

    #[test]
    fn read_reports_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "date,close\nnot-a-date,100.0\n").unwrap();
        let err = read_closes_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::ValidationError(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_closes_csv(Path::new("/nonexistent/nope.csv")).unwrap_err();
        assert!(matches!(err, DataError::Other(_)));
    }
}
