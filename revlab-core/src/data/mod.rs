//! Data acquisition and caching.

pub mod cache;
pub mod csv_import;
pub mod provider;
pub mod yahoo;

pub use cache::{CacheMeta, CsvCache};
pub use csv_import::{read_closes_csv, write_closes_csv};
pub use provider::{validate_points, DataError, DataProvider, DataSource, FetchResult};
pub use yahoo::YahooProvider;
