//! RevLab Core — domain types, simulation engine, and data providers.
//!
//! This crate contains the heart of the mean-reversion backtester:
//! - Domain types (price points, trades, equity points, the position accumulator)
//! - The single-pass simulation loop with path-dependent entry/exit state
//! - Data provider trait with Yahoo Finance and CSV implementations
//! - A per-symbol close-series cache

pub mod data;
pub mod domain;
pub mod engine;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all core types are Send + Sync.
    ///
    /// Batch sweeps run simulations on rayon worker threads; every type that
    /// crosses a thread boundary must satisfy this up front.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PricePoint>();
        require_sync::<domain::PricePoint>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();
        require_send::<domain::TradeSide>();
        require_sync::<domain::TradeSide>();
        require_send::<domain::EquityPoint>();
        require_sync::<domain::EquityPoint>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();

        require_send::<engine::StrategyParams>();
        require_sync::<engine::StrategyParams>();
        require_send::<engine::Simulation>();
        require_sync::<engine::Simulation>();
        require_send::<engine::SimError>();
        require_sync::<engine::SimError>();

        require_send::<data::FetchResult>();
        require_sync::<data::FetchResult>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::DataSource>();
        require_sync::<data::DataSource>();
    }
}
