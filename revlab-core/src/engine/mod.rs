//! Simulation engine — the single-pass mean-reversion loop.
//!
//! The engine consumes an ordered close-price series plus threshold
//! parameters and produces a per-day equity curve and an ordered trade log.
//! Entry fires on a drop below the previous close, exit on a rise above the
//! open lot's entry price. The exit target depends on *which* entry is
//! currently open, so the loop carries mutable `Position` state instead of
//! being expressed as a columnar computation.

pub mod params;
pub mod simulator;

pub use params::StrategyParams;
pub use simulator::{simulate, SimError, Simulation};
