//! Serializable backtest configuration.
//!
//! Loaded from TOML for the CLI, or built directly by callers. Every field
//! the simulation depends on lives here — no baked-in constants — so a
//! config hash identifies a run completely.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use revlab_core::engine::StrategyParams;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a single backtest run.
///
/// ```toml
/// [backtest]
/// symbol = "SPY"
/// start_date = "2019-01-02"
/// end_date = "2024-12-31"
/// initial_capital = 10000.0
///
/// [strategy]
/// buy_threshold = 0.015
/// sell_threshold = 0.03
/// fee_rate = 0.001
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategySection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestSection {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategySection {
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    #[serde(default)]
    pub fee_rate: f64,
}

/// Default starting cash when the config omits it.
fn default_initial_capital() -> f64 {
    10_000.0
}

impl BacktestConfig {
    /// Parse from a TOML string and validate.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: BacktestConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    /// Check date-range sanity and the simulator's parameter preconditions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backtest.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()));
        }
        if self.backtest.start_date >= self.backtest.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date {} must be before end_date {}",
                self.backtest.start_date, self.backtest.end_date
            )));
        }
        self.strategy_params()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// The engine-facing parameter set.
    pub fn strategy_params(&self) -> StrategyParams {
        StrategyParams::new(
            self.strategy.buy_threshold,
            self.strategy.sell_threshold,
            self.strategy.fee_rate,
            self.backtest.initial_capital,
        )
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs get the same RunId and can share
    /// cached artifacts.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
