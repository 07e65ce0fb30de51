//! Serializable backtest configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradefuse_core::fusion::TiePrecedence;
use tradefuse_core::gateway::FeeSchedule;
use tradefuse_core::lifecycle::TpSlPolicy;
use tradefuse_core::risk::RiskConfig;
use tradefuse_core::votes::VoteConfig;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce a single backtest.
///
/// Two runs with identical configs and identical bars produce identical
/// trade ledgers; the `run_id` ties artifacts back to the exact config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub strategy_name: String,
    pub symbol: String,
    /// Bar interval label, informational ("15m", "1h", ...).
    pub timeframe: String,
    pub initial_balance: f64,
    /// Fraction of the balance put at play per position.
    pub position_pct: f64,
    /// Minimum agreeing votes before a signal fires.
    pub vote_threshold: usize,
    pub tie_precedence: TiePrecedence,
    pub votes: VoteConfig,
    pub policy: TpSlPolicy,
    pub flip_opens_opposite: bool,
    pub risk: RiskConfig,
    /// When set, taker fee is charged per side on every round trip.
    pub fees: Option<FeeSchedule>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            strategy_name: "vote-fusion".to_string(),
            symbol: "BTCUSDT".to_string(),
            timeframe: "15m".to_string(),
            initial_balance: 10_000.0,
            position_pct: 1.0,
            vote_threshold: 3,
            tie_precedence: TiePrecedence::default(),
            votes: VoteConfig::default(),
            policy: TpSlPolicy::default(),
            flip_opens_opposite: false,
            risk: RiskConfig::default(),
            fees: None,
        }
    }
}

impl BacktestConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_balance <= 0.0 {
            return Err(ConfigError::Invalid(
                "initial_balance must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.position_pct) {
            return Err(ConfigError::Invalid(
                "position_pct must be within [0, 1]".into(),
            ));
        }
        if self.vote_threshold == 0 {
            return Err(ConfigError::Invalid("vote_threshold must be >= 1".into()));
        }
        Ok(())
    }

    /// Deterministic content hash of the config. Identical configs get
    /// identical run IDs, so artifacts are cache-addressable.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("config serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
