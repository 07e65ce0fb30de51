//! Concrete vote producers.
//!
//! Each producer maps one strategy branch onto the ternary
//! `vote(bar_index) -> {-1, 0, +1}` capability: VWMA trend confirmation,
//! liquidity-grab breakout, volume-surge reversal, RSI levels, MACD cross,
//! Bollinger touch, market-structure shift, smart-money divergence,
//! fair-value gap, and order block. Signal fusion counts their votes per
//! bar; no producer ever sees position or account state.

pub mod bollinger_touch;
pub mod divergence;
pub mod fvg;
pub mod liquidity_grab;
pub mod macd_cross;
pub mod market_structure;
pub mod order_block;
pub mod rsi_level;
pub mod volume_surge;
pub mod vwma_trend;

pub use bollinger_touch::BollingerTouch;
pub use divergence::SmartMoneyDivergence;
pub use fvg::FairValueGap;
pub use liquidity_grab::LiquidityGrab;
pub use macd_cross::MacdCross;
pub use market_structure::MarketStructure;
pub use order_block::OrderBlock;
pub use rsi_level::RsiLevel;
pub use volume_surge::VolumeSurge;
pub use vwma_trend::VwmaTrend;

use crate::components::{Indicator, VoteProducer};
use crate::indicators::{Bollinger, Macd, Rsi, Sma, SwingExtreme, Vwma};
use serde::{Deserialize, Serialize};

/// Window sizes and thresholds for the standard producer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteConfig {
    pub vwma_period: usize,
    pub volume_avg_period: usize,
    pub swing_period: usize,
    pub rsi_period: usize,
    pub rsi_buy_level: f64,
    pub rsi_sell_level: f64,
    pub macd_short: usize,
    pub macd_long: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub surge_factor: f64,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            vwma_period: 14,
            volume_avg_period: 20,
            swing_period: 20,
            rsi_period: 14,
            rsi_buy_level: 30.0,
            rsi_sell_level: 70.0,
            macd_short: 12,
            macd_long: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_mult: 2.0,
            surge_factor: 2.0,
        }
    }
}

/// The indicator set the standard producers read from.
pub fn standard_indicators(cfg: &VoteConfig) -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Vwma::new(cfg.vwma_period)),
        Box::new(Sma::volume(cfg.volume_avg_period)),
        Box::new(SwingExtreme::high(cfg.swing_period)),
        Box::new(SwingExtreme::low(cfg.swing_period)),
        Box::new(Rsi::new(cfg.rsi_period)),
        Box::new(Macd::line(cfg.macd_short, cfg.macd_long, cfg.macd_signal)),
        Box::new(Macd::signal(cfg.macd_short, cfg.macd_long, cfg.macd_signal)),
        Box::new(Bollinger::upper(cfg.bollinger_period, cfg.bollinger_mult)),
        Box::new(Bollinger::lower(cfg.bollinger_period, cfg.bollinger_mult)),
    ]
}

/// The full standard producer set, wired to `standard_indicators` names.
pub fn standard_producers(cfg: &VoteConfig) -> Vec<Box<dyn VoteProducer>> {
    vec![
        Box::new(VwmaTrend::new(cfg.vwma_period, cfg.volume_avg_period)),
        Box::new(LiquidityGrab::new(cfg.swing_period, cfg.volume_avg_period)),
        Box::new(VolumeSurge::new(cfg.volume_avg_period, cfg.surge_factor)),
        Box::new(RsiLevel::new(
            cfg.rsi_period,
            cfg.rsi_buy_level,
            cfg.rsi_sell_level,
        )),
        Box::new(MacdCross::new(
            cfg.macd_short,
            cfg.macd_long,
            cfg.macd_signal,
        )),
        Box::new(BollingerTouch::new(cfg.bollinger_period)),
        Box::new(MarketStructure::new()),
        Box::new(SmartMoneyDivergence::new(cfg.rsi_period)),
        Box::new(FairValueGap::new()),
        Box::new(OrderBlock::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_is_complete() {
        let cfg = VoteConfig::default();
        assert_eq!(standard_producers(&cfg).len(), 10);
        assert_eq!(standard_indicators(&cfg).len(), 9);
    }

    #[test]
    fn producer_names_are_unique() {
        let cfg = VoteConfig::default();
        let producers = standard_producers(&cfg);
        let mut names: Vec<&str> = producers.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), producers.len());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = VoteConfig::default();
        let text = toml::to_string(&cfg).unwrap();
        let back: VoteConfig = toml::from_str(&text).unwrap();
        assert_eq!(cfg, back);
    }
}
