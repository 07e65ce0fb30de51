//! RSI oversold/overbought levels.
//!
//! Buys below the oversold level, sells above the overbought level.
//! Levels default to 30/70 and are configurable; tighter 40/60 levels
//! suit short intraday timeframes.

use crate::components::vote::{defined, Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct RsiLevel {
    rsi: String,
    buy_level: f64,
    sell_level: f64,
    warmup: usize,
}

impl RsiLevel {
    pub fn new(rsi_period: usize, buy_level: f64, sell_level: f64) -> Self {
        assert!(buy_level < sell_level, "RSI buy level must be < sell level");
        Self {
            rsi: format!("rsi_{rsi_period}"),
            buy_level,
            sell_level,
            warmup: rsi_period,
        }
    }
}

impl VoteProducer for RsiLevel {
    fn name(&self) -> &str {
        "rsi_level"
    }

    fn warmup_bars(&self) -> usize {
        self.warmup
    }

    fn vote(&self, _bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> Vote {
        let Some(rsi) = defined(indicators, &self.rsi, bar_index) else {
            return Vote::Neutral;
        };
        if rsi < self.buy_level {
            Vote::Buy
        } else if rsi > self.sell_level {
            Vote::Sell
        } else {
            Vote::Neutral
        }
    }
}
