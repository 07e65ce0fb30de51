//! Market structure shift (MSS).
//!
//! A higher high together with a higher low marks a bullish shift; lower
//! high plus lower low marks the bearish mirror. Pure two-bar pattern,
//! no indicator inputs.

use crate::components::vote::{Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct MarketStructure;

impl MarketStructure {
    pub fn new() -> Self {
        Self
    }
}

impl VoteProducer for MarketStructure {
    fn name(&self) -> &str {
        "market_structure"
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, _indicators: &IndicatorValues) -> Vote {
        if bar_index == 0 {
            return Vote::Neutral;
        }
        let bar = &bars[bar_index];
        let prev = &bars[bar_index - 1];
        if bar.high > prev.high && bar.low > prev.low {
            Vote::Buy
        } else if bar.high < prev.high && bar.low < prev.low {
            Vote::Sell
        } else {
            Vote::Neutral
        }
    }
}
