//! Fair value gap detection.
//!
//! A three-bar imbalance: when the current bar's low sits entirely above
//! the high from two bars back, price left an unfilled gap on the way up
//! (buy). The mirrored gap below sells. The middle bar is the displacement
//! candle and is not inspected directly.

use crate::components::vote::{Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct FairValueGap;

impl FairValueGap {
    pub fn new() -> Self {
        Self
    }
}

impl VoteProducer for FairValueGap {
    fn name(&self) -> &str {
        "fair_value_gap"
    }

    fn warmup_bars(&self) -> usize {
        2
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, _indicators: &IndicatorValues) -> Vote {
        if bar_index < 2 {
            return Vote::Neutral;
        }
        let bar = &bars[bar_index];
        let anchor = &bars[bar_index - 2];

        if bar.low > anchor.high {
            Vote::Buy
        } else if bar.high < anchor.low {
            Vote::Sell
        } else {
            Vote::Neutral
        }
    }
}
