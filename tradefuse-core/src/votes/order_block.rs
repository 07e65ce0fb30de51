//! Order block engulfment.
//!
//! A bearish candle whose body is fully reclaimed by the next bullish
//! close marks a demand block (buy). A bullish candle engulfed to the
//! downside marks supply (sell). Dojis on either bar produce no vote.

use crate::components::vote::{Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct OrderBlock;

impl OrderBlock {
    pub fn new() -> Self {
        Self
    }
}

impl VoteProducer for OrderBlock {
    fn name(&self) -> &str {
        "order_block"
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

        let prev_bearish = prev.close < prev.open;
        let prev_bullish = prev.close > prev.open;

        if prev_bearish && bar.close > bar.open && bar.close > prev.open {
            Vote::Buy
        } else if prev_bullish && bar.close < bar.open && bar.close < prev.open {
            Vote::Sell
        } else {
            Vote::Neutral
        }
    }
}
