//! Smart-money divergence.
//!
//! Price pushing to a higher high while RSI prints a lower value is
//! bearish divergence (sell); a lower low in price with a rising RSI is
//! the bullish mirror (buy). Bearish is checked first; the two conditions
//! require opposite RSI slopes so they cannot both hold.

use crate::components::vote::{defined, Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct SmartMoneyDivergence {
    rsi: String,
    warmup: usize,
}

impl SmartMoneyDivergence {
    pub fn new(rsi_period: usize) -> Self {
        Self {
            rsi: format!("rsi_{rsi_period}"),
            // RSI is read at bar_index - 1 as well.
            warmup: rsi_period + 1,
        }
    }
}

impl VoteProducer for SmartMoneyDivergence {
    fn name(&self) -> &str {
        "smart_money_divergence"
    }

    fn warmup_bars(&self) -> usize {
        self.warmup
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> Vote {
        if bar_index == 0 {
            return Vote::Neutral;
        }
        let (Some(rsi), Some(prev_rsi)) = (
            defined(indicators, &self.rsi, bar_index),
            defined(indicators, &self.rsi, bar_index - 1),
        ) else {
            return Vote::Neutral;
        };
        let bar = &bars[bar_index];
        let prev = &bars[bar_index - 1];

        if bar.high > prev.high && rsi < prev_rsi {
            Vote::Sell
        } else if bar.low < prev.low && rsi > prev_rsi {
            Vote::Buy
        } else {
            Vote::Neutral
        }
    }
}
