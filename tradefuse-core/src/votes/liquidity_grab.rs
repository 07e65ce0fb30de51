//! Liquidity-grab breakout.
//!
//! Swing levels are the rolling max of highs / min of lows. A close beyond
//! the *prior* bar's swing level on above-average volume reads as a
//! stop-hunt breach: buy above the swing high, sell below the swing low.

use crate::components::vote::{defined, Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct LiquidityGrab {
    swing_high: String,
    swing_low: String,
    vol_avg: String,
    warmup: usize,
}

impl LiquidityGrab {
    pub fn new(swing_period: usize, volume_avg_period: usize) -> Self {
        Self {
            swing_high: format!("swing_high_{swing_period}"),
            swing_low: format!("swing_low_{swing_period}"),
            vol_avg: format!("vol_sma_{volume_avg_period}"),
            // Swing level is read at bar_index - 1.
            warmup: swing_period.max(volume_avg_period),
        }
    }
}

impl VoteProducer for LiquidityGrab {
    fn name(&self) -> &str {
        "liquidity_grab"
    }

    fn warmup_bars(&self) -> usize {
        self.warmup
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> Vote {
        if bar_index == 0 {
            return Vote::Neutral;
        }
        let Some(avg_vol) = defined(indicators, &self.vol_avg, bar_index) else {
            return Vote::Neutral;
        };
        let bar = &bars[bar_index];
        if bar.volume <= avg_vol {
            return Vote::Neutral;
        }

        if let Some(prior_high) = defined(indicators, &self.swing_high, bar_index - 1) {
            if bar.close > prior_high {
                return Vote::Buy;
            }
        }
        if let Some(prior_low) = defined(indicators, &self.swing_low, bar_index - 1) {
            if bar.close < prior_low {
                return Vote::Sell;
            }
        }
        Vote::Neutral
    }
}
