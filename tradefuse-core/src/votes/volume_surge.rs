//! Volume-surge reversal.
//!
//! A volume spike beyond `factor`x the rolling average on a down close
//! reads as capitulation (buy); the same spike on an up close reads as
//! blow-off (sell). Contrarian by construction.

use crate::components::vote::{defined, Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct VolumeSurge {
    vol_avg: String,
    factor: f64,
    warmup: usize,
}

impl VolumeSurge {
    pub fn new(volume_avg_period: usize, factor: f64) -> Self {
        assert!(factor > 1.0, "surge factor must be > 1");
        Self {
            vol_avg: format!("vol_sma_{volume_avg_period}"),
            factor,
            warmup: volume_avg_period,
        }
    }
}

impl VoteProducer for VolumeSurge {
    fn name(&self) -> &str {
        "volume_surge"
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
        if bar.volume <= self.factor * avg_vol {
            return Vote::Neutral;
        }
        let prev_close = bars[bar_index - 1].close;
        if bar.close < prev_close {
            Vote::Buy
        } else if bar.close > prev_close {
            Vote::Sell
        } else {
            Vote::Neutral
        }
    }
}
