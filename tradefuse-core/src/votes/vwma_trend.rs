//! VWMA trend confirmation.
//!
//! Buys when the close sits above the VWMA on above-average volume, sells
//! on the mirror condition. Average volume is the rolling volume SMA.

use crate::components::vote::{defined, Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct VwmaTrend {
    vwma: String,
    vol_avg: String,
    warmup: usize,
}

impl VwmaTrend {
    pub fn new(vwma_period: usize, volume_avg_period: usize) -> Self {
        Self {
            vwma: format!("vwma_{vwma_period}"),
            vol_avg: format!("vol_sma_{volume_avg_period}"),
            warmup: vwma_period.max(volume_avg_period) - 1,
        }
    }
}

impl VoteProducer for VwmaTrend {
    fn name(&self) -> &str {
        "vwma_trend"
    }

    fn warmup_bars(&self) -> usize {
        self.warmup
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> Vote {
        let (Some(vwma), Some(avg_vol)) = (
            defined(indicators, &self.vwma, bar_index),
            defined(indicators, &self.vol_avg, bar_index),
        ) else {
            return Vote::Neutral;
        };
        let bar = &bars[bar_index];
        if bar.volume <= avg_vol {
            return Vote::Neutral;
        }
        if bar.close > vwma {
            Vote::Buy
        } else if bar.close < vwma {
            Vote::Sell
        } else {
            Vote::Neutral
        }
    }
}
