//! Bollinger band touch.
//!
//! Close at or below the lower band votes buy (stretched down), at or
//! above the upper band votes sell.

use crate::components::vote::{defined, Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct BollingerTouch {
    upper: String,
    lower: String,
    warmup: usize,
}

impl BollingerTouch {
    pub fn new(period: usize) -> Self {
        Self {
            upper: format!("bollinger_upper_{period}"),
            lower: format!("bollinger_lower_{period}"),
            warmup: period - 1,
        }
    }
}

impl VoteProducer for BollingerTouch {
    fn name(&self) -> &str {
        "bollinger_touch"
    }

    fn warmup_bars(&self) -> usize {
        self.warmup
    }

    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> Vote {
        let (Some(upper), Some(lower)) = (
            defined(indicators, &self.upper, bar_index),
            defined(indicators, &self.lower, bar_index),
        ) else {
            return Vote::Neutral;
        };
        let close = bars[bar_index].close;
        // Collapsed bands (flat window) would satisfy both comparisons;
        // treat that as no information.
        if upper == lower {
            return Vote::Neutral;
        }
        if close <= lower {
            Vote::Buy
        } else if close >= upper {
            Vote::Sell
        } else {
            Vote::Neutral
        }
    }
}
