//! MACD line vs signal line.
//!
//! Line above signal votes buy, below votes sell. This is a level
//! comparison, not a crossing detector — the fusion hysteresis dedups
//! repeated confirmations.

use crate::components::vote::{defined, Vote, VoteProducer};
use crate::components::IndicatorValues;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct MacdCross {
    line: String,
    signal: String,
}

impl MacdCross {
    pub fn new(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        Self {
            line: format!("macd_line_{short_span}_{long_span}_{signal_span}"),
            signal: format!("macd_signal_{short_span}_{long_span}_{signal_span}"),
        }
    }
}

impl VoteProducer for MacdCross {
    fn name(&self) -> &str {
        "macd_cross"
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn vote(&self, _bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> Vote {
        let (Some(line), Some(signal)) = (
            defined(indicators, &self.line, bar_index),
            defined(indicators, &self.signal, bar_index),
        ) else {
            return Vote::Neutral;
        };
        if line > signal {
            Vote::Buy
        } else if line < signal {
            Vote::Sell
        } else {
            Vote::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Indicator;
    use crate::indicators::{make_bars, Macd};

    fn values(bars: &[Bar]) -> IndicatorValues {
        let mut iv = IndicatorValues::new();
        iv.insert("macd_line_12_26_9", Macd::line(12, 26, 9).compute(bars));
        iv.insert("macd_signal_12_26_9", Macd::signal(12, 26, 9).compute(bars));
        iv
    }

    #[test]
    fn uptrend_votes_buy() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let iv = values(&bars);
        let p = MacdCross::new(12, 26, 9);
        assert_eq!(p.vote(&bars, 59, &iv), Vote::Buy);
    }

    #[test]
    fn downtrend_votes_sell() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let bars = make_bars(&closes);
        let iv = values(&bars);
        let p = MacdCross::new(12, 26, 9);
        assert_eq!(p.vote(&bars, 59, &iv), Vote::Sell);
    }

    #[test]
    fn flat_is_neutral() {
        let bars = make_bars(&[100.0; 30]);
        let iv = values(&bars);
        let p = MacdCross::new(12, 26, 9);
        assert_eq!(p.vote(&bars, 29, &iv), Vote::Neutral);
    }
}
