//! Swing levels — rolling extremes of highs and lows.
//!
//! The rolling max of highs (resp. min of lows) over the window defines the
//! prior swing level used for liquidity-zone / stop-hunt detection: a
//! "liquidity grab" fires when a later bar breaches the level.
//! Lookback: period - 1.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

/// Which extreme the indicator tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingLevel {
    /// Rolling max of highs.
    High,
    /// Rolling min of lows.
    Low,
}

#[derive(Debug, Clone)]
pub struct SwingExtreme {
    period: usize,
    level: SwingLevel,
    name: String,
}

impl SwingExtreme {
    pub fn high(period: usize) -> Self {
        Self::build(period, SwingLevel::High, "swing_high")
    }

    pub fn low(period: usize) -> Self {
        Self::build(period, SwingLevel::Low, "swing_low")
    }

    fn build(period: usize, level: SwingLevel, prefix: &str) -> Self {
        assert!(period >= 1, "swing period must be >= 1");
        Self {
            period,
            level,
            name: format!("{prefix}_{period}"),
        }
    }
}

impl Indicator for SwingExtreme {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            let mut extreme = match self.level {
                SwingLevel::High => f64::NEG_INFINITY,
                SwingLevel::Low => f64::INFINITY,
            };
            let mut has_nan = false;
            for bar in window {
                let v = match self.level {
                    SwingLevel::High => bar.high,
                    SwingLevel::Low => bar.low,
                };
                if v.is_nan() {
                    has_nan = true;
                    break;
                }
                extreme = match self.level {
                    SwingLevel::High => extreme.max(v),
                    SwingLevel::Low => extreme.min(v),
                };
            }
            if !has_nan {
                result[i] = extreme;
            }
        }

        result
    }
}
