//! Relative Strength Index (RSI).
//!
//! Uses plain rolling means of gains and losses over the window (not
//! Wilder smoothing):
//!   RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (one extra bar for the first delta).
//! Edge case: avg_loss == 0 → RSI = 100, including the flat-window case.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 {
            return result;
        }

        // Gains/losses per bar; index 0 has no delta.
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];
        for i in 1..n {
            let delta = bars[i].close - bars[i - 1].close;
            if delta.is_nan() {
                continue;
            }
            gains[i] = if delta > 0.0 { delta } else { 0.0 };
            losses[i] = if delta < 0.0 { -delta } else { 0.0 };
        }

        for i in self.period..n {
            let window = (i + 1 - self.period)..=i;
            let mut gain_sum = 0.0;
            let mut loss_sum = 0.0;
            let mut has_nan = false;
            for j in window {
                if gains[j].is_nan() || losses[j].is_nan() {
                    has_nan = true;
                    break;
                }
                gain_sum += gains[j];
                loss_sum += losses[j];
            }
            if has_nan {
                continue;
            }

            let avg_gain = gain_sum / self.period as f64;
            let avg_loss = loss_sum / self.period as f64;

            result[i] = if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
            };
        }

        result
    }
}
