//! Volume-Weighted Moving Average (VWMA).
//!
//! VWMA = Σ(close·volume) / Σ(volume) over the window.
//! Lookback: period - 1.
//! Edge case: zero total volume over the window → NaN (undefined, not 0).

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Vwma {
    period: usize,
    name: String,
}

impl Vwma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "VWMA period must be >= 1");
        Self {
            period,
            name: format!("vwma_{period}"),
        }
    }
}

impl Indicator for Vwma {
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

            let mut pv_sum = 0.0;
            let mut v_sum = 0.0;
            let mut has_nan = false;
            for bar in window {
                if bar.close.is_nan() || bar.volume.is_nan() {
                    has_nan = true;
                    break;
                }
                pv_sum += bar.close * bar.volume;
                v_sum += bar.volume;
            }

            if !has_nan && v_sum > 0.0 {
                result[i] = pv_sum / v_sum;
            }
        }

        result
    }
}
