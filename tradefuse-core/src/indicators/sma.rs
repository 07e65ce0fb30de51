//! Simple Moving Average over close or volume.
//!
//! The volume variant feeds the volume-surge and breakout votes (they
//! compare the current bar's volume against its rolling average).
//! Lookback: period - 1.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

/// Which bar field the SMA averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Close,
    Volume,
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    source: PriceSource,
    name: String,
}

impl Sma {
    pub fn close(period: usize) -> Self {
        Self::build(period, PriceSource::Close, "sma")
    }

    pub fn volume(period: usize) -> Self {
        Self::build(period, PriceSource::Volume, "vol_sma")
    }

    fn build(period: usize, source: PriceSource, prefix: &str) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            source,
            name: format!("{prefix}_{period}"),
        }
    }

    fn field(&self, bar: &Bar) -> f64 {
        match self.source {
            PriceSource::Close => bar.close,
            PriceSource::Volume => bar.volume,
        }
    }
}

impl Indicator for Sma {
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
            let mut sum = 0.0;
            let mut has_nan = false;
            for bar in window {
                let v = self.field(bar);
                if v.is_nan() {
                    has_nan = true;
                    break;
                }
                sum += v;
            }
            if !has_nan {
                result[i] = sum / self.period as f64;
            }
        }

        result
    }
}
