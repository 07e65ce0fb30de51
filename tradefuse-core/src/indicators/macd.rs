//! Moving Average Convergence Divergence (MACD).
//!
//! Three series (separate Indicator instances):
//! - Line: EMA(close, short) - EMA(close, long)
//! - Signal: EMA(line, signal)
//! - Histogram: line - signal
//!
//! EMAs are seeded with the first value and use alpha = 2/(span+1), so the
//! series is defined from bar 0 — EMA is recursive, not a fixed-window
//! rolling computation, and therefore has no NaN warmup prefix.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

/// Which MACD series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdSeries {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    short_span: usize,
    long_span: usize,
    signal_span: usize,
    series: MacdSeries,
    name: String,
}

impl Macd {
    pub fn line(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        Self::build(short_span, long_span, signal_span, MacdSeries::Line, "line")
    }

    pub fn signal(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        Self::build(
            short_span,
            long_span,
            signal_span,
            MacdSeries::Signal,
            "signal",
        )
    }

    pub fn histogram(short_span: usize, long_span: usize, signal_span: usize) -> Self {
        Self::build(
            short_span,
            long_span,
            signal_span,
            MacdSeries::Histogram,
            "histogram",
        )
    }

    fn build(
        short_span: usize,
        long_span: usize,
        signal_span: usize,
        series: MacdSeries,
        suffix: &str,
    ) -> Self {
        assert!(short_span >= 1 && long_span >= 1 && signal_span >= 1);
        assert!(short_span < long_span, "MACD short span must be < long span");
        Self {
            short_span,
            long_span,
            signal_span,
            series,
            name: format!("macd_{suffix}_{short_span}_{long_span}_{signal_span}"),
        }
    }

    fn line_values(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let short = ema(&closes, self.short_span);
        let long = ema(&closes, self.long_span);
        short
            .iter()
            .zip(&long)
            .map(|(s, l)| s - l)
            .collect()
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.is_empty() {
            return Vec::new();
        }
        let line = self.line_values(bars);
        match self.series {
            MacdSeries::Line => line,
            MacdSeries::Signal => ema(&line, self.signal_span),
            MacdSeries::Histogram => {
                let signal = ema(&line, self.signal_span);
                line.iter().zip(&signal).map(|(l, s)| l - s).collect()
            }
        }
    }
}

/// Recursive EMA seeded with the first value; NaN inputs poison the rest of
/// the series (the recursion cannot recover a defined state).
fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = f64::NAN;
    for (i, &v) in values.iter().enumerate() {
        let next = if i == 0 {
            v
        } else if prev.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            alpha * v + (1.0 - alpha) * prev
        };
        out.push(next);
        prev = next;
    }
    out
}
