//! Concrete indicator implementations.
//!
//! All indicators implement the `Indicator` trait from
//! `components::indicator`. They are precomputed once before the bar loop
//! and fed per-bar into signal fusion via `IndicatorValues`.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per series, keeping the single-series `Indicator` trait
//! unchanged.

pub mod bollinger;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod swing;
pub mod vwma;

pub use bollinger::{Bollinger, BollingerBand};
pub use macd::{Macd, MacdSeries};
pub use rsi::Rsi;
pub use sma::{PriceSource, Sma};
pub use swing::{SwingExtreme, SwingLevel};
pub use vwma::Vwma;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    make_bars_with_volume(closes, &vec![1000.0; closes.len()])
}

/// Like `make_bars` but with explicit per-bar volume.
#[cfg(test)]
pub fn make_bars_with_volume(closes: &[f64], volumes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    use chrono::TimeZone;
    assert_eq!(closes.len(), volumes.len());
    let base = chrono::Utc
        .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
        .unwrap();
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                symbol: "TEST".to_string(),
                timestamp: base + chrono::Duration::minutes(15 * i as i64),
                open,
                high,
                low,
                close,
                volume,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
