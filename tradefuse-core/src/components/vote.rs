//! Vote producers — the polymorphic inputs to signal fusion.
//!
//! Each enabled strategy branch contributes one ternary vote per bar,
//! computed purely from data at or before that bar. Undefined indicator
//! inputs (NaN warmup) always map to a neutral vote, never an error.

use crate::domain::Bar;

use super::indicator::IndicatorValues;

/// A single per-bar vote: buy (+1), sell (-1), or neutral (0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Vote {
    Buy,
    Sell,
    #[default]
    Neutral,
}

impl Vote {
    pub fn as_i8(self) -> i8 {
        match self {
            Vote::Buy => 1,
            Vote::Sell => -1,
            Vote::Neutral => 0,
        }
    }
}

/// Trait for vote producers.
///
/// # Architecture invariant
/// Producers must never reference position or account state; they receive
/// only bar history and precomputed indicator values, and must only use
/// data from `bars[0..=bar_index]`.
pub trait VoteProducer: Send + Sync {
    /// Human-readable name (e.g., "vwma_trend", "macd_cross").
    fn name(&self) -> &str;

    /// Number of bars needed before this producer can vote non-neutrally.
    fn warmup_bars(&self) -> usize;

    /// Vote at `bar_index` given the bar history and indicators.
    fn vote(&self, bars: &[Bar], bar_index: usize, indicators: &IndicatorValues) -> Vote;
}

/// Fetch an indicator value, treating missing/NaN as undefined.
pub(crate) fn defined(indicators: &IndicatorValues, name: &str, bar_index: usize) -> Option<f64> {
    indicators
        .get(name, bar_index)
        .filter(|v| !v.is_nan())
}
