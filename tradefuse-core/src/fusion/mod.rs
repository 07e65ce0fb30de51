//! Vote fusion.
//!
//! Each bar, every producer casts a [`Vote`]; the engine tallies buys and
//! sells and emits a signal when either tally reaches the threshold.
//! Consecutive signals in the same direction are suppressed: a direction
//! fires once and stays silent until the opposite side wins a bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::components::{IndicatorValues, Vote, VoteProducer};
use crate::domain::{Bar, Side};

/// Which side wins when buy and sell tallies both clear the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiePrecedence {
    #[default]
    BuyFirst,
    SellFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    pub fn side(self) -> Side {
        match self {
            SignalDirection::Buy => Side::Long,
            SignalDirection::Sell => Side::Short,
        }
    }
}

/// A fused entry/flip signal at a specific bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub bar_index: usize,
    pub timestamp: DateTime<Utc>,
    pub direction: SignalDirection,
}

/// Per-bar tally of producer votes, kept for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub buys: usize,
    pub sells: usize,
}

/// Carries the deduplication state between bars.
#[derive(Debug, Clone, Copy, Default)]
pub struct FusionState {
    last_direction: Option<SignalDirection>,
}

impl FusionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_direction(&self) -> Option<SignalDirection> {
        self.last_direction
    }
}

pub struct FusionEngine {
    producers: Vec<Box<dyn VoteProducer>>,
    threshold: usize,
    tie_precedence: TiePrecedence,
}

impl FusionEngine {
    pub fn new(producers: Vec<Box<dyn VoteProducer>>, threshold: usize) -> Self {
        assert!(threshold >= 1, "fusion threshold must be at least 1");
        Self {
            producers,
            threshold,
            tie_precedence: TiePrecedence::default(),
        }
    }

    pub fn with_tie_precedence(mut self, tie_precedence: TiePrecedence) -> Self {
        self.tie_precedence = tie_precedence;
        self
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Bars a producer set needs before every member can vote.
    pub fn max_warmup(&self) -> usize {
        self.producers
            .iter()
            .map(|p| p.warmup_bars())
            .max()
            .unwrap_or(0)
    }

    pub fn tally(
        &self,
        bars: &[Bar],
        bar_index: usize,
        indicators: &IndicatorValues,
    ) -> VoteTally {
        let mut tally = VoteTally::default();
        for producer in &self.producers {
            if bar_index < producer.warmup_bars() {
                continue;
            }
            match producer.vote(bars, bar_index, indicators) {
                Vote::Buy => tally.buys += 1,
                Vote::Sell => tally.sells += 1,
                Vote::Neutral => {}
            }
        }
        tally
    }

    /// Evaluates one bar, emitting a signal only on a direction change.
    pub fn evaluate_bar(
        &self,
        bars: &[Bar],
        bar_index: usize,
        indicators: &IndicatorValues,
        state: &mut FusionState,
    ) -> Option<SignalEvent> {
        let tally = self.tally(bars, bar_index, indicators);
        let direction = self.winner(tally)?;
        if state.last_direction == Some(direction) {
            return None;
        }
        state.last_direction = Some(direction);
        Some(SignalEvent {
            bar_index,
            timestamp: bars[bar_index].timestamp,
            direction,
        })
    }

    /// Runs the full series through a fresh [`FusionState`].
    pub fn run(&self, bars: &[Bar], indicators: &IndicatorValues) -> Vec<SignalEvent> {
        let mut state = FusionState::new();
        let mut events = Vec::new();
        for bar_index in 0..bars.len() {
            if let Some(event) = self.evaluate_bar(bars, bar_index, indicators, &mut state) {
                events.push(event);
            }
        }
        events
    }

    fn winner(&self, tally: VoteTally) -> Option<SignalDirection> {
        let buy = tally.buys >= self.threshold;
        let sell = tally.sells >= self.threshold;
        match (buy, sell) {
            (false, false) => None,
            (true, false) => Some(SignalDirection::Buy),
            (false, true) => Some(SignalDirection::Sell),
            (true, true) => Some(match self.tie_precedence {
                TiePrecedence::BuyFirst => SignalDirection::Buy,
                TiePrecedence::SellFirst => SignalDirection::Sell,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    /// Casts a fixed vote every bar after warmup.
    struct Fixed {
        vote: Vote,
        warmup: usize,
    }

    impl Fixed {
        fn buy() -> Box<dyn VoteProducer> {
            Box::new(Fixed {
                vote: Vote::Buy,
                warmup: 0,
            })
        }

        fn sell() -> Box<dyn VoteProducer> {
            Box::new(Fixed {
                vote: Vote::Sell,
                warmup: 0,
            })
        }

        fn buy_after(warmup: usize) -> Box<dyn VoteProducer> {
            Box::new(Fixed {
                vote: Vote::Buy,
                warmup,
            })
        }
    }

    impl VoteProducer for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn warmup_bars(&self) -> usize {
            self.warmup
        }

        fn vote(&self, _: &[Bar], _: usize, _: &IndicatorValues) -> Vote {
            self.vote
        }
    }

    /// Votes per a scripted sequence, Neutral past the end.
    struct Scripted(Vec<Vote>);

    impl VoteProducer for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn warmup_bars(&self) -> usize {
            0
        }

        fn vote(&self, _: &[Bar], bar_index: usize, _: &IndicatorValues) -> Vote {
            self.0.get(bar_index).copied().unwrap_or_default()
        }
    }

    #[test]
    fn below_threshold_no_signal() {
        let bars = make_bars(&[100.0, 101.0]);
        let engine = FusionEngine::new(vec![Fixed::buy()], 2);
        assert!(engine.run(&bars, &IndicatorValues::new()).is_empty());
    }

    #[test]
    fn repeated_direction_emits_once() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0]);
        let engine = FusionEngine::new(vec![Fixed::buy(), Fixed::buy()], 2);
        let events = engine.run(&bars, &IndicatorValues::new());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].bar_index, 0);
        assert_eq!(events[0].direction, SignalDirection::Buy);
    }

    #[test]
    fn direction_flip_emits_again() {
        use Vote::{Buy, Neutral, Sell};
        let bars = make_bars(&[100.0, 101.0, 100.0, 99.0, 100.0]);
        let script = vec![Buy, Neutral, Sell, Neutral, Buy];
        let engine = FusionEngine::new(vec![Box::new(Scripted(script))], 1);
        let events = engine.run(&bars, &IndicatorValues::new());
        let directions: Vec<_> = events.iter().map(|e| e.direction).collect();
        assert_eq!(
            directions,
            vec![
                SignalDirection::Buy,
                SignalDirection::Sell,
                SignalDirection::Buy
            ]
        );
        assert_eq!(events[1].bar_index, 2);
    }

    #[test]
    fn tie_goes_to_configured_side() {
        let bars = make_bars(&[100.0]);
        let producers = || vec![Fixed::buy(), Fixed::sell()];
        let iv = IndicatorValues::new();

        let engine = FusionEngine::new(producers(), 1);
        assert_eq!(engine.run(&bars, &iv)[0].direction, SignalDirection::Buy);

        let engine =
            FusionEngine::new(producers(), 1).with_tie_precedence(TiePrecedence::SellFirst);
        assert_eq!(engine.run(&bars, &iv)[0].direction, SignalDirection::Sell);
    }

    #[test]
    fn warmup_suppresses_votes() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let engine = FusionEngine::new(vec![Fixed::buy_after(2)], 1);
        let events = engine.run(&bars, &IndicatorValues::new());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].bar_index, 2);
    }
}
