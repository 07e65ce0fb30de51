//! Property tests for fusion and lifecycle invariants.
//!
//! Uses proptest to verify:
//! 1. Hysteresis — consecutive emitted signals always alternate direction
//! 2. Position state — a lifecycle is flat or open, never both, and every
//!    close produces exactly one trade record
//! 3. Margin-scaled targets — the take-profit distance never widens as
//!    the margin ratio falls

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use tradefuse_core::components::{IndicatorValues, Vote, VoteProducer};
use tradefuse_core::domain::{AccountState, Bar, Side};
use tradefuse_core::fusion::{FusionEngine, SignalDirection};
use tradefuse_core::lifecycle::{PositionLifecycle, TpSlPolicy};

fn make_bars(n: usize) -> Vec<Bar> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + i as f64;
            Bar {
                symbol: "TEST".into(),
                timestamp: base + Duration::minutes(15 * i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Replays a fixed vote script, Neutral past the end.
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

fn arb_vote() -> impl Strategy<Value = Vote> {
    prop_oneof![
        Just(Vote::Buy),
        Just(Vote::Sell),
        Just(Vote::Neutral),
    ]
}

proptest! {
    /// Successive emitted signals always alternate direction, whatever
    /// the vote stream looks like.
    #[test]
    fn emitted_directions_alternate(votes in prop::collection::vec(arb_vote(), 1..120)) {
        let bars = make_bars(votes.len());
        let engine = FusionEngine::new(vec![Box::new(Scripted(votes))], 1);
        let events = engine.run(&bars, &IndicatorValues::new());

        for pair in events.windows(2) {
            prop_assert_ne!(pair[0].direction, pair[1].direction);
        }
        for pair in events.windows(2) {
            prop_assert!(pair[0].bar_index < pair[1].bar_index);
        }
    }

    /// Driving a lifecycle with an arbitrary signal sequence never
    /// produces an inconsistent state: every emitted trade has a
    /// non-zero quantity and exit at or after entry, and the lifecycle
    /// is flat exactly when no position is open.
    #[test]
    fn lifecycle_state_stays_consistent(
        directions in prop::collection::vec(prop::bool::ANY, 1..60),
        flip_opens in prop::bool::ANY,
    ) {
        let bars = make_bars(directions.len());
        let account = AccountState::new(10_000.0, 10_000.0, 0.0);
        let mut lc = PositionLifecycle::new(
            "TEST",
            TpSlPolicy::RiskReward { base_risk: 0.02, rr: 2.0 },
        )
        .with_flip_opens_opposite(flip_opens);

        let mut trades = Vec::new();
        for (i, buy) in directions.iter().enumerate() {
            let direction = if *buy { SignalDirection::Buy } else { SignalDirection::Sell };
            if let Some(trade) = lc.on_signal(direction, &bars[i], i, 1.0, &account) {
                trades.push(trade);
            }
            prop_assert_eq!(lc.is_flat(), lc.position().open().is_none());
        }

        for trade in &trades {
            prop_assert!(trade.quantity > 0.0);
            prop_assert!(trade.exit_bar >= trade.entry_bar);
            prop_assert!(trade.entry_price > 0.0);
        }
    }

    /// Margin-scaled policy: as the margin ratio falls, the take-profit
    /// distance shrinks or stays put, and the stop distance is constant.
    #[test]
    fn margin_scaled_reward_is_monotone(
        ratio_hi in 0.0..2.0_f64,
        ratio_lo in 0.0..2.0_f64,
        entry in 10.0..10_000.0_f64,
    ) {
        let (lo, hi) = if ratio_lo <= ratio_hi {
            (ratio_lo, ratio_hi)
        } else {
            (ratio_hi, ratio_lo)
        };
        let policy = TpSlPolicy::MarginScaled { base_risk: 0.02, rr: 3.0 };
        let wallet = 10_000.0;
        let t_hi = policy.targets(Side::Long, entry, &AccountState::new(wallet, wallet * hi, 0.0));
        let t_lo = policy.targets(Side::Long, entry, &AccountState::new(wallet, wallet * lo, 0.0));

        prop_assert!(t_lo.take_profit <= t_hi.take_profit + 1e-9);
        prop_assert!((t_lo.stop_loss - t_hi.stop_loss).abs() < 1e-9);
        prop_assert!(t_hi.take_profit >= entry);
        prop_assert!(t_hi.stop_loss <= entry);
    }
}
