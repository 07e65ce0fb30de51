//! End-to-end lifecycle fixtures: signal in, targets out, exits checked
//! bar by bar.

use chrono::{Duration, TimeZone, Utc};
use tradefuse_core::domain::{AccountState, Bar, ExitReason, Side};
use tradefuse_core::fusion::SignalDirection;
use tradefuse_core::lifecycle::{PositionLifecycle, TpSlPolicy};

fn bar(i: usize, open: f64, high: f64, low: f64, close: f64) -> Bar {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    Bar {
        symbol: "BTCUSDT".into(),
        timestamp: base + Duration::minutes(15 * i as i64),
        open,
        high,
        low,
        close,
        volume: 1_000.0,
    }
}

fn account() -> AccountState {
    AccountState::new(10_000.0, 10_000.0, 0.0)
}

fn risk_reward() -> TpSlPolicy {
    TpSlPolicy::RiskReward {
        base_risk: 0.02,
        rr: 2.0,
    }
}

#[test]
fn long_round_trip_through_take_profit() {
    let mut lc = PositionLifecycle::new("BTCUSDT", risk_reward());
    let bars = vec![
        bar(0, 99.0, 101.0, 98.5, 100.0),  // entry signal bar
        bar(1, 100.0, 102.0, 99.5, 101.0), // no target touched
        bar(2, 101.0, 104.2, 100.5, 103.0), // high crosses 104
    ];

    assert!(lc
        .on_signal(SignalDirection::Buy, &bars[0], 0, 0.5, &account())
        .is_none());
    let open = lc.position().open().unwrap();
    assert_eq!(open.side, Side::Long);
    assert!((open.stop_loss - 98.0).abs() < 1e-10);
    assert!((open.take_profit - 104.0).abs() < 1e-10);

    assert!(lc.on_bar(&bars[1], 1).is_none());
    let trade = lc.on_bar(&bars[2], 2).unwrap();
    assert_eq!(trade.exit_reason, ExitReason::TakeProfit);
    assert!((trade.exit_price - 104.0).abs() < 1e-10);
    assert!((trade.pnl_fraction - 0.04).abs() < 1e-10);
    assert_eq!(trade.entry_bar, 0);
    assert_eq!(trade.exit_bar, 2);
    assert!(lc.is_flat());
}

#[test]
fn short_round_trip_through_stop_loss() {
    let mut lc = PositionLifecycle::new("BTCUSDT", risk_reward());
    let bars = vec![
        bar(0, 101.0, 101.5, 99.0, 100.0),
        bar(1, 100.0, 102.5, 99.5, 102.0), // high crosses sl 102
    ];

    lc.on_signal(SignalDirection::Sell, &bars[0], 0, 0.5, &account());
    let open = lc.position().open().unwrap();
    assert!((open.stop_loss - 102.0).abs() < 1e-10);
    assert!((open.take_profit - 96.0).abs() < 1e-10);

    let trade = lc.on_bar(&bars[1], 1).unwrap();
    assert_eq!(trade.exit_reason, ExitReason::StopLoss);
    assert!((trade.pnl_fraction + 0.02).abs() < 1e-10);
}

#[test]
fn flip_behavior_both_configurations() {
    let bars = vec![bar(0, 99.0, 101.0, 98.0, 100.0), bar(1, 100.0, 103.0, 99.0, 102.0)];

    // default: flip closes only
    let mut lc = PositionLifecycle::new("BTCUSDT", risk_reward());
    lc.on_signal(SignalDirection::Buy, &bars[0], 0, 1.0, &account());
    let trade = lc
        .on_signal(SignalDirection::Sell, &bars[1], 1, 1.0, &account())
        .unwrap();
    assert_eq!(trade.exit_reason, ExitReason::SignalFlip);
    assert!(lc.is_flat());

    // flip opens the opposite side at the same close
    let mut lc = PositionLifecycle::new("BTCUSDT", risk_reward()).with_flip_opens_opposite(true);
    lc.on_signal(SignalDirection::Buy, &bars[0], 0, 1.0, &account());
    let trade = lc
        .on_signal(SignalDirection::Sell, &bars[1], 1, 1.0, &account())
        .unwrap();
    assert_eq!(trade.exit_reason, ExitReason::SignalFlip);
    let open = lc.position().open().unwrap();
    assert_eq!(open.side, Side::Short);
    assert_eq!(open.entry_price, 102.0);
    assert_eq!(open.entry_bar, 1);
}

#[test]
fn fixed_percent_policy_targets() {
    let mut lc = PositionLifecycle::new(
        "ETHUSDT",
        TpSlPolicy::FixedPercent {
            tp_pct: 0.04,
            sl_pct: 0.01,
        },
    );
    let b = bar(0, 1999.0, 2001.0, 1998.0, 2000.0);
    lc.on_signal(SignalDirection::Buy, &b, 0, 1.0, &account());
    let open = lc.position().open().unwrap();
    assert!((open.take_profit - 2080.0).abs() < 1e-9);
    assert!((open.stop_loss - 1980.0).abs() < 1e-9);
}

#[test]
fn margin_scaled_targets_follow_account_updates() {
    let mut lc = PositionLifecycle::new(
        "BTCUSDT",
        TpSlPolicy::MarginScaled {
            base_risk: 0.02,
            rr: 2.0,
        },
    );
    let b = bar(0, 99.0, 101.0, 98.0, 100.0);
    lc.on_signal(SignalDirection::Buy, &b, 0, 1.0, &account());
    // healthy margin: full rr
    assert!((lc.position().open().unwrap().take_profit - 104.0).abs() < 1e-10);

    // margin thins to 0.05: effective rr drops to 0.5
    lc.refresh_targets(&AccountState::new(10_000.0, 500.0, 0.0));
    let open = lc.position().open().unwrap();
    assert!((open.take_profit - 101.0).abs() < 1e-10);
    assert!((open.stop_loss - 98.0).abs() < 1e-10);
}
