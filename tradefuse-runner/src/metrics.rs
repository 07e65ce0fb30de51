//! Pure metric helpers over a trade ledger and balance history.
//!
//! Every function is total: empty ledgers resolve to defined sentinels
//! (0.0) instead of NaN or panics.

use tradefuse_core::domain::TradeRecord;

pub fn win_rate_pct(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.pnl_fraction > 0.0).count();
    winners as f64 / trades.len() as f64 * 100.0
}

/// Mean pnl fraction over winning trades, 0.0 when there are none.
pub fn avg_win(trades: &[TradeRecord]) -> f64 {
    mean(trades.iter().map(|t| t.pnl_fraction).filter(|p| *p > 0.0))
}

/// Mean pnl fraction over losing trades (a negative number), 0.0 when
/// there are none.
pub fn avg_loss(trades: &[TradeRecord]) -> f64 {
    mean(trades.iter().map(|t| t.pnl_fraction).filter(|p| *p < 0.0))
}

/// Gross profit over gross loss. No losing trades yields the 0.0
/// sentinel rather than infinity.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    let gross_profit: f64 = trades
        .iter()
        .map(|t| t.pnl_fraction)
        .filter(|p| *p > 0.0)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .map(|t| t.pnl_fraction)
        .filter(|p| *p < 0.0)
        .map(f64::abs)
        .sum();
    if gross_loss == 0.0 {
        return 0.0;
    }
    gross_profit / gross_loss
}

/// Worst single-trade pnl fraction, as a percentage. This is the
/// reported "max drawdown" figure; see [`equity_drawdown_pct`] for the
/// peak-to-trough measure.
pub fn max_drawdown_pct(trades: &[TradeRecord]) -> f64 {
    trades
        .iter()
        .map(|t| t.pnl_fraction * 100.0)
        .fold(None, |acc: Option<f64>, p| {
            Some(acc.map_or(p, |a| a.min(p)))
        })
        .unwrap_or(0.0)
}

/// True peak-to-trough drawdown of the balance curve, as a positive
/// percentage of the peak.
pub fn equity_drawdown_pct(balance_history: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for balance in balance_history {
        peak = peak.max(*balance);
        if peak > 0.0 {
            worst = worst.max((peak - balance) / peak * 100.0);
        }
    }
    worst
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
