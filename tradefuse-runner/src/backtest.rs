//! Deterministic backtest loop.
//!
//! Indicators are precomputed once, then the bar loop runs exit checks
//! before signal evaluation so a target touched on bar i settles before
//! any new signal from the same bar. Sizing is percent-of-equity: a
//! closed trade moves the balance by `pnl_fraction * position_pct` of the
//! balance at close, minus the optional per-side taker fee.

use serde::{Deserialize, Serialize};
use tracing::info;

use tradefuse_core::components::IndicatorValues;
use tradefuse_core::domain::{AccountState, Bar, ExitReason, TradeRecord};
use tradefuse_core::fusion::{FusionEngine, FusionState};
use tradefuse_core::lifecycle::PositionLifecycle;
use tradefuse_core::votes::{standard_indicators, standard_producers};

use crate::config::{BacktestConfig, RunId};
use crate::metrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub strategy_name: String,
    pub total_trades: usize,
    pub win_rate_pct: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    /// Worst single-trade pnl as a percentage (reported figure).
    pub max_drawdown_pct: f64,
    /// Peak-to-trough drawdown of the balance curve, for comparison.
    pub equity_drawdown_pct: f64,
    pub final_balance: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub run_id: RunId,
    pub report: BacktestReport,
    pub trades: Vec<TradeRecord>,
    /// Balance after every bar, index-aligned with the input series.
    pub balance_history: Vec<f64>,
}

pub fn run_backtest(config: &BacktestConfig, bars: &[Bar]) -> BacktestResult {
    let indicators = standard_indicators(&config.votes);
    let values = IndicatorValues::compute_all(&indicators, bars);
    let engine = FusionEngine::new(standard_producers(&config.votes), config.vote_threshold)
        .with_tie_precedence(config.tie_precedence);
    let mut fusion_state = FusionState::new();
    let mut lifecycle = PositionLifecycle::new(config.symbol.clone(), config.policy)
        .with_flip_opens_opposite(config.flip_opens_opposite);

    let fee_per_trade = config.fees.map(|f| 2.0 * f.taker).unwrap_or(0.0);
    let mut balance = config.initial_balance;
    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut balance_history = Vec::with_capacity(bars.len());

    let mut settle = |trade: TradeRecord, balance: &mut f64| {
        *balance += (trade.pnl_fraction - fee_per_trade) * *balance * config.position_pct;
        trades.push(trade);
    };

    for (i, bar) in bars.iter().enumerate() {
        if let Some(trade) = lifecycle.on_bar(bar, i) {
            settle(trade, &mut balance);
        }

        if let Some(event) = engine.evaluate_bar(bars, i, &values, &mut fusion_state) {
            let account = AccountState::new(balance, balance, 0.0);
            let quantity = if bar.close > 0.0 {
                balance * config.position_pct / bar.close
            } else {
                0.0
            };
            if let Some(trade) = lifecycle.on_signal(event.direction, bar, i, quantity, &account)
            {
                settle(trade, &mut balance);
            }
        }

        balance_history.push(balance);
    }

    // whatever is still open settles at the final close
    if let Some(last) = bars.last() {
        if let Some(trade) = lifecycle.force_close(
            last.close,
            last.timestamp,
            bars.len() - 1,
            ExitReason::Shutdown,
        ) {
            settle(trade, &mut balance);
            if let Some(slot) = balance_history.last_mut() {
                *slot = balance;
            }
        }
    }

    let report = BacktestReport {
        strategy_name: config.strategy_name.clone(),
        total_trades: trades.len(),
        win_rate_pct: metrics::win_rate_pct(&trades),
        avg_win: metrics::avg_win(&trades),
        avg_loss: metrics::avg_loss(&trades),
        profit_factor: metrics::profit_factor(&trades),
        max_drawdown_pct: metrics::max_drawdown_pct(&trades),
        equity_drawdown_pct: metrics::equity_drawdown_pct(&balance_history),
        final_balance: balance,
        return_pct: if config.initial_balance > 0.0 {
            (balance - config.initial_balance) / config.initial_balance * 100.0
        } else {
            0.0
        },
    };
    info!(
        run_id = %config.run_id(),
        trades = report.total_trades,
        final_balance = report.final_balance,
        return_pct = report.return_pct,
        "backtest finished"
    );

    BacktestResult {
        run_id: config.run_id(),
        report,
        trades,
        balance_history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn flat_bars(n: usize) -> Vec<Bar> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| Bar {
                symbol: "BTCUSDT".into(),
                timestamp: base + Duration::minutes(15 * i as i64),
                open: 100.0,
                high: 100.5,
                low: 99.5,
                close: 100.0,
                volume: 1_000.0,
            })
            .collect()
    }

    #[test]
    fn flat_market_produces_no_trades() {
        let config = BacktestConfig::default();
        let result = run_backtest(&config, &flat_bars(100));
        assert!(result.trades.is_empty());
        assert_eq!(result.report.total_trades, 0);
        assert_eq!(result.report.final_balance, config.initial_balance);
        assert_eq!(result.balance_history.len(), 100);
    }

    #[test]
    fn empty_series_is_a_noop() {
        let config = BacktestConfig::default();
        let result = run_backtest(&config, &[]);
        assert!(result.trades.is_empty());
        assert!(result.balance_history.is_empty());
        assert_eq!(result.report.final_balance, config.initial_balance);
    }
}
