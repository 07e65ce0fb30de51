//! Historical replay through the live event loop.
//!
//! Bars are turned into account snapshots and pushed through a
//! `LiveRunner` backed by a paper gateway, so the live path (payload
//! parsing, risk pass, TP/SL checks, order placement) runs end to end
//! without touching an exchange. Entries come from the same fusion
//! pipeline the backtest uses; exits are the live runner's job.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use tradefuse_core::components::IndicatorValues;
use tradefuse_core::domain::{AccountState, Bar, Side};
use tradefuse_core::fusion::{FusionEngine, FusionState};
use tradefuse_core::gateway::PaperGateway;
use tradefuse_core::live::{LiveRunner, PositionPayload, UpdateEvent};
use tradefuse_core::risk::RiskController;
use tradefuse_core::votes::{standard_indicators, standard_producers};
use tradefuse_runner::BacktestConfig;

pub struct ReplaySummary {
    pub bars: usize,
    pub signals: usize,
    pub orders: usize,
}

pub fn run_replay(config: &BacktestConfig, bars: &[Bar]) -> Result<ReplaySummary> {
    let indicators = standard_indicators(&config.votes);
    let values = IndicatorValues::compute_all(&indicators, bars);
    let engine = FusionEngine::new(standard_producers(&config.votes), config.vote_threshold)
        .with_tie_precedence(config.tie_precedence);
    let mut fusion_state = FusionState::new();

    let mut runner = LiveRunner::new(
        PaperGateway::new(),
        PaperGateway::new(),
        RiskController::new(config.risk.clone()),
        config.policy,
        Arc::new(AtomicBool::new(false)),
    );

    // simulated exchange-side position, mirrored into each snapshot
    let mut sim: Option<(Side, f64, f64)> = None;
    let mut signals = 0usize;

    for (i, bar) in bars.iter().enumerate() {
        runner.gateway_mut().set_price(&config.symbol, bar.close);

        if let Some(event) = engine.evaluate_bar(bars, i, &values, &mut fusion_state) {
            signals += 1;
            let side = event.direction.side();
            match sim {
                None => {
                    let quantity = config.initial_balance * config.position_pct / bar.close;
                    sim = Some((side, bar.close, quantity));
                }
                Some((held, _, _)) if held != side => sim = None,
                Some(_) => {}
            }
        }

        let positions = sim
            .map(|(side, entry, quantity)| {
                vec![PositionPayload {
                    symbol: config.symbol.clone(),
                    position_amt: side.sign() * quantity,
                    entry_price: Some(entry),
                    mark_price: Some(bar.close),
                }]
            })
            .unwrap_or_default();

        let orders_before = runner.gateway().placed.len();
        runner.process(UpdateEvent::Account {
            state: AccountState::new(config.initial_balance, config.initial_balance, 0.0),
            positions,
        });
        // any order the runner placed closed or hedged the simulated book
        if runner.gateway().placed.len() > orders_before {
            sim = None;
        }
    }

    let summary = ReplaySummary {
        bars: bars.len(),
        signals,
        orders: runner.gateway().placed.len(),
    };
    info!(
        bars = summary.bars,
        signals = summary.signals,
        orders = summary.orders,
        "replay finished"
    );
    Ok(summary)
}
