//! Live event loop.
//!
//! A single consumer thread drains `UpdateEvent`s from an mpsc channel and
//! mirrors the exchange's view of account and positions. Per event the
//! order is fixed: risk controller first (reduce-only closes, then the
//! hedge), then TP/SL checks against mark price. A failed gateway call
//! leaves the mirrored state untouched; the same condition fires again on
//! the next event.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{AccountState, Side, Symbol};
use crate::gateway::{ExchangeGateway, MarkPriceSource, OrderRequest, OrderSide};
use crate::lifecycle::TpSlPolicy;
use crate::risk::{Exposure, RiskAction, RiskController};

/// Per-symbol position snapshot from the account feed. `position_amt` is
/// signed: positive long, negative short.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionPayload {
    pub symbol: Symbol,
    pub position_amt: f64,
    pub entry_price: Option<f64>,
    pub mark_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateEvent {
    /// Fresh account snapshot with the per-symbol position list.
    Account {
        state: AccountState,
        positions: Vec<PositionPayload>,
    },
    /// Periodic nudge: re-evaluate with the last snapshot.
    Tick,
    Shutdown,
}

/// A position the runner is tracking, with resolved exit targets.
#[derive(Debug, Clone)]
struct TrackedPosition {
    side: Side,
    entry_price: f64,
    quantity: f64,
    stop_loss: f64,
    take_profit: f64,
    mark_price: Option<f64>,
}

pub struct LiveRunner<G, P> {
    gateway: G,
    prices: P,
    risk: RiskController,
    policy: TpSlPolicy,
    cancel: Arc<AtomicBool>,
    flatten_on_cancel: bool,
    account: AccountState,
    tracked: HashMap<Symbol, TrackedPosition>,
}

impl<G: ExchangeGateway, P: MarkPriceSource> LiveRunner<G, P> {
    pub fn new(
        gateway: G,
        prices: P,
        risk: RiskController,
        policy: TpSlPolicy,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            gateway,
            prices,
            risk,
            policy,
            cancel,
            flatten_on_cancel: false,
            account: AccountState::new(0.0, 0.0, 0.0),
            tracked: HashMap::new(),
        }
    }

    pub fn with_flatten_on_cancel(mut self, flatten_on_cancel: bool) -> Self {
        self.flatten_on_cancel = flatten_on_cancel;
        self
    }

    pub fn tracked_symbols(&self) -> Vec<Symbol> {
        self.tracked.keys().cloned().collect()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Drains the channel until `Shutdown`, disconnect, or cancellation.
    pub fn run(&mut self, events: Receiver<UpdateEvent>) {
        info!("live runner started");
        for event in events {
            if !self.process(event) {
                break;
            }
        }
        if self.cancel.load(Ordering::SeqCst) && self.flatten_on_cancel {
            self.flatten();
        }
        info!("live runner stopped");
    }

    /// Handles a single event. Returns false once intake should stop.
    pub fn process(&mut self, event: UpdateEvent) -> bool {
        if self.cancel.load(Ordering::SeqCst) {
            return false;
        }
        match event {
            UpdateEvent::Account { state, positions } => {
                self.apply_snapshot(state, positions);
                self.evaluate();
            }
            UpdateEvent::Tick => self.evaluate(),
            UpdateEvent::Shutdown => return false,
        }
        true
    }

    fn apply_snapshot(&mut self, state: AccountState, positions: Vec<PositionPayload>) {
        self.account = state;
        self.tracked.clear();
        for payload in positions {
            if payload.position_amt == 0.0 {
                continue;
            }
            let Some(entry_price) = payload.entry_price.filter(|p| *p > 0.0) else {
                warn!(symbol = %payload.symbol, "position payload missing entry price, skipping");
                continue;
            };
            let side = if payload.position_amt > 0.0 {
                Side::Long
            } else {
                Side::Short
            };
            let targets = self.policy.targets(side, entry_price, &self.account);
            self.tracked.insert(
                payload.symbol,
                TrackedPosition {
                    side,
                    entry_price,
                    quantity: payload.position_amt.abs(),
                    stop_loss: targets.stop_loss,
                    take_profit: targets.take_profit,
                    mark_price: payload.mark_price,
                },
            );
        }
        debug!(
            margin_ratio = self.account.margin_ratio(),
            positions = self.tracked.len(),
            "account snapshot applied"
        );
    }

    fn evaluate(&mut self) {
        self.run_risk_actions();
        self.run_target_checks();
    }

    fn run_risk_actions(&mut self) {
        let exposures: Vec<Exposure> = self
            .tracked
            .iter()
            .map(|(symbol, p)| Exposure {
                symbol: symbol.clone(),
                side: p.side,
                quantity: p.quantity,
            })
            .collect();
        for action in self.risk.evaluate(&self.account, &exposures) {
            match action {
                RiskAction::ReduceOnlyClose {
                    symbol,
                    position_side,
                    quantity,
                } => {
                    let request =
                        OrderRequest::market(&*symbol, OrderSide::to_close(position_side), quantity)
                            .reduce_only();
                    if self.place(&request) {
                        self.tracked.remove(&symbol);
                    }
                }
                RiskAction::Hedge {
                    symbol,
                    side,
                    quantity,
                } => {
                    let request =
                        OrderRequest::market(&*symbol, OrderSide::to_open(side), quantity);
                    self.place(&request);
                }
            }
        }
    }

    fn run_target_checks(&mut self) {
        let symbols: Vec<Symbol> = self.tracked.keys().cloned().collect();
        for symbol in symbols {
            let Some(position) = self.tracked.get(&symbol) else {
                continue;
            };
            let mark = match position.mark_price {
                Some(price) => price,
                None => match self.prices.mark_price(&symbol) {
                    Ok(price) => price,
                    Err(err) => {
                        warn!(symbol = %symbol, %err, "no mark price, skipping target check");
                        continue;
                    }
                },
            };
            let sign = position.side.sign();
            let tp_hit = sign * (mark - position.take_profit) >= 0.0;
            let sl_hit = sign * (mark - position.stop_loss) <= 0.0;
            if !(tp_hit || sl_hit) {
                continue;
            }
            debug!(
                symbol = %symbol,
                mark,
                take_profit = position.take_profit,
                stop_loss = position.stop_loss,
                tp_hit,
                "exit target reached"
            );
            let request =
                OrderRequest::market(&*symbol, OrderSide::to_close(position.side), position.quantity)
                    .reduce_only();
            if self.place(&request) {
                self.tracked.remove(&symbol);
            }
        }
    }

    fn flatten(&mut self) {
        info!(positions = self.tracked.len(), "flattening on shutdown");
        let symbols: Vec<Symbol> = self.tracked.keys().cloned().collect();
        for symbol in symbols {
            let position = &self.tracked[&symbol];
            let request =
                OrderRequest::market(&*symbol, OrderSide::to_close(position.side), position.quantity)
                    .reduce_only();
            if self.place(&request) {
                self.tracked.remove(&symbol);
            }
        }
    }

    /// Places an order; returns whether it was confirmed. Failures are
    /// logged and leave the mirrored state as-is.
    fn place(&mut self, request: &OrderRequest) -> bool {
        match self.gateway.place_order(request) {
            Ok(ack) => {
                info!(
                    symbol = %ack.symbol,
                    side = ?ack.side,
                    quantity = ack.quantity,
                    fill_price = ack.fill_price,
                    reduce_only = request.reduce_only,
                    "order filled"
                );
                true
            }
            Err(err) => {
                warn!(symbol = %request.symbol, %err, "order failed, state unchanged");
                false
            }
        }
    }
}
