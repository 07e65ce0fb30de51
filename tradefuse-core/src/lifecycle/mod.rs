//! Position lifecycle.
//!
//! One lifecycle per symbol. Signals open or flip the position at the
//! signal bar's close; each subsequent bar is checked against the
//! position's targets, take-profit before stop-loss. Target prices come
//! from the configured [`TpSlPolicy`] and can be refreshed when a new
//! account snapshot arrives.

pub mod policy;

pub use policy::{Targets, TpSlPolicy};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{
    AccountState, Bar, ExitReason, OpenPosition, Position, Side, Symbol, TradeRecord,
};
use crate::fusion::SignalDirection;

pub struct PositionLifecycle {
    symbol: Symbol,
    policy: TpSlPolicy,
    /// When true, a flip signal opens the opposite side in the same bar
    /// after closing; otherwise the flip only closes.
    flip_opens_opposite: bool,
    position: Position,
}

impl PositionLifecycle {
    pub fn new(symbol: impl Into<Symbol>, policy: TpSlPolicy) -> Self {
        Self {
            symbol: symbol.into(),
            policy,
            flip_opens_opposite: false,
            position: Position::Flat,
        }
    }

    pub fn with_flip_opens_opposite(mut self, flip_opens_opposite: bool) -> Self {
        self.flip_opens_opposite = flip_opens_opposite;
        self
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_flat()
    }

    /// Applies a fused signal at `bar`. Returns the trade closed by a
    /// flip, if any.
    pub fn on_signal(
        &mut self,
        direction: SignalDirection,
        bar: &Bar,
        bar_index: usize,
        quantity: f64,
        account: &AccountState,
    ) -> Option<TradeRecord> {
        let side = direction.side();
        match &self.position {
            Position::Flat => {
                self.open(side, bar.close, quantity, bar.timestamp, bar_index, account);
                None
            }
            Position::Open(open) if open.side == side => None,
            Position::Open(_) => {
                let trade = self.close(
                    bar.close,
                    bar.timestamp,
                    bar_index,
                    ExitReason::SignalFlip,
                )?;
                if self.flip_opens_opposite {
                    self.open(side, bar.close, quantity, bar.timestamp, bar_index, account);
                }
                Some(trade)
            }
        }
    }

    /// Checks the bar's range against the position targets. Take-profit
    /// wins when both levels fall inside the same bar.
    pub fn on_bar(&mut self, bar: &Bar, bar_index: usize) -> Option<TradeRecord> {
        let open = match &self.position {
            Position::Open(open) => open,
            Position::Flat => return None,
        };
        let (tp_hit, sl_hit) = match open.side {
            Side::Long => (bar.high >= open.take_profit, bar.low <= open.stop_loss),
            Side::Short => (bar.low <= open.take_profit, bar.high >= open.stop_loss),
        };
        if tp_hit {
            let price = open.take_profit;
            self.close(price, bar.timestamp, bar_index, ExitReason::TakeProfit)
        } else if sl_hit {
            let price = open.stop_loss;
            self.close(price, bar.timestamp, bar_index, ExitReason::StopLoss)
        } else {
            None
        }
    }

    /// Recomputes targets from the entry price under a fresh account
    /// snapshot. Only margin-aware policies actually move them.
    pub fn refresh_targets(&mut self, account: &AccountState) {
        let policy = self.policy;
        if let Some(open) = self.position.open_mut() {
            let targets = policy.targets(open.side, open.entry_price, account);
            open.stop_loss = targets.stop_loss;
            open.take_profit = targets.take_profit;
        }
    }

    /// Closes at the given price regardless of targets. Used by the risk
    /// controller and on shutdown.
    pub fn force_close(
        &mut self,
        price: f64,
        timestamp: DateTime<Utc>,
        bar_index: usize,
        reason: ExitReason,
    ) -> Option<TradeRecord> {
        self.close(price, timestamp, bar_index, reason)
    }

    fn open(
        &mut self,
        side: Side,
        entry_price: f64,
        quantity: f64,
        timestamp: DateTime<Utc>,
        bar_index: usize,
        account: &AccountState,
    ) {
        let targets = self.policy.targets(side, entry_price, account);
        debug!(
            symbol = %self.symbol,
            ?side,
            entry_price,
            stop_loss = targets.stop_loss,
            take_profit = targets.take_profit,
            "opening position"
        );
        self.position = Position::Open(OpenPosition {
            symbol: self.symbol.clone(),
            side,
            entry_price,
            quantity,
            stop_loss: targets.stop_loss,
            take_profit: targets.take_profit,
            opened_at: timestamp,
            entry_bar: bar_index,
        });
    }

    fn close(
        &mut self,
        exit_price: f64,
        exit_time: DateTime<Utc>,
        exit_bar: usize,
        exit_reason: ExitReason,
    ) -> Option<TradeRecord> {
        let open = match std::mem::take(&mut self.position) {
            Position::Open(open) => open,
            Position::Flat => return None,
        };
        let trade = TradeRecord::from_close(&open, exit_price, exit_time, exit_bar, exit_reason);
        debug!(
            symbol = %trade.symbol,
            ?exit_reason,
            exit_price,
            pnl_fraction = trade.pnl_fraction,
            "closed position"
        );
        Some(trade)
    }
}
