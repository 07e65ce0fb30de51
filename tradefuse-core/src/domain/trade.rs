//! TradeRecord — a completed round-trip trade.

use super::position::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    /// An opposite-direction signal arrived while the position was open.
    SignalFlip,
    /// The risk controller forced a reduce-only close (margin too thin).
    RiskReduce,
    /// Flatten-on-shutdown in live mode.
    Shutdown,
}

/// A complete round-trip trade record: entry → exit.
///
/// Created atomically when a position closes, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub side: Side,

    pub entry_bar: usize,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,

    pub exit_bar: usize,
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,

    pub quantity: f64,

    /// Signed pnl as a fraction of entry price (percent-of-equity sizing
    /// applies this fraction to the balance at close).
    pub pnl_fraction: f64,

    pub exit_reason: ExitReason,
}

impl TradeRecord {
    /// Builds the record for a position closing at `exit_price`.
    pub fn from_close(
        open: &super::position::OpenPosition,
        exit_price: f64,
        exit_time: DateTime<Utc>,
        exit_bar: usize,
        exit_reason: ExitReason,
    ) -> Self {
        Self {
            symbol: open.symbol.clone(),
            side: open.side,
            entry_bar: open.entry_bar,
            entry_time: open.opened_at,
            entry_price: open.entry_price,
            exit_bar,
            exit_time,
            exit_price,
            quantity: open.quantity,
            pnl_fraction: Self::pnl_fraction(open.side, open.entry_price, exit_price),
            exit_reason,
        }
    }

    /// Signed fractional return for the trade: (exit - entry) / entry for
    /// longs, mirrored for shorts.
    pub fn pnl_fraction(side: Side, entry_price: f64, exit_price: f64) -> f64 {
        if entry_price == 0.0 {
            return 0.0;
        }
        side.sign() * (exit_price - entry_price) / entry_price
    }

    pub fn is_winner(&self) -> bool {
        self.pnl_fraction > 0.0
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar.saturating_sub(self.entry_bar)
    }
}
