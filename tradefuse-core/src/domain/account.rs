//! Account state snapshot and derived margin ratio.

use serde::{Deserialize, Serialize};

/// Futures account snapshot as delivered by the account state feed.
///
/// Read-only to the core components; only realized trade settlement (in
/// backtest mode) adjusts the wallet balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    pub wallet_balance: f64,
    pub margin_balance: f64,
    pub unrealized_pnl: f64,
}

impl AccountState {
    pub fn new(wallet_balance: f64, margin_balance: f64, unrealized_pnl: f64) -> Self {
        Self {
            wallet_balance,
            margin_balance,
            unrealized_pnl,
        }
    }

    /// Margin ratio: margin balance / wallet balance. Proxy for liquidation
    /// risk. A zero or negative wallet yields 0.0 rather than a division
    /// artifact.
    pub fn margin_ratio(&self) -> f64 {
        if self.wallet_balance <= 0.0 {
            return 0.0;
        }
        self.margin_balance / self.wallet_balance
    }
}
