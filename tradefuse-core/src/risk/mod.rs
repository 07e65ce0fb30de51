//! Margin risk controller.
//!
//! Watches the account's margin ratio and emits defensive actions when it
//! thins out. Below `min_margin_threshold` every open position gets a
//! reduce-only close; below the lower `hedge_threshold` a small fixed
//! hedge order is added on top. Actions are advisory: the caller routes
//! them to the gateway (live) or settles them directly (backtest).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{AccountState, OpenPosition, Side, Symbol};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Margin ratio below which all positions are closed reduce-only.
    pub min_margin_threshold: f64,
    /// Margin ratio below which a hedge order is placed as well.
    pub hedge_threshold: f64,
    pub hedge_symbol: Symbol,
    pub hedge_side: Side,
    pub hedge_quantity: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            min_margin_threshold: 0.15,
            hedge_threshold: 0.10,
            hedge_symbol: "BTCUSDT".into(),
            hedge_side: Side::Long,
            hedge_quantity: 0.01,
        }
    }
}

/// Open exposure as the controller sees it. Built from a backtest
/// position or a live position payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Exposure {
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: f64,
}

impl From<&OpenPosition> for Exposure {
    fn from(p: &OpenPosition) -> Self {
        Self {
            symbol: p.symbol.clone(),
            side: p.side,
            quantity: p.quantity,
        }
    }
}

/// What the controller wants done, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskAction {
    /// Close this position with a reduce-only order.
    ReduceOnlyClose {
        symbol: Symbol,
        position_side: Side,
        quantity: f64,
    },
    /// Open a small offsetting position.
    Hedge {
        symbol: Symbol,
        side: Side,
        quantity: f64,
    },
}

#[derive(Debug, Clone)]
pub struct RiskController {
    config: RiskConfig,
}

impl RiskController {
    pub fn new(config: RiskConfig) -> Self {
        assert!(
            config.hedge_threshold <= config.min_margin_threshold,
            "hedge threshold must not exceed the reduce-only threshold"
        );
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Evaluates one account snapshot against the open positions.
    ///
    /// Reduce-only closes come before the hedge so the caller can unwind
    /// exposure before adding any.
    pub fn evaluate(&self, account: &AccountState, exposures: &[Exposure]) -> Vec<RiskAction> {
        let ratio = account.margin_ratio();
        if ratio >= self.config.min_margin_threshold {
            return Vec::new();
        }
        warn!(
            margin_ratio = ratio,
            threshold = self.config.min_margin_threshold,
            "margin ratio below threshold, unwinding positions"
        );
        let mut actions: Vec<RiskAction> = exposures
            .iter()
            .map(|e| RiskAction::ReduceOnlyClose {
                symbol: e.symbol.clone(),
                position_side: e.side,
                quantity: e.quantity,
            })
            .collect();
        if ratio < self.config.hedge_threshold {
            warn!(
                margin_ratio = ratio,
                threshold = self.config.hedge_threshold,
                "margin ratio critical, placing hedge"
            );
            actions.push(RiskAction::Hedge {
                symbol: self.config.hedge_symbol.clone(),
                side: self.config.hedge_side,
                quantity: self.config.hedge_quantity,
            });
        }
        actions
    }
}
