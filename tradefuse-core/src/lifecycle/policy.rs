//! Take-profit / stop-loss target policies.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountState, Side};

/// Resolved price targets for an open position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// How entry price and account state map to exit targets.
///
/// `MarginScaled` compresses the reward multiple as margin thins out:
/// the effective ratio is capped at ten times the current margin ratio,
/// so a fully-funded account trades at the configured `rr` while a
/// stressed one takes profit sooner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TpSlPolicy {
    FixedPercent { tp_pct: f64, sl_pct: f64 },
    RiskReward { base_risk: f64, rr: f64 },
    MarginScaled { base_risk: f64, rr: f64 },
}

impl Default for TpSlPolicy {
    fn default() -> Self {
        TpSlPolicy::RiskReward {
            base_risk: 0.02,
            rr: 2.0,
        }
    }
}

impl TpSlPolicy {
    pub fn targets(&self, side: Side, entry_price: f64, account: &AccountState) -> Targets {
        let (risk_frac, reward_frac) = match *self {
            TpSlPolicy::FixedPercent { tp_pct, sl_pct } => (sl_pct, tp_pct),
            TpSlPolicy::RiskReward { base_risk, rr } => (base_risk, base_risk * rr),
            TpSlPolicy::MarginScaled { base_risk, rr } => {
                let effective_rr = rr.min(account.margin_ratio() * 10.0);
                (base_risk, base_risk * effective_rr)
            }
        };
        let sign = side.sign();
        Targets {
            stop_loss: entry_price * (1.0 - sign * risk_frac),
            take_profit: entry_price * (1.0 + sign * reward_frac),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn account(wallet: f64, margin: f64) -> AccountState {
        AccountState {
            wallet_balance: wallet,
            margin_balance: margin,
            unrealized_pnl: 0.0,
        }
    }

    #[test]
    fn risk_reward_long_targets() {
        let policy = TpSlPolicy::RiskReward {
            base_risk: 0.02,
            rr: 2.0,
        };
        let t = policy.targets(Side::Long, 100.0, &account(1000.0, 1000.0));
        assert_approx(t.stop_loss, 98.0, DEFAULT_EPSILON);
        assert_approx(t.take_profit, 104.0, DEFAULT_EPSILON);
    }

    #[test]
    fn risk_reward_short_targets() {
        let policy = TpSlPolicy::RiskReward {
            base_risk: 0.02,
            rr: 2.0,
        };
        let t = policy.targets(Side::Short, 100.0, &account(1000.0, 1000.0));
        assert_approx(t.stop_loss, 102.0, DEFAULT_EPSILON);
        assert_approx(t.take_profit, 96.0, DEFAULT_EPSILON);
    }

    #[test]
    fn fixed_percent_targets() {
        let policy = TpSlPolicy::FixedPercent {
            tp_pct: 0.05,
            sl_pct: 0.03,
        };
        let t = policy.targets(Side::Long, 200.0, &account(1000.0, 1000.0));
        assert_approx(t.stop_loss, 194.0, DEFAULT_EPSILON);
        assert_approx(t.take_profit, 210.0, DEFAULT_EPSILON);
    }

    #[test]
    fn margin_scaled_caps_reward() {
        let policy = TpSlPolicy::MarginScaled {
            base_risk: 0.02,
            rr: 3.0,
        };
        // margin ratio 0.1 caps the multiple at 1.0
        let t = policy.targets(Side::Long, 100.0, &account(1000.0, 100.0));
        assert_approx(t.take_profit, 102.0, DEFAULT_EPSILON);
        assert_approx(t.stop_loss, 98.0, DEFAULT_EPSILON);

        // healthy margin uses the configured multiple
        let t = policy.targets(Side::Long, 100.0, &account(1000.0, 1000.0));
        assert_approx(t.take_profit, 106.0, DEFAULT_EPSILON);
    }
}
