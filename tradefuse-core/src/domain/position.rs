//! Position — the single open position per symbol.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }

    /// +1 for long, -1 for short. Used to mirror pnl and TP/SL arithmetic.
    pub fn sign(self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

/// An open directional position with its current exit targets.
///
/// `stop_loss` and `take_profit` are mutated only by TP/SL policy
/// recomputation (margin-scaled policy on account updates); everything
/// else is fixed at entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPosition {
    pub symbol: String,
    pub side: Side,
    pub entry_price: f64,
    pub quantity: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub opened_at: DateTime<Utc>,
    pub entry_bar: usize,
}

/// Position state: at most one open position per symbol.
///
/// Flat is a variant rather than a zeroed struct so that "flat implies no
/// price/size fields" holds at the type level.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum Position {
    #[default]
    Flat,
    Open(OpenPosition),
}

impl Position {
    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }

    pub fn open(&self) -> Option<&OpenPosition> {
        match self {
            Position::Flat => None,
            Position::Open(p) => Some(p),
        }
    }

    pub fn open_mut(&mut self) -> Option<&mut OpenPosition> {
        match self {
            Position::Flat => None,
            Position::Open(p) => Some(p),
        }
    }

    pub fn side(&self) -> Option<Side> {
        self.open().map(|p| p.side)
    }
}
