//! Domain types for TradeFuse.

pub mod account;
pub mod bar;
pub mod position;
pub mod trade;

pub use account::AccountState;
pub use bar::Bar;
pub use position::{OpenPosition, Position, Side};
pub use trade::{ExitReason, TradeRecord};

/// Symbol type alias
pub type Symbol = String;
