//! Component traits: indicators and vote producers.

pub mod indicator;
pub mod vote;

pub use indicator::{Indicator, IndicatorValues};
pub use vote::{Vote, VoteProducer};
