//! TradeFuse Core — domain types, indicator pipeline, vote fusion,
//! position lifecycle, risk controller, and the live event loop.
//!
//! The crate is the deterministic heart of the system:
//! - Domain types (bars, positions, trades, account snapshots)
//! - Causal indicator pipeline with NaN warmup sentinels
//! - Ten vote producers fused by threshold with direction hysteresis
//! - FLAT/LONG/SHORT lifecycle with pluggable TP/SL policies
//! - Margin-ratio risk controller (reduce-only unwind + hedge)
//! - Gateway/feed traits and the channel-driven live runner

pub mod components;
pub mod domain;
pub mod fusion;
pub mod gateway;
pub mod indicators;
pub mod lifecycle;
pub mod live;
pub mod risk;
pub mod votes;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything that crosses the worker-thread
    /// boundary is Send (and Sync where shared).
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::AccountState>();
        require_sync::<domain::AccountState>();

        require_send::<components::IndicatorValues>();
        require_sync::<components::IndicatorValues>();
        require_send::<fusion::SignalEvent>();
        require_sync::<fusion::SignalEvent>();
        require_send::<fusion::FusionState>();
        require_sync::<fusion::FusionState>();

        require_send::<lifecycle::TpSlPolicy>();
        require_sync::<lifecycle::TpSlPolicy>();
        require_send::<risk::RiskController>();
        require_sync::<risk::RiskController>();

        require_send::<live::UpdateEvent>();
        require_send::<gateway::OrderRequest>();
        require_sync::<gateway::OrderRequest>();

        require_send::<Box<dyn components::Indicator>>();
        require_sync::<Box<dyn components::Indicator>>();
        require_send::<Box<dyn components::VoteProducer>>();
        require_sync::<Box<dyn components::VoteProducer>>();
    }

    /// Architecture contract: vote producers cannot see position or
    /// account state. The trait signature takes bars, an index, and the
    /// precomputed indicator values only, so a producer has no channel
    /// through which execution state could leak into signal generation.
    #[test]
    fn vote_producer_trait_has_no_position_parameter() {
        fn _check_trait_object_builds(
            producer: &dyn components::VoteProducer,
            bars: &[domain::Bar],
            indicators: &components::IndicatorValues,
        ) -> components::Vote {
            producer.vote(bars, 0, indicators)
        }
    }
}
