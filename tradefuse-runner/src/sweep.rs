//! Parallel backtest sweeps.
//!
//! Each dataset runs the same config through its own backtest on a rayon
//! worker. Runs share nothing, so results are deterministic regardless of
//! scheduling; output order follows input order.

use rayon::prelude::*;
use tracing::info;

use tradefuse_core::domain::Bar;

use crate::backtest::{run_backtest, BacktestResult};
use crate::config::BacktestConfig;

/// One (name, bar series) pair, typically a symbol or a timeframe slice.
pub struct SweepDataset {
    pub name: String,
    pub bars: Vec<Bar>,
}

pub struct SweepOutcome {
    pub name: String,
    pub result: BacktestResult,
}

pub fn run_sweep(config: &BacktestConfig, datasets: &[SweepDataset]) -> Vec<SweepOutcome> {
    info!(datasets = datasets.len(), "starting sweep");
    datasets
        .par_iter()
        .map(|dataset| {
            let mut per_run = config.clone();
            per_run.symbol = dataset.name.clone();
            SweepOutcome {
                name: dataset.name.clone(),
                result: run_backtest(&per_run, &dataset.bars),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars(n: usize, start: f64) -> Vec<Bar> {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let close = start + i as f64 * 0.1;
                Bar {
                    symbol: "SWEEP".into(),
                    timestamp: base + Duration::minutes(15 * i as i64),
                    open: close,
                    high: close + 0.5,
                    low: close - 0.5,
                    close,
                    volume: 1_000.0,
                }
            })
            .collect()
    }

    #[test]
    fn sweep_preserves_input_order_and_is_deterministic() {
        let config = BacktestConfig::default();
        let datasets = vec![
            SweepDataset {
                name: "BTCUSDT".into(),
                bars: bars(60, 100.0),
            },
            SweepDataset {
                name: "ETHUSDT".into(),
                bars: bars(60, 2000.0),
            },
        ];

        let first = run_sweep(&config, &datasets);
        let second = run_sweep(&config, &datasets);

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name, "BTCUSDT");
        assert_eq!(first[1].name, "ETHUSDT");
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.result.report, b.result.report);
            assert_eq!(a.result.balance_history, b.result.balance_history);
        }
    }

    #[test]
    fn sweep_tags_results_with_dataset_symbol() {
        let config = BacktestConfig::default();
        let datasets = vec![SweepDataset {
            name: "SOLUSDT".into(),
            bars: bars(30, 50.0),
        }];
        let outcomes = run_sweep(&config, &datasets);
        // run_id differs from the base config because the symbol is overridden
        assert_ne!(outcomes[0].result.run_id, config.run_id());
    }
}
