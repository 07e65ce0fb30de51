//! TradeFuse Runner — backtest orchestration on top of `tradefuse-core`.
//!
//! This crate provides:
//! - Serializable backtest configuration with content-addressed run IDs
//! - CSV bar loading with ordering validation
//! - The deterministic backtest loop with percent-of-equity sizing
//! - Pure metric helpers and report assembly
//! - Parallel parameter/dataset sweeps
//! - Trade ledger and report artifact export

pub mod backtest;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod sweep;

pub use backtest::{run_backtest, BacktestReport, BacktestResult};
pub use config::{BacktestConfig, ConfigError, RunId};
pub use data_loader::{load_bars, DataError};
pub use export::{export_report_json, export_trades_csv, ExportError};
pub use sweep::{run_sweep, SweepDataset, SweepOutcome};
