//! Artifact export: trade ledger CSV and report JSON.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use tradefuse_core::domain::TradeRecord;

use crate::backtest::BacktestResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("csv error writing {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes one row per trade: times, prices, quantity, pnl, exit reason.
pub fn export_trades_csv(path: &Path, trades: &[TradeRecord]) -> Result<(), ExportError> {
    let path_str = path.display().to_string();
    let mut writer = csv::Writer::from_path(path).map_err(|source| ExportError::Csv {
        path: path_str.clone(),
        source,
    })?;
    writer
        .write_record([
            "symbol",
            "side",
            "entry_time",
            "entry_price",
            "exit_time",
            "exit_price",
            "quantity",
            "pnl_fraction",
            "exit_reason",
        ])
        .map_err(|source| ExportError::Csv {
            path: path_str.clone(),
            source,
        })?;
    for trade in trades {
        writer
            .write_record([
                trade.symbol.as_str(),
                &format!("{:?}", trade.side),
                &trade.entry_time.to_rfc3339(),
                &trade.entry_price.to_string(),
                &trade.exit_time.to_rfc3339(),
                &trade.exit_price.to_string(),
                &trade.quantity.to_string(),
                &trade.pnl_fraction.to_string(),
                &format!("{:?}", trade.exit_reason),
            ])
            .map_err(|source| ExportError::Csv {
                path: path_str.clone(),
                source,
            })?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path_str.clone(),
        source,
    })?;
    info!(path = %path_str, trades = trades.len(), "trade ledger exported");
    Ok(())
}

/// Writes the full result (report, ledger, balance curve) as pretty JSON.
pub fn export_report_json(path: &Path, result: &BacktestResult) -> Result<(), ExportError> {
    let path_str = path.display().to_string();
    let json = serde_json::to_string_pretty(result)?;
    let mut file = File::create(path).map_err(|source| ExportError::Io {
        path: path_str.clone(),
        source,
    })?;
    file.write_all(json.as_bytes())
        .map_err(|source| ExportError::Io {
            path: path_str.clone(),
            source,
        })?;
    info!(path = %path_str, run_id = %result.run_id, "report exported");
    Ok(())
}
