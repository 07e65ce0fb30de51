//! CSV bar loading.
//!
//! Expected header: `timestamp,open,high,low,close,volume` with RFC 3339
//! timestamps. Rows must be strictly increasing in time; the symbol is
//! supplied per file since exchange exports rarely embed it.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use tradefuse_core::domain::Bar;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("csv error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
    #[error("row {row} in {path}: timestamps must be strictly increasing")]
    OutOfOrder { path: String, row: usize },
    #[error("row {row} in {path}: {reason}")]
    InvalidBar {
        path: String,
        row: usize,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub fn load_bars(path: &Path, symbol: &str) -> Result<Vec<Bar>, DataError> {
    let path_str = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.kind() {
        csv::ErrorKind::Io(_) => DataError::Io {
            path: path_str.clone(),
            source: std::io::Error::other(e.to_string()),
        },
        _ => DataError::Csv {
            path: path_str.clone(),
            source: e,
        },
    })?;

    let mut bars = Vec::new();
    for (row_index, record) in reader.deserialize::<CsvRow>().enumerate() {
        // +2: one for the header, one for 1-based reporting
        let row = row_index + 2;
        let parsed = record.map_err(|e| DataError::Csv {
            path: path_str.clone(),
            source: e,
        })?;

        let bar = Bar {
            symbol: symbol.to_string(),
            timestamp: parsed.timestamp,
            open: parsed.open,
            high: parsed.high,
            low: parsed.low,
            close: parsed.close,
            volume: parsed.volume,
        };
        if !bar.is_sane() {
            return Err(DataError::InvalidBar {
                path: path_str.clone(),
                row,
                reason: "high/low bounds violated or NaN field".into(),
            });
        }
        if let Some(prev) = bars.last() {
            let prev: &Bar = prev;
            if bar.timestamp <= prev.timestamp {
                return Err(DataError::OutOfOrder {
                    path: path_str.clone(),
                    row,
                });
            }
        }
        bars.push(bar);
    }
    info!(path = %path_str, bars = bars.len(), symbol, "loaded bar series");
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_well_formed_series() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-02T00:00:00Z,100.0,101.0,99.0,100.5,1500\n\
             2024-01-02T00:15:00Z,100.5,102.0,100.0,101.5,1800\n",
        );
        let bars = load_bars(file.path(), "BTCUSDT").unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].symbol, "BTCUSDT");
        assert_eq!(bars[1].close, 101.5);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn rejects_out_of_order_rows() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-02T00:15:00Z,100.0,101.0,99.0,100.5,1500\n\
             2024-01-02T00:00:00Z,100.5,102.0,100.0,101.5,1800\n",
        );
        let err = load_bars(file.path(), "BTCUSDT").unwrap_err();
        assert!(matches!(err, DataError::OutOfOrder { row: 3, .. }));
    }

    #[test]
    fn rejects_inverted_high_low() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-02T00:00:00Z,100.0,99.0,101.0,100.5,1500\n",
        );
        let err = load_bars(file.path(), "BTCUSDT").unwrap_err();
        assert!(matches!(err, DataError::InvalidBar { row: 2, .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_bars(Path::new("/nonexistent/bars.csv"), "BTCUSDT").unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
