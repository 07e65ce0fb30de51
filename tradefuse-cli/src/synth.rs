//! Deterministic synthetic OHLCV generation.
//!
//! Seeded random walk with mild drift and volume bursts. The same seed
//! always yields the same series, so demo artifacts are reproducible.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tradefuse_core::domain::Bar;

pub struct SynthParams {
    pub seed: u64,
    pub bars: usize,
    pub start_price: f64,
    pub interval_minutes: i64,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            seed: 42,
            bars: 1_000,
            start_price: 100.0,
            interval_minutes: 15,
        }
    }
}

pub fn generate(symbol: &str, params: &SynthParams) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let base: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let mut close = params.start_price;
    let mut bars = Vec::with_capacity(params.bars);

    for i in 0..params.bars {
        let open = close;
        let drift = 0.0001;
        let step: f64 = rng.gen_range(-0.01..0.01) + drift;
        close = (open * (1.0 + step)).max(0.01);
        let wick_up: f64 = rng.gen_range(0.0..0.004);
        let wick_down: f64 = rng.gen_range(0.0..0.004);
        let high = open.max(close) * (1.0 + wick_up);
        let low = (open.min(close) * (1.0 - wick_down)).max(0.005);

        // occasional volume burst so surge/filter producers have signal
        let volume = if rng.gen_bool(0.05) {
            rng.gen_range(5_000.0..20_000.0)
        } else {
            rng.gen_range(800.0..1_500.0)
        };

        bars.push(Bar {
            symbol: symbol.to_string(),
            timestamp: base + Duration::minutes(params.interval_minutes * i as i64),
            open,
            high,
            low,
            close,
            volume,
        });
    }
    bars
}

pub fn write_csv(path: &std::path::Path, bars: &[Bar]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["timestamp", "open", "high", "low", "close", "volume"])?;
    for bar in bars {
        writer.write_record([
            bar.timestamp.to_rfc3339(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
