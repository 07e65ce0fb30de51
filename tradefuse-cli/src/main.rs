//! TradeFuse CLI — backtest, sweep, replay, and synthetic data commands.
//!
//! Commands:
//! - `backtest` — run one backtest from a TOML config and a CSV bar file
//! - `sweep` — run the same config across several CSV files in parallel
//! - `replay` — feed historical bars through the live event loop
//! - `synth` — generate a deterministic synthetic OHLCV file

mod obs;
mod replay;
mod synth;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tradefuse_runner::{
    export_report_json, export_trades_csv, load_bars, run_backtest, run_sweep, BacktestConfig,
    SweepDataset,
};

#[derive(Parser)]
#[command(name = "tradefuse", about = "TradeFuse — vote-fusion futures engine")]
struct Cli {
    /// Log level when TRADEFUSE_LOG is unset (e.g. info, debug).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Log format: text or json.
    #[arg(long, default_value = "text", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest from a TOML config file over a CSV bar file.
    Backtest {
        #[arg(long)]
        config: PathBuf,

        /// CSV bar file (timestamp,open,high,low,close,volume).
        #[arg(long)]
        data: PathBuf,

        /// Output directory for trades.csv and report.json.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the same config across several CSV files in parallel.
    Sweep {
        #[arg(long)]
        config: PathBuf,

        /// One or more CSV bar files; the file stem names the dataset.
        #[arg(long, required = true, num_args = 1..)]
        data: Vec<PathBuf>,
    },
    /// Feed historical bars through the live event loop (paper gateway).
    Replay {
        #[arg(long)]
        config: PathBuf,

        #[arg(long)]
        data: PathBuf,
    },
    /// Generate a deterministic synthetic OHLCV CSV.
    Synth {
        /// Number of bars to generate.
        #[arg(long, default_value_t = 1_000)]
        bars: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value = "BTCUSDT")]
        symbol: String,

        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    obs::init_tracing(&cli.log_level, &cli.log_format).map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Backtest { config, data, out } => cmd_backtest(&config, &data, out.as_deref()),
        Commands::Sweep { config, data } => cmd_sweep(&config, &data),
        Commands::Replay { config, data } => cmd_replay(&config, &data),
        Commands::Synth {
            bars,
            seed,
            symbol,
            out,
        } => cmd_synth(bars, seed, &symbol, &out),
    }
}

fn cmd_backtest(
    config_path: &std::path::Path,
    data_path: &std::path::Path,
    out: Option<&std::path::Path>,
) -> Result<()> {
    let config = BacktestConfig::from_toml_file(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let bars = load_bars(data_path, &config.symbol)?;
    let result = run_backtest(&config, &bars);

    print_report(&result.report, &result.run_id);

    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output dir {}", dir.display()))?;
        export_trades_csv(&dir.join("trades.csv"), &result.trades)?;
        export_report_json(&dir.join("report.json"), &result)?;
        println!("Artifacts written to {}", dir.display());
    }
    Ok(())
}

fn cmd_sweep(config_path: &std::path::Path, data_paths: &[PathBuf]) -> Result<()> {
    let config = BacktestConfig::from_toml_file(config_path)?;
    let mut datasets = Vec::with_capacity(data_paths.len());
    for path in data_paths {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("dataset")
            .to_string();
        let bars = load_bars(path, &name)?;
        datasets.push(SweepDataset { name, bars });
    }

    for outcome in run_sweep(&config, &datasets) {
        println!("─── {} ───", outcome.name);
        print_report(&outcome.result.report, &outcome.result.run_id);
    }
    Ok(())
}

fn cmd_replay(config_path: &std::path::Path, data_path: &std::path::Path) -> Result<()> {
    let config = BacktestConfig::from_toml_file(config_path)?;
    let bars = load_bars(data_path, &config.symbol)?;
    let summary = replay::run_replay(&config, &bars)?;
    println!(
        "Replayed {} bars: {} signals, {} orders placed",
        summary.bars, summary.signals, summary.orders
    );
    Ok(())
}

fn cmd_synth(bars: usize, seed: u64, symbol: &str, out: &std::path::Path) -> Result<()> {
    let series = synth::generate(
        symbol,
        &synth::SynthParams {
            seed,
            bars,
            ..synth::SynthParams::default()
        },
    );
    synth::write_csv(out, &series)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("Wrote {} bars to {}", series.len(), out.display());
    Ok(())
}

fn print_report(report: &tradefuse_runner::BacktestReport, run_id: &str) {
    println!("Strategy:        {}", report.strategy_name);
    println!("Run ID:          {run_id}");
    println!("Trades:          {}", report.total_trades);
    println!("Win rate:        {:.2}%", report.win_rate_pct);
    println!("Avg win:         {:.4}", report.avg_win);
    println!("Avg loss:        {:.4}", report.avg_loss);
    println!("Profit factor:   {:.3}", report.profit_factor);
    println!("Max drawdown:    {:.2}%", report.max_drawdown_pct);
    println!("Equity drawdown: {:.2}%", report.equity_drawdown_pct);
    println!("Final balance:   {:.2}", report.final_balance);
    println!("Return:          {:.2}%", report.return_pct);
}
