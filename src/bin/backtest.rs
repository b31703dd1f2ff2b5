use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use btc_gridtrader::agents::{Agent, MacdBbAgent, MaCrossAgent, RsiBbAgent, RsiMacdBbAgent};
use btc_gridtrader::config::SimulationEnvConfig;
use btc_gridtrader::io::load_bars_csv;
use btc_gridtrader::simulation::run_single_timeframe;

/// Runs a single backtest for one parameter tuple over a CSV price
/// series and prints a summary, optionally writing the full result
/// as JSON.
#[derive(Parser)]
#[command(name = "backtest")]
struct Cli {
    /// Path to a CSV file with `timestamp,price[,volume,high,low,open]` columns.
    #[arg(long)]
    bars: String,

    /// Optional TOML config file layered under environment variables.
    #[arg(long)]
    config: Option<String>,

    /// Forced percentage stop loss (e.g. 0.05 for 5%), simulator-level.
    #[arg(long)]
    stop_loss: Option<f64>,

    /// Path to write the full result as JSON.
    #[arg(long)]
    output: Option<String>,

    #[command(subcommand)]
    agent: AgentArgs,
}

#[derive(Subcommand)]
enum AgentArgs {
    /// Dual simple-moving-average crossover.
    MaCross {
        #[arg(long)]
        short: usize,
        #[arg(long)]
        long: usize,
    },
    /// RSI + Bollinger Bands conjunction.
    RsiBb {
        #[arg(long)]
        rsi_period: usize,
        #[arg(long)]
        oversold: f64,
        #[arg(long)]
        overbought: f64,
        #[arg(long)]
        bb_period: usize,
        #[arg(long)]
        bb_std_dev: f64,
    },
    /// MACD + Bollinger Bands conjunction.
    MacdBb {
        #[arg(long)]
        macd_fast: usize,
        #[arg(long)]
        macd_slow: usize,
        #[arg(long)]
        macd_signal: usize,
        #[arg(long)]
        bb_period: usize,
        #[arg(long)]
        bb_std_dev: f64,
    },
    /// RSI + MACD + Bollinger Bands three-way conjunction.
    RsiMacdBb {
        #[arg(long)]
        rsi_period: usize,
        #[arg(long)]
        oversold: f64,
        #[arg(long)]
        overbought: f64,
        #[arg(long)]
        macd_fast: usize,
        #[arg(long)]
        macd_slow: usize,
        #[arg(long)]
        macd_signal: usize,
        #[arg(long)]
        bb_period: usize,
        #[arg(long)]
        bb_std_dev: f64,
    },
}

fn build_agent(args: &AgentArgs) -> (Box<dyn Agent>, usize) {
    match args {
        AgentArgs::MaCross { short, long } => (Box::new(MaCrossAgent::new("backtest", *short, *long)), *long),
        AgentArgs::RsiBb { rsi_period, oversold, overbought, bb_period, bb_std_dev } => {
            let lookback = (*rsi_period + 1).max(*bb_period);
            (
                Box::new(RsiBbAgent {
                    id: "backtest".into(),
                    rsi_period: *rsi_period,
                    oversold: *oversold,
                    overbought: *overbought,
                    bb_period: *bb_period,
                    bb_std_dev: *bb_std_dev,
                }),
                lookback,
            )
        }
        AgentArgs::MacdBb { macd_fast, macd_slow, macd_signal, bb_period, bb_std_dev } => {
            let lookback = (*macd_slow + *macd_signal).max(*bb_period);
            (
                Box::new(MacdBbAgent {
                    id: "backtest".into(),
                    macd_fast: *macd_fast,
                    macd_slow: *macd_slow,
                    macd_signal: *macd_signal,
                    bb_period: *bb_period,
                    bb_std_dev: *bb_std_dev,
                }),
                lookback,
            )
        }
        AgentArgs::RsiMacdBb { rsi_period, oversold, overbought, macd_fast, macd_slow, macd_signal, bb_period, bb_std_dev } => {
            let lookback = (*rsi_period + 1).max(*macd_slow + *macd_signal).max(*bb_period);
            (
                Box::new(RsiMacdBbAgent {
                    id: "backtest".into(),
                    rsi_period: *rsi_period,
                    oversold: *oversold,
                    overbought: *overbought,
                    macd_fast: *macd_fast,
                    macd_slow: *macd_slow,
                    macd_signal: *macd_signal,
                    bb_period: *bb_period,
                    bb_std_dev: *bb_std_dev,
                }),
                lookback,
            )
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = SimulationEnvConfig::load(cli.config.as_ref())?;

    let bars = load_bars_csv(&cli.bars).with_context(|| format!("failed to load bars from {}", cli.bars))?;
    if bars.is_empty() {
        anyhow::bail!("no usable bars loaded from {}", cli.bars);
    }

    let (mut agent, lookback) = build_agent(&cli.agent);

    let result = run_single_timeframe(
        agent.as_mut(),
        &bars,
        lookback,
        cli.stop_loss,
        config.fee_rate,
        config.initial_balance,
        config.fill_mode,
    )?;

    println!(
        "final_value={:.2} profit={:+.2}% trades={} (buy={} sell={} stop_loss={})",
        result.final_value, result.profit_percentage, result.total_trades, result.buy_trades, result.sell_trades, result.stop_loss_trades
    );

    if let Some(output) = &cli.output {
        let rendered = serde_json::to_string_pretty(&result)?;
        std::fs::write(output, rendered).with_context(|| format!("failed to write result to {output}"))?;
    }

    Ok(())
}
