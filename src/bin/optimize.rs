use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use btc_gridtrader::config::SimulationEnvConfig;
use btc_gridtrader::domain::SystemClock;
use btc_gridtrader::grid_search::{run_cartesian, run_structural_plan};
use btc_gridtrader::io::{load_bars_csv, ExperimentPlan, GridSearchReport, ParameterGrid};

/// Runs the RSI+MACD+BB grid-search driver, either over a Cartesian
/// product of parameter axes (`--grid`) or a precomputed experiment
/// plan (`--plan`), and writes the ranked results as JSON.
#[derive(Parser)]
#[command(name = "optimize")]
struct Cli {
    /// Path to a CSV file with `timestamp,price` columns.
    #[arg(long)]
    bars: String,

    /// Optional TOML config file layered under environment variables.
    #[arg(long)]
    config: Option<String>,

    /// Parameter-grid TOML/JSON file for Cartesian-mode search.
    #[arg(long)]
    grid: Option<String>,

    /// Experiment-plan JSON file for structural-plan (L18) mode.
    #[arg(long)]
    plan: Option<String>,

    /// Path to write the ranked results as JSON.
    #[arg(long)]
    output: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = SimulationEnvConfig::load(cli.config.as_ref())?;

    let bars = load_bars_csv(&cli.bars).with_context(|| format!("failed to load bars from {}", cli.bars))?;
    if bars.is_empty() {
        anyhow::bail!("no usable bars loaded from {}", cli.bars);
    }

    let clock = SystemClock;
    let log_path = config.log_file_path.as_ref().map(std::path::PathBuf::from);

    let (results, summary) = match (&cli.grid, &cli.plan) {
        (Some(grid_path), None) => {
            let grid = if grid_path.ends_with(".toml") {
                ParameterGrid::load_toml(grid_path)
            } else {
                ParameterGrid::load_json(grid_path)
            }
            .with_context(|| format!("failed to load parameter grid {grid_path}"))?;
            run_cartesian(&grid.axes, &bars, config.initial_balance, config.lookback_margin_bars, &clock, log_path)
        }
        (None, Some(plan_path)) => {
            let plan = ExperimentPlan::load(plan_path).with_context(|| format!("failed to load experiment plan {plan_path}"))?;
            let experiments = plan.into_tuples();
            run_structural_plan(&experiments, &bars, config.initial_balance, &clock, log_path)
        }
        (Some(_), Some(_)) => anyhow::bail!("pass exactly one of --grid or --plan, not both"),
        (None, None) => anyhow::bail!("pass one of --grid <parameter-grid file> or --plan <experiment-plan file>"),
    };

    let report = GridSearchReport::new(results, summary);
    report.write_json(&cli.output).with_context(|| format!("failed to write results to {}", cli.output))?;

    println!(
        "evaluated {}/{} tuples ({} filtered invalid, {} failed) — best: {:?}",
        summary.executed, summary.total_tuples, summary.filtered_invalid, summary.failed, report.summary.best_tuple
    );

    Ok(())
}
