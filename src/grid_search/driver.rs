use std::sync::Mutex;

use rayon::prelude::*;

use crate::agents::RsiMacdBbAgent;
use crate::domain::{Bar, Clock};
use crate::simulation::{run_single_timeframe, FillMode};

use super::progress::ProgressReporter;
use super::types::{GridResult, GridSummary, ParameterAxes, RsiMacdBbTuple};
use super::validity::{lookback_for_cartesian, lookback_for_structural};

const FEE_RATE: f64 = 0.001;

fn agent_for(tuple: &RsiMacdBbTuple, id: String) -> RsiMacdBbAgent {
    RsiMacdBbAgent {
        id,
        rsi_period: tuple.rsi_period,
        oversold: tuple.rsi_oversold,
        overbought: tuple.rsi_overbought,
        macd_fast: tuple.macd_fast,
        macd_slow: tuple.macd_slow,
        macd_signal: tuple.macd_signal,
        bb_period: tuple.bb_period,
        bb_std_dev: tuple.bb_std_dev,
    }
}

fn evaluate_tuple(
    tuple: RsiMacdBbTuple,
    experiment_number: Option<u32>,
    lookback: usize,
    bars: &[Bar],
    initial_balance: f64,
) -> Option<GridResult> {
    let mut agent = agent_for(&tuple, format!("grid-{}", experiment_number.unwrap_or(0)));
    let result = run_single_timeframe(&mut agent, bars, lookback, tuple.stop_loss, FEE_RATE, initial_balance, FillMode::FullPosition);
    match result {
        Ok(result) => Some(GridResult { tuple, experiment_number, result }),
        Err(e) => {
            tracing::warn!(error = %e, "grid tuple failed at runtime, skipping");
            None
        }
    }
}

struct Accumulator {
    results: Mutex<Vec<GridResult>>,
    completed: std::sync::atomic::AtomicUsize,
    failed: std::sync::atomic::AtomicUsize,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            completed: std::sync::atomic::AtomicUsize::new(0),
            failed: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    fn best_so_far(&self) -> Option<(f64, RsiMacdBbTuple)> {
        self.results
            .lock()
            .unwrap()
            .iter()
            .max_by(|a, b| a.result.profit_percentage.partial_cmp(&b.result.profit_percentage).unwrap())
            .map(|r| (r.result.profit_percentage, r.tuple))
    }
}

fn finish(accumulator: Accumulator, total_tuples: usize, filtered_invalid: usize) -> (Vec<GridResult>, GridSummary) {
    let mut results = accumulator.results.into_inner().unwrap();
    results.sort_by(|a, b| {
        b.result
            .profit_percentage
            .partial_cmp(&a.result.profit_percentage)
            .unwrap()
            .then_with(|| format!("{:?}", a.tuple).cmp(&format!("{:?}", b.tuple)))
    });
    let summary = GridSummary {
        total_tuples,
        executed: results.len(),
        filtered_invalid,
        failed: accumulator.failed.load(std::sync::atomic::Ordering::Relaxed),
    };
    (results, summary)
}

/// Full Cartesian product of `axes`, filtered by MACD-axis validity
/// and the margin-based lookback rule, executed in parallel with
/// progress telemetry.
pub fn run_cartesian(
    axes: &ParameterAxes,
    bars: &[Bar],
    initial_balance: f64,
    margin_bars: usize,
    clock: &dyn Clock,
    log_path: Option<std::path::PathBuf>,
) -> (Vec<GridResult>, GridSummary) {
    let candidates = axes.product();
    let total_tuples = candidates.len();

    let mut valid = Vec::with_capacity(total_tuples);
    let mut filtered_invalid = 0usize;
    for tuple in candidates {
        match lookback_for_cartesian(&tuple, margin_bars, bars.len()) {
            Some(lookback) => valid.push((tuple, lookback)),
            None => filtered_invalid += 1,
        }
    }

    let accumulator = Accumulator::new();
    let reporter = ProgressReporter::with_defaults(clock, valid.len(), log_path);

    valid.par_iter().enumerate().for_each(|(i, (tuple, lookback))| {
        match evaluate_tuple(*tuple, None, *lookback, bars, initial_balance) {
            Some(result) => {
                accumulator.results.lock().unwrap().push(result);
            }
            None => {
                accumulator.failed.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            }
        }
        let index = accumulator.completed.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
        let best = accumulator.best_so_far();
        reporter.report_if_due(index, best.as_ref().map(|(p, t)| (*p, t)));
        let _ = i;
    });

    finish(accumulator, total_tuples, filtered_invalid)
}

/// Runs exactly the tuples named by a precomputed experiment plan
/// (e.g. an L18 orthogonal array), in order, tagging each result with
/// its `experiment_number`. Uses the floor-of-100 structural lookback
/// rule rather than the Cartesian-mode margin.
pub fn run_structural_plan(
    experiments: &[(u32, RsiMacdBbTuple)],
    bars: &[Bar],
    initial_balance: f64,
    clock: &dyn Clock,
    log_path: Option<std::path::PathBuf>,
) -> (Vec<GridResult>, GridSummary) {
    let total_tuples = experiments.len();
    let accumulator = Accumulator::new();
    let reporter = ProgressReporter::with_defaults(clock, total_tuples, log_path);

    experiments.par_iter().enumerate().for_each(|(i, (experiment_number, tuple))| {
        let lookback = lookback_for_structural(tuple);
        if lookback + 1 > bars.len() {
            accumulator.failed.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        } else {
            match evaluate_tuple(*tuple, Some(*experiment_number), lookback, bars, initial_balance) {
                Some(result) => {
                    accumulator.results.lock().unwrap().push(result);
                }
                None => {
                    accumulator.failed.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }
            }
        }
        let index = accumulator.completed.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
        let best = accumulator.best_so_far();
        reporter.report_if_due(index, best.as_ref().map(|(p, t)| (*p, t)));
        let _ = i;
    });

    finish(accumulator, total_tuples, 0)
}
